//! # AnnEval Common Library
//!
//! Shared code for the announcement evaluation service:
//! - Database initialization, models and seeding
//! - Evaluation rubric definitions (Korean / English)
//! - Score accumulation and aggregate statistics
//! - SSE event types
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod rubric;
pub mod scoring;
pub mod stats;

pub use error::{Error, Result};
pub use rubric::Language;
