//! Database query modules, one per table

pub mod evaluations;
pub mod evaluators;
pub mod sessions;
