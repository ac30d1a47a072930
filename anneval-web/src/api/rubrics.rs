//! Rubric serving
//!
//! The evaluation form and the results page render from the same rubric
//! the server scores against, so the definition is served, not duplicated
//! client-side.

use anneval_common::rubric::{rubric_for, Language, Rubric};
use axum::Json;
use serde::Serialize;

/// Both language rubrics
#[derive(Debug, Serialize)]
pub struct RubricsResponse {
    pub korean: &'static Rubric,
    pub english: &'static Rubric,
}

/// GET /api/rubrics
pub async fn get_rubrics() -> Json<RubricsResponse> {
    Json(RubricsResponse {
        korean: rubric_for(Language::Korean),
        english: rubric_for(Language::English),
    })
}
