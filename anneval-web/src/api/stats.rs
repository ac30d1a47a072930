//! Aggregate statistics endpoint
//!
//! Full re-fetch-and-recompute on every call: dashboards request this when
//! an EvaluationChanged event arrives, so duplicated events only cost a
//! redundant recomputation.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::AppState;
use anneval_common::rubric::Language;
use anneval_common::stats::{compute_category_stats, compute_language_stats, CategoryStats, LanguageStats};

/// Stats for one language: overall plus per-category breakdown
#[derive(Debug, Serialize)]
pub struct LanguageReport {
    pub overall: LanguageStats,
    pub categories: Vec<CategoryStats>,
}

/// GET /api/sessions/:id/stats response
#[derive(Debug, Serialize)]
pub struct SessionStatsResponse {
    pub session_id: Uuid,
    pub korean: LanguageReport,
    pub english: LanguageReport,
}

/// GET /api/sessions/:id/stats
pub async fn get_session_stats(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatsResponse>, ApiError> {
    let evaluations = db::evaluations::list_for_session(&state.db, session_id).await?;

    let report = |language: Language| LanguageReport {
        overall: compute_language_stats(&evaluations, language),
        categories: compute_category_stats(&evaluations, language),
    };

    Ok(Json(SessionStatsResponse {
        session_id,
        korean: report(Language::Korean),
        english: report(Language::English),
    }))
}
