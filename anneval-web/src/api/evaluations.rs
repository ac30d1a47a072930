//! Evaluation submission and listing
//!
//! The server recomputes the total from the rubric at submission time and
//! re-validates every score (range and half-point step) before the upsert;
//! client-supplied totals are never trusted.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::db::evaluations::EvaluationWithName;
use crate::AppState;
use anneval_common::events::{SseEvent, SseEventData};
use anneval_common::rubric::{rubric_for, Language};
use anneval_common::scoring::{overall_total, validate_scores, ScoreMap};
use anneval_common::Error;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub session_id: Uuid,
    pub evaluator_id: Uuid,
    pub language: Language,
    pub scores: ScoreMap,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict to one evaluator; used to re-derive submitted state on load
    pub evaluator_id: Option<Uuid>,
}

/// POST /api/evaluations
///
/// Upserts on (session_id, evaluator_id, language): repeated submits are
/// idempotent replacements, never duplicates. Broadcasts an
/// EvaluationChanged event on success.
pub async fn submit_evaluation(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rubric = rubric_for(req.language);
    validate_scores(rubric, &req.scores)?;

    // Session must exist; submitting against a deleted link is a 404, not
    // a silently dangling row
    db::sessions::get(&state.db, req.session_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Session: {}", req.session_id)))?;

    let total_score = overall_total(rubric, &req.scores);
    let comments = req
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    db::evaluations::upsert(
        &state.db,
        req.session_id,
        req.evaluator_id,
        req.language,
        &req.scores,
        total_score,
        comments,
    )
    .await?;

    info!(
        "Evaluation submitted: session={} evaluator={} language={} total={:.1}",
        req.session_id, req.evaluator_id, req.language, total_score
    );

    state.events.broadcast_lossy(SseEvent::new(
        "EvaluationChanged",
        SseEventData::evaluation_changed(req.session_id, req.language.as_str()),
    ));

    Ok(Json(serde_json::json!({ "total_score": total_score })))
}

/// GET /api/sessions/:id/evaluations
///
/// Full listing for the results dashboard (with evaluator names); with
/// ?evaluator_id= the evaluator page re-derives which language tabs were
/// already submitted after a reload.
pub async fn list_evaluations(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EvaluationWithName>>, ApiError> {
    let evaluations =
        db::evaluations::list_for_session_with_names(&state.db, session_id, query.evaluator_id)
            .await?;

    Ok(Json(evaluations))
}
