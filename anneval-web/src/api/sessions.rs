//! Session lifecycle: create, list, fetch, toggle active

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::AppState;
use anneval_common::db::models::EvaluationSession;
use anneval_common::events::{SseEvent, SseEventData};
use anneval_common::Error;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    pub audio_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Client's view of the current flag; the new state is its negation
    pub is_active: bool,
}

/// POST /api/sessions
///
/// Fails with 400 if title or audio_url is empty; created_by is the
/// seeded admin evaluator, resolved by flag.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<EvaluationSession>, ApiError> {
    let title = req.title.trim();
    let audio_url = req.audio_url.trim();

    if title.is_empty() {
        return Err(Error::InvalidInput("Session title is required".to_string()).into());
    }
    if audio_url.is_empty() {
        return Err(Error::InvalidInput("Audio file is required".to_string()).into());
    }

    let admin_id = db::evaluators::find_admin_id(&state.db).await?;
    let session = db::sessions::create(&state.db, title, audio_url, admin_id).await?;
    info!("Created session '{}' ({})", session.title, session.id);

    state
        .events
        .broadcast_lossy(SseEvent::new("SessionChanged", SseEventData::session_changed(session.id)));

    Ok(Json(session))
}

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<EvaluationSession>>, ApiError> {
    let sessions = db::sessions::list(&state.db).await?;
    Ok(Json(sessions))
}

/// GET /api/sessions/:id
///
/// 404 when absent; the evaluator page renders this as a persistent
/// inline error with no retry path other than reload.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<EvaluationSession>, ApiError> {
    let session = db::sessions::get(&state.db, session_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Session: {}", session_id)))?;

    Ok(Json(session))
}

/// POST /api/sessions/:id/toggle
///
/// Flips is_active unconditionally: no optimistic-lock check against
/// concurrent toggles, last write wins.
pub async fn toggle_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let new_state = !req.is_active;
    db::sessions::set_active(&state.db, session_id, new_state).await?;
    info!("Session {} set {}", session_id, if new_state { "active" } else { "inactive" });

    state
        .events
        .broadcast_lossy(SseEvent::new("SessionChanged", SseEventData::session_changed(session_id)));

    Ok(Json(serde_json::json!({ "is_active": new_state })))
}
