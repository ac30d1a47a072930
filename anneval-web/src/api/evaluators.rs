//! Evaluator identity resolution
//!
//! First-time name entry either reuses the evaluator row matching the
//! display name exactly, or creates a guest row with a synthesized unique
//! contact address. This is the only identity mechanism: no password,
//! token, or cookie.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::AppState;
use anneval_common::Error;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub id: Uuid,
    pub name: String,
    /// True when this call created the evaluator row
    pub created: bool,
}

/// POST /api/evaluators/resolve
///
/// Idempotent per name: resolving an existing display name returns the
/// same id on every call; a new name creates exactly one row.
pub async fn resolve_evaluator(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Evaluator name is required".to_string()).into());
    }

    if let Some(existing) = db::evaluators::find_by_name(&state.db, name).await? {
        return Ok(Json(ResolveResponse {
            id: existing.id,
            name: existing.name,
            created: false,
        }));
    }

    let evaluator = db::evaluators::create_guest(&state.db, name).await?;
    info!("Created guest evaluator '{}' ({})", evaluator.name, evaluator.id);

    Ok(Json(ResolveResponse {
        id: evaluator.id,
        name: evaluator.name,
        created: true,
    }))
}
