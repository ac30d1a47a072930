//! anneval-web library - Announcement evaluation web service
//!
//! Serves the evaluator and admin pages, the JSON API backing them, the
//! uploaded audio files, and an SSE stream of change events.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::services::ServeDir;

pub mod api;
pub mod db;
pub mod sse;
pub mod storage;

use sse::EventBroadcaster;

/// Uploads larger than this are rejected before any write (50 MB)
pub const MAX_AUDIO_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Directory holding uploaded audio files
    pub audio_dir: PathBuf,
    /// Broadcaster for evaluation/session change events
    pub events: EventBroadcaster,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, audio_dir: PathBuf) -> Self {
        Self {
            db,
            audio_dir,
            events: EventBroadcaster::new(100),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    let api = Router::new()
        .route("/api/rubrics", get(api::rubrics::get_rubrics))
        .route("/api/evaluators/resolve", post(api::evaluators::resolve_evaluator))
        .route("/api/sessions", get(api::sessions::list_sessions))
        .route("/api/sessions", post(api::sessions::create_session))
        .route("/api/sessions/:id", get(api::sessions::get_session))
        .route("/api/sessions/:id/toggle", post(api::sessions::toggle_session))
        .route("/api/sessions/:id/evaluations", get(api::evaluations::list_evaluations))
        .route("/api/sessions/:id/stats", get(api::stats::get_session_stats))
        .route("/api/evaluations", post(api::evaluations::submit_evaluation))
        .route("/api/audio", get(api::audio::list_audio_files))
        .route("/api/audio", post(api::audio::upload_audio_file))
        .route("/api/audio/:name", delete(api::audio::delete_audio_file))
        .route("/api/events", get(api::sse::event_stream))
        // Multipart uploads carry up to MAX_AUDIO_BYTES plus form overhead
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES + 64 * 1024));

    let pages = Router::new()
        .route("/", get(api::ui::serve_index))
        .route("/admin", get(api::ui::serve_admin))
        .route("/admin/:session_id", get(api::ui::serve_results))
        .route("/evaluation/:session_id", get(api::ui::serve_evaluation))
        .route("/static/style.css", get(api::ui::serve_style_css))
        .merge(api::health::health_routes());

    Router::new()
        .merge(api)
        .merge(pages)
        .nest_service("/audio", ServeDir::new(&state.audio_dir))
        .with_state(state)
}
