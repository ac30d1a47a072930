//! Server-Sent Events endpoint

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /api/events - SSE stream of change events
///
/// Streams events:
/// - EvaluationChanged (an evaluation was inserted or replaced)
/// - SessionChanged (a session was created or toggled)
///
/// Delivery is at-least-once; clients respond by refetching, so duplicate
/// or reordered events cannot corrupt displayed state.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    state.events.handle_sse_connection()
}
