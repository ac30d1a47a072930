//! SSE broadcaster for real-time client updates
//!
//! Submissions and session changes are published here; dashboard clients
//! subscribe via GET /api/events and refetch the affected session's data
//! when an event arrives.

use anneval_common::events::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

/// Event broadcaster manages client connections and event distribution
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<SseEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer (recommended: 100 for SSE)
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("SSE broadcaster initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Broadcast an event, ignoring if no clients are connected
    pub fn broadcast_lossy(&self, event: SseEvent) {
        if let Ok(count) = self.tx.send(event) {
            debug!("Broadcast event to {} clients", count);
        }
    }

    /// Get current number of connected clients
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Create an SSE stream for a new client connection
    ///
    /// Starts with a ConnectionStatus event so clients can render
    /// connectivity immediately, then relays broadcast events.
    pub fn subscribe_stream(&self) -> impl Stream<Item = Result<Event, Infallible>> {
        let rx = self.tx.subscribe();
        let connected = futures::stream::once(async {
            Ok::<Event, Infallible>(Event::default().event("ConnectionStatus").data("connected"))
        });

        let events = BroadcastStream::new(rx).filter_map(|result| async move {
            match result {
                Ok(sse_event) => {
                    // Convert SseEvent to axum SSE Event
                    let event = Event::default()
                        .event(&sse_event.event)
                        .json_data(&sse_event.data)
                        .ok();
                    event.map(Ok)
                }
                Err(e) => {
                    // BroadcastStream wraps RecvError, just log and continue
                    warn!("SSE client error: {:?}", e);
                    None
                }
            }
        });

        connected.chain(events)
    }

    /// Create an Axum SSE response handler
    ///
    /// This is the handler body for GET /api/events
    pub fn handle_sse_connection(&self) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        info!("New SSE client connected, total clients: {}", self.client_count());

        Sse::new(self.subscribe_stream()).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("keep-alive"),
        )
    }
}
