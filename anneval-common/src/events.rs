//! SSE event types for real-time dashboard updates

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// SSE event wrapper for transmission
#[derive(Debug, Clone, Serialize)]
pub struct SseEvent {
    /// Event type name
    pub event: String,

    /// Event data (JSON)
    pub data: SseEventData,

    /// Event ID for client reconnection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SseEvent {
    /// Create a new SSE event
    pub fn new(event: &str, data: SseEventData) -> Self {
        Self {
            event: event.to_string(),
            data,
            id: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// SSE event data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEventData {
    /// An evaluation row was inserted or replaced; dashboards watching the
    /// session refetch its stats. Delivery is at-least-once.
    EvaluationChanged {
        session_id: String,
        language: String,
        timestamp: u64,
    },

    /// A session was created or its active flag toggled
    SessionChanged {
        session_id: String,
        timestamp: u64,
    },

    /// Keep-alive ping
    KeepAlive {
        timestamp: u64,
    },
}

impl SseEventData {
    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    /// Create EvaluationChanged event
    pub fn evaluation_changed(session_id: Uuid, language: &str) -> Self {
        Self::EvaluationChanged {
            session_id: session_id.to_string(),
            language: language.to_string(),
            timestamp: Self::current_timestamp_ms(),
        }
    }

    /// Create SessionChanged event
    pub fn session_changed(session_id: Uuid) -> Self {
        Self::SessionChanged {
            session_id: session_id.to_string(),
            timestamp: Self::current_timestamp_ms(),
        }
    }

    /// Create KeepAlive event
    pub fn keep_alive() -> Self {
        Self::KeepAlive {
            timestamp: Self::current_timestamp_ms(),
        }
    }
}
