//! Database models

use crate::rubric::Language;
use crate::scoring::ScoreMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One person who scores announcements (or the seeded admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluator {
    pub id: Uuid,
    pub name: String,
    /// Unique contact address; synthesized for guest entries
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// One announcement recording opened for evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSession {
    pub id: Uuid,
    pub title: String,
    /// Public address of the uploaded audio file (nullable)
    pub audio_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

/// One evaluator's scored submission for one session in one language.
///
/// At most one row exists per (session_id, evaluator_id, language);
/// resubmission overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: Uuid,
    pub session_id: Uuid,
    pub evaluator_id: Uuid,
    pub language: Language,
    /// Opaque nested mapping: category → item → score
    pub scores: ScoreMap,
    pub total_score: f64,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
