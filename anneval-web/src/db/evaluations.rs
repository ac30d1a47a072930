//! Evaluation database operations
//!
//! Submission is an upsert on the natural key (session_id, evaluator_id,
//! language): repeated submits replace the stored row in place. The
//! storage-layer conflict target is the only concurrency mechanism, never
//! read-then-write.

use anneval_common::db::models::Evaluation;
use anneval_common::rubric::Language;
use anneval_common::scoring::ScoreMap;
use anneval_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Evaluation joined with its evaluator's display name, as the results
/// dashboard renders it
#[derive(Debug, Clone, serde::Serialize)]
pub struct EvaluationWithName {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub evaluator_name: String,
}

fn evaluation_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Evaluation> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Failed to parse evaluation id: {}", e)))?;

    let session_id: String = row.get("session_id");
    let session_id = Uuid::parse_str(&session_id)
        .map_err(|e| Error::Internal(format!("Failed to parse session_id: {}", e)))?;

    let evaluator_id: String = row.get("evaluator_id");
    let evaluator_id = Uuid::parse_str(&evaluator_id)
        .map_err(|e| Error::Internal(format!("Failed to parse evaluator_id: {}", e)))?;

    let language: String = row.get("language");
    let language = Language::parse(&language)
        .ok_or_else(|| Error::Internal(format!("Unknown language tag: {}", language)))?;

    let scores: String = row.get("scores");
    let scores: ScoreMap = serde_json::from_str(&scores)
        .map_err(|e| Error::Internal(format!("Failed to deserialize scores: {}", e)))?;

    let submitted_at: String = row.get("submitted_at");
    let submitted_at = DateTime::parse_from_rfc3339(&submitted_at)
        .map_err(|e| Error::Internal(format!("Failed to parse submitted_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(Evaluation {
        id,
        session_id,
        evaluator_id,
        language,
        scores,
        total_score: row.get("total_score"),
        comments: row.get("comments"),
        submitted_at,
    })
}

/// Upsert one evaluation keyed by (session_id, evaluator_id, language)
pub async fn upsert(
    pool: &SqlitePool,
    session_id: Uuid,
    evaluator_id: Uuid,
    language: Language,
    scores: &ScoreMap,
    total_score: f64,
    comments: Option<&str>,
) -> Result<()> {
    let scores_json = serde_json::to_string(scores)
        .map_err(|e| Error::Internal(format!("Failed to serialize scores: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO evaluations (
            id, session_id, evaluator_id, language,
            scores, total_score, comments, submitted_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(session_id, evaluator_id, language) DO UPDATE SET
            scores = excluded.scores,
            total_score = excluded.total_score,
            comments = excluded.comments,
            submitted_at = excluded.submitted_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(session_id.to_string())
    .bind(evaluator_id.to_string())
    .bind(language.as_str())
    .bind(&scores_json)
    .bind(total_score)
    .bind(comments)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all evaluations for one session (scoped server-side by session id)
pub async fn list_for_session(pool: &SqlitePool, session_id: Uuid) -> Result<Vec<Evaluation>> {
    let rows = sqlx::query(
        r#"
        SELECT id, session_id, evaluator_id, language,
               scores, total_score, comments, submitted_at
        FROM evaluations
        WHERE session_id = ?
        ORDER BY submitted_at
        "#,
    )
    .bind(session_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(evaluation_from_row).collect()
}

/// Load a session's evaluations joined with evaluator display names,
/// optionally filtered to one evaluator (used to re-derive submitted state
/// after a page reload)
pub async fn list_for_session_with_names(
    pool: &SqlitePool,
    session_id: Uuid,
    evaluator_id: Option<Uuid>,
) -> Result<Vec<EvaluationWithName>> {
    let mut sql = String::from(
        r#"
        SELECT e.id, e.session_id, e.evaluator_id, e.language,
               e.scores, e.total_score, e.comments, e.submitted_at,
               v.name AS evaluator_name
        FROM evaluations e
        JOIN evaluators v ON v.id = e.evaluator_id
        WHERE e.session_id = ?
        "#,
    );
    if evaluator_id.is_some() {
        sql.push_str(" AND e.evaluator_id = ?");
    }
    sql.push_str(" ORDER BY e.submitted_at");

    let mut query = sqlx::query(&sql).bind(session_id.to_string());
    if let Some(evaluator_id) = evaluator_id {
        query = query.bind(evaluator_id.to_string());
    }

    let rows = query.fetch_all(pool).await?;

    rows.iter()
        .map(|row| {
            Ok(EvaluationWithName {
                evaluation: evaluation_from_row(row)?,
                evaluator_name: row.get("evaluator_name"),
            })
        })
        .collect()
}
