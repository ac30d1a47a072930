//! Evaluation session database operations

use anneval_common::db::models::EvaluationSession;
use anneval_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<EvaluationSession> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Failed to parse session id: {}", e)))?;

    let created_by: String = row.get("created_by");
    let created_by = Uuid::parse_str(&created_by)
        .map_err(|e| Error::Internal(format!("Failed to parse created_by: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(EvaluationSession {
        id,
        title: row.get("title"),
        audio_url: row.get("audio_url"),
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at,
        created_by,
    })
}

/// Insert a new session row
pub async fn create(
    pool: &SqlitePool,
    title: &str,
    audio_url: &str,
    created_by: Uuid,
) -> Result<EvaluationSession> {
    let session = EvaluationSession {
        id: Uuid::new_v4(),
        title: title.to_string(),
        audio_url: Some(audio_url.to_string()),
        is_active: true,
        created_at: Utc::now(),
        created_by,
    };

    sqlx::query(
        r#"
        INSERT INTO evaluation_sessions (id, title, audio_url, is_active, created_at, created_by)
        VALUES (?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(session.id.to_string())
    .bind(&session.title)
    .bind(&session.audio_url)
    .bind(session.created_at.to_rfc3339())
    .bind(session.created_by.to_string())
    .execute(pool)
    .await?;

    Ok(session)
}

/// Load one session by id
pub async fn get(pool: &SqlitePool, session_id: Uuid) -> Result<Option<EvaluationSession>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, audio_url, is_active, created_at, created_by
        FROM evaluation_sessions
        WHERE id = ?
        "#,
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(session_from_row).transpose()
}

/// List all sessions, newest first
pub async fn list(pool: &SqlitePool) -> Result<Vec<EvaluationSession>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, audio_url, is_active, created_at, created_by
        FROM evaluation_sessions
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(session_from_row).collect()
}

/// Flip the active flag unconditionally.
///
/// Last write wins: concurrent toggles are not reconciled.
pub async fn set_active(pool: &SqlitePool, session_id: Uuid, is_active: bool) -> Result<()> {
    let result = sqlx::query("UPDATE evaluation_sessions SET is_active = ? WHERE id = ?")
        .bind(is_active as i64)
        .bind(session_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Session: {}", session_id)));
    }

    Ok(())
}
