//! Evaluator database operations

use anneval_common::db::models::Evaluator;
use anneval_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn evaluator_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Evaluator> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Failed to parse evaluator id: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(Evaluator {
        id,
        name: row.get("name"),
        email: row.get("email"),
        is_admin: row.get::<i64, _>("is_admin") != 0,
        created_at,
    })
}

/// Look up an evaluator by exact display name.
///
/// Display names are the identity mechanism: two people who type the same
/// name share one evaluator row. That collision is preserved behavior, not
/// a bug to fix here.
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Evaluator>> {
    let row = sqlx::query(
        "SELECT id, name, email, is_admin, created_at FROM evaluators WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(evaluator_from_row).transpose()
}

/// Create a guest evaluator with a synthesized unique contact address
pub async fn create_guest(pool: &SqlitePool, name: &str) -> Result<Evaluator> {
    let evaluator = Evaluator {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("guest-{}@example.com", Uuid::new_v4()),
        is_admin: false,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO evaluators (id, name, email, is_admin, created_at) VALUES (?, ?, ?, 0, ?)",
    )
    .bind(evaluator.id.to_string())
    .bind(&evaluator.name)
    .bind(&evaluator.email)
    .bind(evaluator.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(evaluator)
}

/// Get the admin evaluator id (resolved by the is_admin flag)
pub async fn find_admin_id(pool: &SqlitePool) -> Result<Uuid> {
    let id: Option<String> =
        sqlx::query_scalar("SELECT id FROM evaluators WHERE is_admin = 1 LIMIT 1")
            .fetch_optional(pool)
            .await?;

    let id = id.ok_or_else(|| Error::NotFound("Admin evaluator".to_string()))?;
    Uuid::parse_str(&id).map_err(|e| Error::Internal(format!("Failed to parse admin id: {}", e)))
}
