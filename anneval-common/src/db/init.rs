//! Database initialization
//!
//! Creates the SQLite database on first run with the full schema, and seeds
//! the admin evaluator the session-creation flow resolves by flag. Safe to
//! call multiple times; every step is idempotent.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Seeded admin evaluator display name
pub const ADMIN_NAME: &str = "관리자";

/// Seeded admin evaluator contact address
pub const ADMIN_EMAIL: &str = "admin@anneval.local";

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows the dashboard's reads to proceed alongside submissions
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema (idempotent - safe to call multiple times)
    create_evaluators_table(&pool).await?;
    create_evaluation_sessions_table(&pool).await?;
    create_evaluations_table(&pool).await?;

    seed_admin_evaluator(&pool).await?;

    Ok(pool)
}

async fn create_evaluators_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluators (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Name lookup drives evaluator identity resolution
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_evaluators_name ON evaluators(name)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_evaluation_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluation_sessions (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            audio_url TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            created_by TEXT NOT NULL REFERENCES evaluators(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_evaluations_table(pool: &SqlitePool) -> Result<()> {
    // UNIQUE(session_id, evaluator_id, language) is the conflict target for
    // submission upserts: at most one row per evaluator per session per
    // language, regardless of how many submit calls race.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluations (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES evaluation_sessions(id),
            evaluator_id TEXT NOT NULL REFERENCES evaluators(id),
            language TEXT NOT NULL,
            scores TEXT NOT NULL,
            total_score REAL NOT NULL,
            comments TEXT,
            submitted_at TEXT NOT NULL,
            UNIQUE(session_id, evaluator_id, language)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_evaluations_session ON evaluations(session_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Seed the admin evaluator row on first run.
///
/// Session creation resolves the admin by the is_admin flag; without this
/// row the admin page cannot create sessions.
async fn seed_admin_evaluator(pool: &SqlitePool) -> Result<()> {
    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM evaluators WHERE is_admin = 1")
            .fetch_one(pool)
            .await?;

    if existing > 0 {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO evaluators (id, name, email, is_admin, created_at)
        VALUES (?, ?, ?, 1, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(ADMIN_NAME)
    .bind(ADMIN_EMAIL)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    info!("Seeded admin evaluator '{}'", ADMIN_NAME);
    Ok(())
}
