//! anneval-web - In-flight announcement evaluation service
//!
//! Web application for collecting and aggregating quality evaluations of
//! announcement recordings in Korean and English: admins upload audio and
//! open evaluation sessions, evaluators score them against a fixed rubric,
//! and a results dashboard aggregates submissions live.

use anneval_web::{build_router, AppState};
use anneval_common::config;
use anneval_common::db::init::init_database;
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "anneval-web", about = "Announcement evaluation web service")]
struct Args {
    /// Root folder holding the database and uploaded audio files
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port (default 5760, or ANNEVAL_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting AnnEval Web (anneval-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // Zero-config startup: CLI > env > TOML > OS default
    let root = config::RootFolder::new(config::resolve_root_folder(args.root_folder.as_deref()));
    root.ensure_directories()?;
    info!("Root folder: {}", root.path().display());

    let db_path = root.database_path();
    let pool = init_database(&db_path).await?;
    info!("✓ Database ready: {}", db_path.display());

    let state = AppState::new(pool, root.audio_dir());
    let app = build_router(state);

    let port = config::resolve_port(args.port);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("anneval-web listening on http://127.0.0.1:{}", port);
    info!("Admin page: http://127.0.0.1:{}/admin", port);

    axum::serve(listener, app).await?;

    Ok(())
}
