//! # SkillSwap Server
//!
//! Main binary: loads configuration, initializes tracing, connects and
//! migrates the database, and serves the REST API.

use skillswap_api::{AppState, build_router};
use skillswap_db::Database;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = skillswap_common::config::init()?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "skillswap_server=debug,skillswap_api=debug,skillswap_db=debug,tower_http=debug"
                        .into()
                }),
        )
        .with_target(true)
        .init();

    tracing::info!("Starting SkillSwap v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database and run migrations
    let db = Database::connect(config).await?;
    db.migrate().await?;

    let state = AppState { db };
    let router = build_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
