//! # skillswap-db
//!
//! Database layer for SkillSwap. The service is single-process, so all state
//! lives in one embedded SQLite database accessed through `sqlx`; repository
//! modules expose one query function per store operation.

pub mod repository;
pub mod row_compat;
pub mod sqlite;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Shared database state passed through Axum extractors.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Connect to the configured SQLite database.
    pub async fn connect(config: &skillswap_common::config::AppConfig) -> Result<Self> {
        tracing::info!("Connecting to SQLite at {}...", config.database.url);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!("Connected to SQLite");

        Ok(Self { pool })
    }

    /// Open a fresh in-memory database with migrations applied.
    ///
    /// A single connection is required: every pooled connection to
    /// `sqlite::memory:` would otherwise get its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use skillswap_common::ids::generate_id;
    use skillswap_common::models::user::User;

    use crate::{Database, repository::users};

    pub(crate) async fn test_db() -> Database {
        Database::in_memory().await.expect("in-memory database")
    }

    /// Insert a user with a name-derived email; tests use distinct names.
    pub(crate) async fn seed_user(db: &Database, name: &str) -> User {
        users::create_user(
            &db.pool,
            generate_id(),
            name,
            &format!("{name}@example.com"),
            "$argon2id$test-hash",
            "",
            "",
            None,
        )
        .await
        .expect("seed user")
    }
}
