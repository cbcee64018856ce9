use std::env;
use std::sync::Arc;

use anyhow::Context;
use persistence::db::{DatabaseConfig, PgSession, run_migrations};

const DEFAULT_MIGRATIONS_PATH: &str = "infrastructure/persistence/migrations";

/// Initialize the shared database session from environment variables
///
/// Environment variables:
/// - DATABASE_URL: PostgreSQL connection string (required)
/// - DB_MAX_CONNECTIONS: pool size (default: 5)
/// - DB_MIGRATIONS_PATH: migrations directory, skipped when missing
///   (default: "infrastructure/persistence/migrations")
///
/// # Errors
/// Returns error if DATABASE_URL is not set, connection fails or a migration fails
pub async fn init_database() -> anyhow::Result<Arc<PgSession>> {
    let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let mut config = DatabaseConfig::new(db_url);
    if let Ok(raw) = env::var("DB_MAX_CONNECTIONS") {
        match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => config.max_connections = value,
            _ => tracing::warn!("Ignoring invalid DB_MAX_CONNECTIONS value: {}", raw),
        }
    }

    let session = PgSession::connect(config).await?;

    let migrations_path =
        env::var("DB_MIGRATIONS_PATH").unwrap_or_else(|_| DEFAULT_MIGRATIONS_PATH.to_string());
    if std::path::Path::new(&migrations_path).exists() {
        run_migrations(&session.pool().await, &migrations_path).await?;
        tracing::info!("Migrations applied from {}", migrations_path);
    } else {
        tracing::warn!("Migrations directory {} not found, skipping", migrations_path);
    }

    Ok(Arc::new(session))
}
