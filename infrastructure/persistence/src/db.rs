use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{path::Path, time::Duration};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::retry::{Session, StorageFailure};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database.connection_error")]
    ConnectionError(#[source] sqlx::Error),
    #[error("database.migration_error")]
    MigrationError,
}

/// Configuration for the database connection
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default values
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Creates a PostgreSQL connection pool
pub async fn create_postgres_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    open_pool(config)
        .await
        .map_err(DatabaseError::ConnectionError)
}

async fn open_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.connection_string)
        .await
}

/// Runs database migrations from the specified directory
pub async fn run_migrations(pool: &PgPool, migrations_path: &str) -> Result<(), DatabaseError> {
    let path = Path::new(migrations_path);

    // Checks that the migrations directory exists
    if !path.exists() {
        return Err(DatabaseError::MigrationError);
    }

    sqlx::migrate::Migrator::new(path)
        .await
        .map_err(|_| DatabaseError::MigrationError)?
        .run(pool)
        .await
        .map_err(|_| DatabaseError::MigrationError)
}

/// The single storage session shared by every repository operation.
///
/// Queries clone the current pool under a read lock. Reconnects are
/// serialized and swap in a fresh pool under the write lock, so no query
/// ever observes a pool halfway through teardown.
pub struct PgSession {
    config: DatabaseConfig,
    pool: RwLock<PgPool>,
    reconnect_lock: Mutex<()>,
}

impl PgSession {
    pub async fn connect(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = create_postgres_pool(&config).await?;
        Ok(Self::from_pool(config, pool))
    }

    pub fn from_pool(config: DatabaseConfig, pool: PgPool) -> Self {
        Self {
            config,
            pool: RwLock::new(pool),
            reconnect_lock: Mutex::new(()),
        }
    }

    /// Handle to the current pool. Cheap: `PgPool` is reference counted.
    pub async fn pool(&self) -> PgPool {
        self.pool.read().await.clone()
    }
}

#[async_trait]
impl Session for PgSession {
    async fn ping(&self) -> Result<(), StorageFailure> {
        let pool = self.pool().await;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map(|_| ())
            .map_err(StorageFailure::from)
    }

    async fn reconnect(&self) -> Result<(), StorageFailure> {
        let _guard = self.reconnect_lock.lock().await;

        let fresh = open_pool(&self.config).await?;

        let stale = std::mem::replace(&mut *self.pool.write().await, fresh);
        tracing::info!("database session reconnected");

        // In-flight queries hold their own handle to the old pool and finish on it.
        tokio::spawn(async move { stale.close().await });
        Ok(())
    }
}
