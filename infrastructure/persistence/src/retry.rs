use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use business::domain::logger::Logger;

/// Coarse classification of a storage failure, independent of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No connection could be acquired from the pool in time.
    PoolTimedOut,
    /// The pool was closed while the operation waited or ran.
    PoolClosed,
    /// Socket level failure, server unreachable or connection reset.
    Io,
    /// The operation itself timed out.
    Timeout,
    RowNotFound,
    /// The server rejected the statement; see the SQLSTATE code.
    Database,
    Decode,
    Other,
}

impl FailureKind {
    fn is_connectivity(self) -> bool {
        matches!(
            self,
            FailureKind::PoolTimedOut | FailureKind::PoolClosed | FailureKind::Io | FailureKind::Timeout
        )
    }
}

/// A failed storage call, reduced to what retry classification needs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct StorageFailure {
    pub kind: FailureKind,
    /// Storage engine error code (SQLSTATE for Postgres), when one was reported.
    pub code: Option<String>,
    pub message: String,
}

impl StorageFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<sqlx::Error> for StorageFailure {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        match &err {
            sqlx::Error::PoolTimedOut => Self::new(FailureKind::PoolTimedOut, message),
            sqlx::Error::PoolClosed => Self::new(FailureKind::PoolClosed, message),
            sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                Self::new(FailureKind::Timeout, message)
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::WorkerCrashed => {
                Self::new(FailureKind::Io, message)
            }
            sqlx::Error::RowNotFound => Self::new(FailureKind::RowNotFound, message),
            sqlx::Error::Database(db) => {
                let failure = Self::new(FailureKind::Database, message.clone());
                match db.code() {
                    Some(code) => failure.with_code(code.into_owned()),
                    None => failure,
                }
            }
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::TypeNotFound { .. } => Self::new(FailureKind::Decode, message),
            _ => Self::new(FailureKind::Other, message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Non-transient failure, returned exactly as the operation produced it.
    #[error(transparent)]
    Failed(StorageFailure),
    #[error("max retries exceeded after {attempts} attempts: {last}")]
    MaxRetriesExceeded { attempts: u32, last: StorageFailure },
}

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAYS_MS: [u64; 3] = [500, 1000, 2000];

/// SQLSTATE codes for lost connections, admin shutdown and statement timeout.
pub const DEFAULT_TRANSIENT_CODES: [&str; 8] = [
    "08000", "08001", "08003", "08006", "57P01", "57P02", "57P03", "57014",
];
pub const DEFAULT_TRANSIENT_KEYWORDS: [&str; 3] = ["closed", "connection", "timeout"];

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Wait before retry `i` is `delays[i - 1]`, clamped to the last entry.
    pub delays: Vec<Duration>,
    pub transient_codes: Vec<String>,
    /// Matched case-insensitively against the failure message.
    pub transient_keywords: Vec<String>,
    /// Run a liveness probe before every attempt.
    pub probe: bool,
    /// Rebuild the connection before waiting for the next attempt.
    pub reconnect: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delays: DEFAULT_DELAYS_MS
                .iter()
                .copied()
                .map(Duration::from_millis)
                .collect(),
            transient_codes: DEFAULT_TRANSIENT_CODES.iter().map(|c| c.to_string()).collect(),
            transient_keywords: DEFAULT_TRANSIENT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            probe: true,
            reconnect: true,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Backoff before the retry that follows failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let index = attempt.saturating_sub(1) as usize;
        self.delays
            .get(index)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

/// Returns true when `failure` is worth retrying under `policy`.
///
/// Kind, code and message checks are OR'd together.
pub fn is_transient(failure: &StorageFailure, policy: &RetryPolicy) -> bool {
    if failure.kind.is_connectivity() {
        return true;
    }

    if let Some(code) = &failure.code
        && policy.transient_codes.iter().any(|c| c == code)
    {
        return true;
    }

    let message = failure.message.to_lowercase();
    policy
        .transient_keywords
        .iter()
        .any(|keyword| message.contains(&keyword.to_lowercase()))
}

/// Connection handle the retry loop can probe and rebuild.
#[async_trait]
pub trait Session: Send + Sync {
    /// Trivial round trip used to detect a dead connection early.
    async fn ping(&self) -> Result<(), StorageFailure>;
    async fn reconnect(&self) -> Result<(), StorageFailure>;
}

/// Runs database operations with bounded retries on transient failures.
pub struct RetryExecutor {
    session: Arc<dyn Session>,
    policy: RetryPolicy,
    logger: Arc<dyn Logger>,
}

impl RetryExecutor {
    pub fn new(session: Arc<dyn Session>, policy: RetryPolicy, logger: Arc<dyn Logger>) -> Self {
        Self {
            session,
            policy,
            logger,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, QueryError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, StorageFailure>> + Send,
        T: Send,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            let outcome = match self.probe().await {
                Ok(()) => operation().await,
                Err(failure) => Err(failure),
            };

            let failure = match outcome {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            if !is_transient(&failure, &self.policy) {
                return Err(QueryError::Failed(failure));
            }

            if attempt >= max_attempts {
                self.logger.error(&format!(
                    "Database query failed after {} attempts ({})",
                    max_attempts, failure
                ));
                return Err(QueryError::MaxRetriesExceeded {
                    attempts: max_attempts,
                    last: failure,
                });
            }

            self.logger.warn(&format!(
                "Retry {}/{} for database query ({})",
                attempt, max_attempts, failure
            ));

            if self.policy.reconnect
                && let Err(e) = self.session.reconnect().await
            {
                self.logger
                    .error(&format!("Database reconnect failed: {}", e));
            }

            let delay = self.policy.delay_for(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    async fn probe(&self) -> Result<(), StorageFailure> {
        if self.policy.probe {
            self.session.ping().await
        } else {
            Ok(())
        }
    }
}
