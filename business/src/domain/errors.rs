/// Repository errors for domain layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository.not_found")]
    NotFound,
    #[error("repository.database_error")]
    DatabaseError,
    /// Every attempt failed with a transient connectivity error.
    #[error("repository.retries_exhausted")]
    RetriesExhausted { attempts: u32 },
}

impl RepositoryError {
    pub fn not_found() -> Self {
        RepositoryError::NotFound
    }
    pub fn database_error() -> Self {
        RepositoryError::DatabaseError
    }
    pub fn retries_exhausted(attempts: u32) -> Self {
        RepositoryError::RetriesExhausted { attempts }
    }

    /// Error code exposed to API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::NotFound => "repository.not_found",
            RepositoryError::DatabaseError => "repository.database_error",
            RepositoryError::RetriesExhausted { .. } => "repository.retries_exhausted",
        }
    }
}
