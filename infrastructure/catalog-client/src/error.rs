use std::env;

use serde::Deserialize;
use thiserror::Error;

use business::domain::product::errors::ProductError;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Error taxonomy surfaced to catalog consumers.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("unexpected error: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Database,
    Server,
    Timeout,
    Unknown,
}

/// Error body returned by the catalog API.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
}

impl ClientError {
    /// Classifies a non-success response. The body `name` wins over the status
    /// for database failures, which the API reports as 500.
    pub fn from_response(status: u16, body: Option<ErrorBody>) -> Self {
        let message = body
            .as_ref()
            .map(|b| b.message.clone())
            .unwrap_or_else(|| format!("HTTP {}", status));

        if body.as_ref().is_some_and(|b| b.name == "DatabaseError") {
            return ClientError::Database(message);
        }

        match status {
            400 | 422 => ClientError::Validation(message),
            404 => ClientError::NotFound(message),
            500..=599 => ClientError::Server { status, message },
            _ => ClientError::Unknown(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Database(_) => ErrorKind::Database,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Message safe to show an end user. Never carries raw error detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "Please check the entered data.",
            ClientError::NotFound(_) => "The requested product was not found.",
            ClientError::Timeout => "The server took too long to respond.",
            ClientError::Database(_) | ClientError::Server { .. } | ClientError::Unknown(_) => {
                GENERIC_MESSAGE
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ClientError::Timeout;
        }
        if let Some(status) = err.status() {
            return ClientError::from_response(status.as_u16(), None);
        }
        ClientError::Unknown(err.to_string())
    }
}

impl From<ProductError> for ClientError {
    fn from(err: ProductError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Reads `APP_ENV`; anything other than `production` is development.
    pub fn from_env() -> Self {
        match env::var("APP_ENV") {
            Ok(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Logs a client error. Returns whether anything was logged.
///
/// Unknown errors are suppressed in production; details are only logged in
/// development.
pub fn report(err: &ClientError, context: &str, environment: Environment) -> bool {
    match environment {
        Environment::Production if err.kind() == ErrorKind::Unknown => false,
        Environment::Production => {
            tracing::error!(context, kind = ?err.kind(), "catalog request failed");
            true
        }
        Environment::Development => {
            tracing::error!(context, kind = ?err.kind(), error = %err, "catalog request failed");
            true
        }
    }
}
