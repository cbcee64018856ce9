use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3002/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60);

/// Connection settings for the catalog REST API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash
    pub base_url: String,
    /// Applied to every request, connect time included
    pub timeout: Duration,
    /// Cached reads older than this are fetched again
    pub revalidate: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            revalidate: DEFAULT_REVALIDATE,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Load client configuration from environment variables
    ///
    /// Environment variables:
    /// - CATALOG_API_URL: base URL (default: "http://localhost:3002/api")
    pub fn from_env() -> Self {
        match env::var("CATALOG_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
