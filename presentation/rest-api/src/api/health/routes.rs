use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{Object, OpenApi, payload::Json};
use serde::{Deserialize, Serialize};

use persistence::retry::Session;

use crate::api::tags::ApiTags;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// `healthy` when the database answers, `degraded` otherwise
    pub status: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
}

#[derive(poem_openapi::ApiResponse)]
pub enum HealthResponse {
    #[oai(status = 200)]
    Healthy(Json<HealthCheckResponse>),
    #[oai(status = 503)]
    Degraded(Json<HealthCheckResponse>),
}

/// Health API for load balancers and monitoring.
pub struct Api {
    session: Arc<dyn Session>,
}

impl Api {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self { session }
    }
}

#[OpenApi]
impl Api {
    /// Health check endpoint
    ///
    /// Pings the database once. No retry is attempted, so a failing probe
    /// reports the current state rather than waiting out the backoff.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> HealthResponse {
        let healthy = match self.session.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "health probe failed");
                false
            }
        };

        let body = |status: &str| {
            Json(HealthCheckResponse {
                status: status.to_string(),
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
        };

        if healthy {
            HealthResponse::Healthy(body("healthy"))
        } else {
            HealthResponse::Degraded(body("degraded"))
        }
    }
}
