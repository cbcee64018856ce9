use super::{cors_config, retry_config, server_config::ServerConfig};
use persistence::retry::RetryPolicy;
use poem::middleware::Cors;

pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: Cors,
    pub retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            cors: cors_config::init_cors(),
            retry: retry_config::retry_policy_from_env(),
        }
    }
}
