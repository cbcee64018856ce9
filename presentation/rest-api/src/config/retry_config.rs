use std::env;
use std::time::Duration;

use persistence::retry::RetryPolicy;

/// Build the database retry policy from environment variables
///
/// Environment variables:
/// - DB_MAX_RETRIES: total attempts per query (default: 3)
/// - DB_RETRY_DELAYS_MS: comma-separated backoff table (default: "500,1000,2000")
///
/// Invalid values fall back to the defaults.
pub fn retry_policy_from_env() -> RetryPolicy {
    build_policy(
        env::var("DB_MAX_RETRIES").ok().as_deref(),
        env::var("DB_RETRY_DELAYS_MS").ok().as_deref(),
    )
}

fn build_policy(max_retries: Option<&str>, delays: Option<&str>) -> RetryPolicy {
    let mut policy = RetryPolicy::default();

    if let Some(raw) = max_retries {
        match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => policy.max_attempts = value,
            _ => tracing::warn!("Ignoring invalid DB_MAX_RETRIES value: {}", raw),
        }
    }

    if let Some(raw) = delays {
        match parse_delays(raw) {
            Some(table) => policy.delays = table,
            None => tracing::warn!("Ignoring invalid DB_RETRY_DELAYS_MS value: {}", raw),
        }
    }

    policy
}

fn parse_delays(raw: &str) -> Option<Vec<Duration>> {
    let delays = raw
        .split(',')
        .map(|part| part.trim().parse::<u64>().map(Duration::from_millis))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    (!delays.is_empty()).then_some(delays)
}
