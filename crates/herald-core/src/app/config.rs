//! Queue configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::queue::BackoffPolicy;

/// Tuning for a `PublishQueue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Wait imposed before every attempt, retries included.
    pub settle_delay: Duration,

    pub backoff: BackoffPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5 * 60),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl QueueConfig {
    /// Load configuration from environment variables.
    ///
    /// - `HERALD_SETTLE_DELAY_MS`: settle delay (default 300000)
    /// - `HERALD_BACKOFF_BASE_MS`: backoff base delay (default 60000)
    /// - `HERALD_BACKOFF_MAX_MS`: cap for a single backoff wait (default 3600000)
    /// - `HERALD_MAX_RETRIES`: rate-limit retries before abandoning (default 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = parse(&lookup, "HERALD_SETTLE_DELAY_MS")? {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "HERALD_BACKOFF_BASE_MS")? {
            config.backoff.base_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "HERALD_BACKOFF_MAX_MS")? {
            config.backoff.max_delay = Duration::from_millis(ms);
        }
        if let Some(n) = parse(&lookup, "HERALD_MAX_RETRIES")? {
            config.backoff.max_retries = n;
        }

        if config.backoff.max_delay < config.backoff.base_delay {
            return Err(ConfigError::Invalid {
                key: "HERALD_BACKOFF_MAX_MS",
                reason: "must not be smaller than HERALD_BACKOFF_BASE_MS".to_string(),
            });
        }

        Ok(config)
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("{raw:?}: {e}"),
        })
}
