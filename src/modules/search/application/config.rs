use std::time::Duration;

use crate::modules::search::domain::RateLimitPolicy;
use crate::shared::errors::{AppError, AppResult};

pub const ENV_DEBOUNCE_MS: &str = "TYPEAHEAD_DEBOUNCE_MS";
pub const ENV_DELAY_MS: &str = "TYPEAHEAD_DELAY_MS";
pub const ENV_THROTTLE_MS: &str = "TYPEAHEAD_THROTTLE_MS";
pub const ENV_TIMEOUT_MS: &str = "TYPEAHEAD_TIMEOUT_MS";
pub const ENV_MAX_RPS: &str = "TYPEAHEAD_MAX_RPS";
pub const ENV_BURST: &str = "TYPEAHEAD_BURST";
pub const ENV_HALT_ON_FATAL: &str = "TYPEAHEAD_HALT_ON_FATAL";

/// What happens to the session after an error reached the fatal callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FatalErrorPolicy {
    /// Stop processing terms until the pipeline is re-activated
    #[default]
    Halt,
    /// Drop the failed term and keep listening
    Continue,
}

/// Settings for the outbound HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout
    pub request_timeout: Duration,

    /// Outbound quota, `None` disables it
    pub max_requests_per_second: Option<f64>,

    /// Requests allowed back to back before the quota kicks in
    pub burst_size: u32,

    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_requests_per_second: None,
            burst_size: 1,
            user_agent: format!("typeahead/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Configuration of a search pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub rate_limit: RateLimitPolicy,
    pub fatal_error_policy: FatalErrorPolicy,
    pub http: HttpClientConfig,
}

impl PipelineConfig {
    /// Production defaults: 150ms debounce, halt on fatal errors
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitPolicy) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_fatal_error_policy(mut self, policy: FatalErrorPolicy) -> Self {
        self.fatal_error_policy = policy;
        self
    }

    /// Reads `TYPEAHEAD_*` variables from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        let millis = |key: &str| -> AppResult<Option<Duration>> {
            match lookup(key) {
                Some(raw) => {
                    let ms: u64 = raw.trim().parse().map_err(|e| {
                        AppError::ConfigError(format!("{} must be milliseconds: {}", key, e))
                    })?;
                    Ok(Some(Duration::from_millis(ms)))
                }
                None => Ok(None),
            }
        };

        let debounce = millis(ENV_DEBOUNCE_MS)?;
        let delay = millis(ENV_DELAY_MS)?;
        let throttle = millis(ENV_THROTTLE_MS)?;

        config.rate_limit = match (debounce, delay, throttle) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(AppError::ConfigError(format!(
                    "{} cannot be combined with {}/{}",
                    ENV_DEBOUNCE_MS, ENV_DELAY_MS, ENV_THROTTLE_MS
                )))
            }
            (Some(window), None, None) => RateLimitPolicy::debounce(window),
            (None, Some(delay), Some(interval)) => {
                RateLimitPolicy::delay_then_throttle(delay, interval)
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(AppError::ConfigError(format!(
                    "{} and {} must be set together",
                    ENV_DELAY_MS, ENV_THROTTLE_MS
                )))
            }
            (None, None, None) => config.rate_limit,
        };

        if let Some(timeout) = millis(ENV_TIMEOUT_MS)? {
            config.http.request_timeout = timeout;
        }

        if let Some(raw) = lookup(ENV_MAX_RPS) {
            config.http.max_requests_per_second = Some(raw.trim().parse::<f64>()?);
        }

        if let Some(raw) = lookup(ENV_BURST) {
            config.http.burst_size = raw.trim().parse::<u32>()?;
        }

        if let Some(raw) = lookup(ENV_HALT_ON_FATAL) {
            config.fatal_error_policy = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => FatalErrorPolicy::Halt,
                "0" | "false" | "no" => FatalErrorPolicy::Continue,
                other => {
                    return Err(AppError::ConfigError(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_HALT_ON_FATAL, other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> AppResult<()> {
        match self.rate_limit {
            RateLimitPolicy::Debounce { window } if window.is_zero() => {
                return Err(AppError::ConfigError(
                    "Debounce window must be greater than zero".to_string(),
                ));
            }
            RateLimitPolicy::DelayThenThrottle { interval, .. } if interval.is_zero() => {
                return Err(AppError::ConfigError(
                    "Throttle interval must be greater than zero".to_string(),
                ));
            }
            _ => {}
        }

        if self.http.request_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(rps) = self.http.max_requests_per_second {
            if !rps.is_finite() || rps <= 0.0 {
                return Err(AppError::ConfigError(format!(
                    "Requests per second must be positive, got {}",
                    rps
                )));
            }
            // The quota period is 1/rps and has to fit in a Duration
            Duration::try_from_secs_f64(1.0 / rps).map_err(|e| {
                AppError::ConfigError(format!("Requests per second {} is too low: {}", rps, e))
            })?;
        }

        if self.http.burst_size == 0 {
            return Err(AppError::ConfigError(
                "Burst size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
