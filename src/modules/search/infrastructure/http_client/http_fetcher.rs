//! reqwest-backed fetch primitive with an optional outbound quota
//!
//! The fetcher never retries on its own: every failure goes back to the
//! request supervisor, which leaves recovery to the caller's policy.

use async_trait::async_trait;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

use crate::modules::search::application::config::HttpClientConfig;
use crate::modules::search::application::ports::Fetcher;
use crate::modules::search::domain::SearchResponse;
use crate::shared::errors::{AppError, AppResult, SearchError};

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

pub struct HttpFetcher {
    client: Client,
    rate_limiter: Option<DirectRateLimiter>,
}

impl HttpFetcher {
    pub fn new(config: &HttpClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let rate_limiter = match config.max_requests_per_second {
            Some(rps) => Some(Self::create_rate_limiter(rps, config.burst_size)?),
            None => None,
        };

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> AppResult<DirectRateLimiter> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(AppError::ConfigError(format!(
                "Requests per second must be positive, got {}",
                requests_per_second
            )));
        }

        let period = Duration::try_from_secs_f64(1.0 / requests_per_second).map_err(|e| {
            AppError::ConfigError(format!(
                "Request rate {} is too low to express as a quota: {}",
                requests_per_second, e
            ))
        })?;
        let burst = NonZeroU32::new(burst_size.max(1))
            .ok_or_else(|| AppError::ConfigError("Burst size must be at least 1".to_string()))?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "Request rate {} is too high to express as a quota",
                    requests_per_second
                ))
            })?
            .allow_burst(burst);

        Ok(GovernorRateLimiter::direct(quota))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<SearchResponse, SearchError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        debug!(url, "Sending lookup request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "Lookup request failed");
                if e.is_timeout() {
                    SearchError::transport(url, "request timeout")
                } else {
                    SearchError::transport(url, e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::transport(url, format!("failed to read response body: {}", e)))?;

        debug!(url, status, bytes = body.len(), "Lookup response received");
        Ok(SearchResponse::new(url, status, body))
    }
}
