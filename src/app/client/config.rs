//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of HTTP clients
//! for the catalog API, plus the retry schedule applied to every request.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{api, http, limits};
use crate::errors::{ConfigError, ConfigResult, FetchResult};

/// Exponential backoff schedule for rate-limited and failed requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum attempts per request, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    /// Growth factor applied per attempt
    pub multiplier: u32,
    /// Upper bound for the computed delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: limits::MAX_ATTEMPTS,
            initial_delay: limits::INITIAL_RETRY_DELAY,
            multiplier: limits::BACKOFF_MULTIPLIER,
            max_delay: limits::MAX_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay to wait after the given failed attempt (1-based)
    ///
    /// `initial_delay * multiplier^(attempt - 1)`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.saturating_pow(exponent);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Check the schedule can make progress
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                value: self.max_attempts.to_string(),
                reason: "At least one attempt is required".to_string(),
            });
        }
        if self.multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.multiplier".to_string(),
                value: self.multiplier.to_string(),
                reason: "Multiplier must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for the catalog HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Character collection endpoint
    pub base_url: String,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Client-side rate limit in requests per second (0 = unlimited)
    pub rate_limit_rps: u32,
    /// User agent sent with every request
    pub user_agent: String,
    /// Retry schedule for 429 responses and network failures
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            user_agent: http::USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a different API root, e.g. a mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> FetchResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        Ok(client_builder.build()?)
    }

    /// Validate values that would otherwise fail at request time
    pub fn validate(&self) -> ConfigResult<()> {
        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "client.base_url".to_string(),
                value: self.base_url.clone(),
                reason: e.to_string(),
            });
        }
        self.retry.validate()
    }
}
