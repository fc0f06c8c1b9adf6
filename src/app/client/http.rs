//! Core HTTP operations with rate limiting and retry logic
//!
//! Every request goes through [`HttpHandler::get_response`], which retries
//! HTTP 429 responses and transport failures with exponential backoff and
//! returns every other response untouched for the caller to interpret.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error, warn};
use url::Url;

use super::config::RetryPolicy;
use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

/// HTTP operations handler with resilience patterns
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: Option<DefaultDirectRateLimiter>,
    retry: RetryPolicy,
}

impl HttpHandler {
    /// Creates a new HttpHandler
    ///
    /// A `rate_limit_rps` of zero disables client-side rate limiting.
    pub fn new(client: Client, rate_limit_rps: u32, retry: RetryPolicy) -> Self {
        let rate_limiter =
            NonZeroU32::new(rate_limit_rps).map(|rps| RateLimiter::direct(Quota::per_second(rps)));
        Self {
            client,
            rate_limiter,
            retry,
        }
    }

    /// Fetches a URL, retrying rate-limit responses and network failures
    ///
    /// On HTTP 429 the handler waits for the server's `Retry-After` value when
    /// present, otherwise for the policy's backoff delay, and tries again until
    /// `max_attempts` requests have been made. Any other status is returned
    /// as-is.
    ///
    /// # Errors
    ///
    /// - `FetchError::RateLimitExceeded` when every attempt was answered with 429
    /// - `FetchError::Network` with the last transport error once attempts run out
    pub async fn get_response(&self, url: &Url) -> FetchResult<Response> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.until_ready().await;
            }

            match self.client.get(url.clone()).send().await {
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    if attempt >= max_attempts {
                        error!(
                            "Rate limited on {} after {} attempts, giving up",
                            url, attempt
                        );
                        return Err(FetchError::RateLimitExceeded { attempts: attempt });
                    }

                    let delay = retry_after(&response)
                        .unwrap_or_else(|| self.retry.delay_for_attempt(attempt));
                    warn!(
                        "Rate limited (429). Retrying in {}ms (attempt {}/{})",
                        delay.as_millis(),
                        attempt,
                        max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Ok(response) => {
                    debug!("GET {} -> {}", url, response.status());
                    return Ok(response);
                }
                Err(e) if attempt < max_attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        "Network error: {}. Retrying in {}ms (attempt {}/{})",
                        e,
                        delay.as_millis(),
                        attempt,
                        max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Request to {} failed after {} attempts: {}", url, attempt, e);
                    return Err(FetchError::Network(e));
                }
            }
        }
    }

    /// Retry schedule in use
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}

/// Server-requested delay from an integer-seconds `Retry-After` header
fn retry_after(response: &Response) -> Option<Duration> {
    parse_retry_after(response.headers().get(http::RETRY_AFTER_HEADER)?.to_str().ok()?)
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
