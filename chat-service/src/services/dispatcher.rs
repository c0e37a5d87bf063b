//! Upstream dispatch with bounded retry on rate limiting.
//!
//! Only a 429 is retried, after a constant delay. Every other status, success
//! or not, goes back to the caller on the first attempt.

use crate::services::providers::gemini::GenerateContentRequest;
use crate::services::providers::{ProviderError, Upstream, UpstreamReply};
use async_trait::async_trait;
use metrics::counter;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Retry behaviour for rate-limited calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: u32,
    /// Wait before each retry. Not scaled between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Total number of calls made before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Waits between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately.
pub struct NoopSleeper;

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Upstream rate limit exceeded after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub struct Dispatcher {
    upstream: Arc<dyn Upstream>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Dispatcher {
    pub fn new(upstream: Arc<dyn Upstream>, policy: RetryPolicy) -> Self {
        Self {
            upstream,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Send `request`, retrying while the upstream answers 429.
    pub async fn dispatch(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<UpstreamReply, DispatchError> {
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            counter!("upstream_attempts_total").increment(1);
            let reply = self.upstream.send(request).await?;

            if reply.status != StatusCode::TOO_MANY_REQUESTS {
                if attempt > 1 {
                    info!(attempt, status = %reply.status, "Upstream call succeeded after retry");
                }
                return Ok(reply);
            }

            counter!("upstream_rate_limited_total").increment(1);

            if attempt < max_attempts {
                warn!(
                    model = %self.upstream.model(),
                    attempt,
                    max_attempts,
                    wait_ms = self.policy.delay.as_millis() as u64,
                    "Upstream rate limit hit, retrying"
                );
                self.sleeper.sleep(self.policy.delay).await;
            }
        }

        warn!(
            model = %self.upstream.model(),
            attempts = max_attempts,
            "Upstream rate limit hit on every attempt"
        );
        Err(DispatchError::RateLimitExhausted {
            attempts: max_attempts,
        })
    }
}
