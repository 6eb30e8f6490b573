//! Bounded retry with random delay
//!
//! Every fetch goes through [`with_retries`]: the operation is attempted up to
//! `max_attempts` times, sleeping a uniformly random delay between attempts.
//! No delay follows the final failed attempt, so a policy of 3 attempts
//! sleeps at most twice.

use crate::config::CrawlerConfig;
use crate::MarketError;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry settings for one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt)
    max_attempts: u32,

    /// Lower bound of the delay between attempts
    min_delay: Duration,

    /// Upper bound of the delay between attempts
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(3))
    }
}

impl RetryPolicy {
    /// Creates a policy; bounds given in the wrong order are swapped
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            max_attempts: max_attempts.max(1),
            min_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draws the next delay uniformly from `[min_delay, max_delay]`
    pub fn next_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }

        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Runs `operation` for `url`, retrying per `policy`
///
/// All errors are treated alike. When the attempts run out the last error is
/// wrapped in [`MarketError::RetriesExhausted`].
///
/// # Example
///
/// ```no_run
/// use market_crawler::crawler::{build_http_client, fetch_page, with_retries, RetryPolicy};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = build_http_client()?;
/// let policy = RetryPolicy::default();
/// let body = with_retries(&policy, "https://www.mql5.com/en/market", |url| {
///     let client = &client;
///     async move { fetch_page(client, &url).await }
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_retries<T, E, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut operation: F,
) -> Result<T, MarketError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let error = match operation(url.to_string()).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if attempt >= policy.max_attempts {
            tracing::error!(
                "Giving up on {} after {}/{} attempts: {}",
                url,
                attempt,
                policy.max_attempts,
                error
            );
            return Err(MarketError::RetriesExhausted {
                url: url.to_string(),
                attempts: attempt,
                last_error: error.to_string(),
            });
        }

        let delay = policy.next_delay();
        tracing::warn!(
            "Error fetching {}: {}. Retrying {}/{} in {:?}",
            url,
            error,
            attempt,
            policy.max_attempts,
            delay
        );
        tokio::time::sleep(delay).await;
    }
}
