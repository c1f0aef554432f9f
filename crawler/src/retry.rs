use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Bounded retry with exponential backoff: attempt `n` (0-based) that fails
/// waits `base_delay * 2^n` before the next one.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self { max_retries: 3, base_delay: Duration::from_secs(1) } }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;
        for attempt in 0..self.max_retries {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    tracing::warn!(
                        what,
                        attempt = attempt + 1,
                        max = self.max_retries,
                        error = %e,
                        "request failed"
                    );
                    last_err = Some(e);
                    if attempt + 1 < self.max_retries {
                        sleep(self.delay_for(attempt)).await;
                    }
                }
            }
        }
        let err = last_err.unwrap_or_else(|| anyhow!("no attempts allowed"));
        Err(err.context(format!("{what} failed after {} retries", self.max_retries)))
    }
}
