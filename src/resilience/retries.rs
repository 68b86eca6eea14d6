//! Bounded retry loop with exponential backoff.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::schema::WaitConfig;

/// Attempt budget and delay bounds for a retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Readiness-probe policy taken from the wait configuration.
    pub fn from_wait_config(config: &WaitConfig) -> Self {
        Self {
            max_attempts: config.ready_max_attempts.max(1),
            base_delay_ms: config.ready_base_delay_ms,
            max_delay_ms: config.ready_max_delay_ms,
        }
    }

    /// Delay before `attempt`: none for the first, then doubling from the
    /// base delay up to the cap, plus up to 10% jitter.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        let delay = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0..=delay / 10);
        Duration::from_millis(delay.saturating_add(jitter))
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// Returns the last error when every attempt failed.
    pub async fn retry<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= self.max_attempts => return Err(e),
                Err(e) => {
                    tracing::debug!(attempt = attempt + 1, error = %e, "Attempt failed, backing off");
                }
            }
            attempt += 1;
        }
    }
}
