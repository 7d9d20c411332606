//! Rate Limiting Infrastructure
//!
//! Outbound call spacing. The external news API punishes bursts, so every
//! call made through one limiter is dispatched at least `min_interval`
//! after the previous one. The limiter is process-wide by construction:
//! build one at the composition root and share it.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Minimum spacing between two consecutive calls
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
        }
    }
}

impl RateLimitConfig {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    pub fn min_interval_ms(&self) -> i64 {
        self.min_interval.as_millis() as i64
    }
}

/// Enforces a minimum interval between calls
///
/// Callers that arrive too early wait. The lock is held across the wait,
/// so concurrent callers are dispatched one at a time, in arrival order.
#[derive(Debug)]
pub struct MinIntervalLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl MinIntervalLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            min_interval: config.min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until a call is allowed, then record it
    ///
    /// Returns how long the caller was delayed.
    pub async fn acquire(&self) -> Duration {
        let mut last_call = self.last_call.lock().await;

        let waited = match *last_call {
            Some(previous) => {
                let elapsed = previous.elapsed();
                if elapsed < self.min_interval {
                    let wait = self.min_interval - elapsed;
                    tracing::debug!(wait_ms = wait.as_millis() as u64, "Spacing outbound call");
                    tokio::time::sleep(wait).await;
                    wait
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };

        *last_call = Some(Instant::now());
        waited
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
