// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Retry Logic with Exponential Backoff
 * Bounded retry loops for rate-limited and flaky upstreams
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{ScannerError, ScannerResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration with exponential backoff. Every loop built on this is
/// bounded by `max_attempts`; there is no unbounded wait-and-recurse path.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
    /// Jitter spreads retries out so parallel clients do not stampede.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.3,
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Backoff duration before retry number `attempt` (1-based).
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let base = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);
        let capped = base.min(self.max_backoff.as_millis() as f64);

        let jittered = if self.jitter_factor > 0.0 {
            let mut rng = rand::rng();
            let range = capped * self.jitter_factor;
            (capped + rng.random_range(-range..range)).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(jittered as u64)
    }
}

/// Run `operation` until it succeeds, fails unretryably, or exhausts the
/// attempt budget. A server-provided delay (e.g. from a 429) takes
/// precedence over the computed backoff.
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> ScannerResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScannerResult<T>>,
{
    let mut attempt = 0;
    let mut last_error: Option<ScannerError> = None;

    while attempt < config.max_attempts {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        attempt = attempt,
                        operation = operation_name,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) => {
                warn!(
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    operation = operation_name,
                    error = %err,
                    "Operation failed"
                );

                if !err.is_retryable() {
                    return Err(err);
                }

                let custom_delay = err.retry_delay();
                last_error = Some(err);

                if attempt < config.max_attempts {
                    let backoff =
                        custom_delay.unwrap_or_else(|| config.calculate_backoff(attempt));
                    debug!(
                        attempt = attempt,
                        backoff_ms = backoff.as_millis(),
                        operation = operation_name,
                        "Backing off before retry"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ScannerError::Transport {
            url: operation_name.to_string(),
            message: format!("failed after {} attempts", config.max_attempts),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig::default()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: ScannerResult<()> = retry_with_backoff(&fast_config(), "always-fails", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ScannerError::RateLimited { retry_after: None })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn recovers_on_later_attempt() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&fast_config(), "flaky", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(ScannerError::Transport {
                        url: "http://flaky.example".to_string(),
                        message: "connection reset".to_string(),
                    })
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unretryable_errors_abort_immediately() {
        let calls = AtomicU32::new(0);
        let result: ScannerResult<()> = retry_with_backoff(&fast_config(), "fatal", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ScannerError::Configuration("bad".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
