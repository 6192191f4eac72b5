//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions and an in-process fixed-window store.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Number of tracked keys above which expired windows are pruned
const PRUNE_THRESHOLD: usize = 4096;

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// One request per second
    fn default() -> Self {
        Self {
            max_requests: 1,
            window: Duration::from_secs(1),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Whole seconds until the window resets, never less than 1
    pub fn retry_after_secs(&self) -> u64 {
        let wait_ms = (self.reset_at_ms - Utc::now().timestamp_millis()).max(0) as u64;
        wait_ms.div_ceil(1000).max(1)
    }
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Rate limit backend failed: {0}")]
    Backend(String),
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and report whether it may proceed
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError>;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter kept in process memory
///
/// Suitable for a single-process deployment only; every replica would keep
/// its own counters.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.len() >= PRUNE_THRESHOLD {
            let before = windows.len();
            windows.retain(|_, w| now.duration_since(w.started) < config.window);
            tracing::debug!(
                pruned = before - windows.len(),
                remaining = windows.len(),
                "Pruned expired rate limit windows"
            );
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= config.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let left_in_window = config
            .window
            .saturating_sub(now.duration_since(window.started));
        let reset_at_ms = Utc::now().timestamp_millis() + left_in_window.as_millis() as i64;

        if window.count >= config.max_requests {
            return Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms,
            });
        }

        window.count += 1;

        Ok(RateLimitResult {
            allowed: true,
            remaining: config.max_requests - window.count,
            reset_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryRateLimitStore, RateLimitConfig, RateLimitResult, RateLimitStore};
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_one_per_second() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 1);
        assert_eq!(config.window, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_second_request_in_window_is_rejected() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::default();

        let first = store.check_and_increment("user:1", &config).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.remaining, 0);

        let second = store.check_and_increment("user:1", &config).await.unwrap();
        assert!(!second.allowed);
        assert!(second.retry_after_secs() >= 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::default();

        assert!(store.check_and_increment("user:1", &config).await.unwrap().allowed);
        assert!(store.check_and_increment("user:2", &config).await.unwrap().allowed);
        assert!(store.check_and_increment("ip:127.0.0.1", &config).await.unwrap().allowed);
        assert_eq!(store.tracked_keys().await, 3);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig {
            max_requests: 2,
            window: Duration::from_millis(50),
        };

        assert!(store.check_and_increment("k", &config).await.unwrap().allowed);
        assert!(store.check_and_increment("k", &config).await.unwrap().allowed);
        assert!(!store.check_and_increment("k", &config).await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(80)).await;

        let after = store.check_and_increment("k", &config).await.unwrap();
        assert!(after.allowed);
        assert_eq!(after.remaining, 1);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            reset_at_ms: Utc::now().timestamp_millis() + 1500,
        };
        assert_eq!(result.retry_after_secs(), 2);

        let past = RateLimitResult {
            allowed: false,
            remaining: 0,
            reset_at_ms: 0,
        };
        assert_eq!(past.retry_after_secs(), 1);
    }
}
