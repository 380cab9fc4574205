//! Per-host request spacing for external probes.
//!
//! Requests to different hosts never wait for each other. Requests to the
//! same host serialize through that host's timestamp so consecutive probes
//! are at least `delay` apart.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::debug;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{Instant, sleep_until};

/// Last request time per host. `None` until the host is first contacted.
type HostSlot = Arc<AsyncMutex<Option<Instant>>>;

#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    hosts: Mutex<FxHashMap<String, HostSlot>>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hosts: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until a request to `url`'s host may be issued, then record it.
    ///
    /// URLs without a parsable host share a single slot.
    pub async fn acquire(&self, url: &str) {
        if self.delay.is_zero() {
            return;
        }

        let host = host_of(url);
        let slot = self.slot(&host);

        // Holding the host lock across the sleep keeps same-host callers in line
        let mut last_request = slot.lock().await;
        if let Some(previous) = *last_request {
            let ready_at = previous + self.delay;
            let now = Instant::now();
            if ready_at > now {
                debug!(
                    "Rate limiting {host}: waiting {}ms",
                    (ready_at - now).as_millis()
                );
                sleep_until(ready_at).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    fn slot(&self, host: &str) -> HostSlot {
        // The std lock is never held across an await point
        let mut hosts = match self.hosts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(hosts.entry(host.to_string()).or_default())
    }
}

/// Lowercased host of `url`, or an empty string when it has none.
pub fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://Example.com/a/b?c=d"), "example.com");
        assert_eq!(host_of("http://127.0.0.1:8080/x"), "127.0.0.1");
        assert_eq!(host_of("not a url"), "");
    }

    #[tokio::test]
    async fn test_acquire__first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        let start = Instant::now();

        limiter.acquire("https://example.com/a").await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_acquire__same_host_waits() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();

        limiter.acquire("https://example.com/a").await;
        limiter.acquire("https://example.com/b").await;

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_acquire__different_hosts_do_not_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        limiter.acquire("https://one.example.com/").await;
        limiter.acquire("https://two.example.com/").await;
        limiter.acquire("https://three.example.com/").await;

        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_acquire__concurrent_same_host_serializes() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(50)));
        let start = Instant::now();

        let tasks: Vec<_> = (0..3)
            .map(|i| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire(&format!("https://example.com/{i}")).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("task panicked");
        }

        // Three requests need two full gaps
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_acquire__zero_delay_disables() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();

        for _ in 0..10 {
            limiter.acquire("https://example.com/").await;
        }

        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
