//! Per-host request spacing.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces requests to the same host by at least `min_delay`.
///
/// Each caller reserves the next free slot for its host and sleeps until
/// then, so concurrent tasks hitting one host queue up while tasks for other
/// hosts proceed immediately.
#[derive(Debug)]
pub struct HostThrottle {
    next_slot: Mutex<HashMap<String, Instant>>,
    min_delay: Duration,
}

impl HostThrottle {
    /// Create a throttle; a zero delay disables spacing.
    #[must_use]
    pub fn new(min_delay: Duration) -> Self {
        Self {
            next_slot: Mutex::new(HashMap::new()),
            min_delay,
        }
    }

    /// Wait until a request to `host` may be sent.
    pub async fn acquire(&self, host: &str) {
        if self.min_delay.is_zero() {
            return;
        }

        let wait = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = slots
                .get(host)
                .copied()
                .filter(|slot| *slot > now)
                .unwrap_or(now);
            slots.insert(host.to_string(), slot + self.min_delay);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tracing::trace!(host, ?wait, "throttling request");
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_same_host_is_spaced() {
        let throttle = HostThrottle::new(Duration::from_millis(100));
        let start = Instant::now();

        throttle.acquire("boards.greenhouse.io").await;
        throttle.acquire("boards.greenhouse.io").await;
        throttle.acquire("boards.greenhouse.io").await;

        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_hosts_do_not_interfere() {
        let throttle = HostThrottle::new(Duration::from_millis(100));
        let start = Instant::now();

        throttle.acquire("boards.greenhouse.io").await;
        throttle.acquire("jobs.lever.co").await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_never_waits() {
        let throttle = HostThrottle::new(Duration::ZERO);
        let start = Instant::now();

        for _ in 0..5 {
            throttle.acquire("jobs.lever.co").await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
