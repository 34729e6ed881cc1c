//! Randomized pause between page requests.
//!
//! Rapid, evenly spaced requests are what the provider's abuse defenses key
//! on. A random delay in `[0, max_delay_ms]` between fetches lowers the
//! chance of hitting the challenge page. It is off unless configured.

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    max_delay_ms: u64,
}

impl Pacing {
    #[must_use]
    pub fn new(max_delay_ms: u64) -> Self {
        Self { max_delay_ms }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_delay_ms > 0
    }

    /// Draws the next delay from `rng`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if !self.is_enabled() {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.random_range(0..=self.max_delay_ms))
    }

    /// Sleeps for a freshly drawn delay. Returns immediately when disabled.
    pub async fn pause(&self) {
        let delay = self.next_delay(&mut rand::rng());
        if delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = delay.as_millis(), "pausing before next request");
        tokio::time::sleep(delay).await;
    }
}
