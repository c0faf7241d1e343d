//! Fixed-delay pacing for polite, strictly sequential API access.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Enforces a minimum delay between consecutive requests.
pub struct Throttle {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    /// `min_delay_ms` is the minimum gap between any two requests.
    pub fn new(min_delay_ms: u64) -> Self {
        Self {
            min_delay: Duration::from_millis(min_delay_ms),
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the configured delay has passed since the previous call.
    /// The first call returns immediately.
    pub async fn pause(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_delay {
                sleep(self.min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
