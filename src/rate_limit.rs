use std::thread::sleep;
use std::time::Duration;

/// Fixed inter-video pause. No adaptive backoff: quota resilience is the
/// caller's job.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    delay: Duration,
    pauses: u32,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pauses: 0 }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of pauses taken so far (zero-length pauses included).
    pub fn pauses(&self) -> u32 {
        self.pauses
    }

    /// Block for the configured interval. Called once between consecutive videos.
    pub fn pause(&mut self) {
        self.pauses += 1;
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!("rate limit: sleeping {:?} before next video", self.delay);
        sleep(self.delay);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
