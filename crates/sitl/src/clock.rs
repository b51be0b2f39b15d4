//! Simulation clock backed by tokio time.
//!
//! Uses `tokio::time::Instant`, so a paused test runtime drives simulated
//! time deterministically.

use std::time::Duration;

use path_manager_core::traits::TimeSource;
use tokio::time::Instant;

/// Milliseconds since the clock was started.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Instant corresponding to `ms` on this clock.
    pub fn instant_at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }
}

impl TimeSource for TokioClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_clock_follows_paused_time() {
        let clock = TokioClock::start();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(clock.now_ms(), 250);
        assert_eq!(clock.elapsed_ms_since(100), 150);
    }
}
