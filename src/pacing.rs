//! Pacing between registry lookups.
//!
//! The batch orchestrator asks its policy how long to wait before each
//! lookup and sleeps for that long. Swapping the policy changes the pacing
//! without touching the orchestration loop.

use std::time::Duration;

/// Default pause between two consecutive registry calls.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Decides the pause before the lookup at `index` (0-based) of a batch.
pub trait PacingPolicy: Send + Sync {
    fn delay_before(&self, index: usize) -> Duration;
}

/// Flat delay before every lookup except the first.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl PacingPolicy for FixedDelay {
    fn delay_before(&self, index: usize) -> Duration {
        if index == 0 {
            Duration::ZERO
        } else {
            self.delay
        }
    }
}

/// No pause at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl PacingPolicy for NoDelay {
    fn delay_before(&self, _index: usize) -> Duration {
        Duration::ZERO
    }
}
