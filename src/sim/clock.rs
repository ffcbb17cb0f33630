//! Monotonic millisecond clock sampled once per frame

use serde::{Deserialize, Serialize};

/// Simulation clock. Only advances when the game ticks, so timers freeze
/// while the driver is paused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    now_ms: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn advance(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
    }
}
