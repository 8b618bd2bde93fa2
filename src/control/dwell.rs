//! Minimum dwell between physical fan-speed changes.
//!
//! The timer is measured from the *end* of one actuation sequence to the
//! *start* of the next.  It starts running at boot, so the very first change
//! is gated too.

use embassy_time::Duration;

/// Elapsed-time gate reset after every actuation.
#[derive(Debug, Clone, Copy)]
pub struct FanChangeTimer {
    min_dwell: Duration,
    /// Monotonic ms of the last reset (end of last actuation, or boot).
    since_ms: u64,
}

impl FanChangeTimer {
    pub fn new(min_dwell: Duration, now_ms: u64) -> Self {
        Self {
            min_dwell,
            since_ms: now_ms,
        }
    }

    /// Restart the dwell window at `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        self.since_ms = now_ms;
    }

    /// Time since the last reset.
    pub fn elapsed(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.since_ms))
    }

    /// Whether a new actuation may start at `now_ms`.
    pub fn has_elapsed(&self, now_ms: u64) -> bool {
        self.elapsed(now_ms) >= self.min_dwell
    }

    /// Time left before the gate opens (zero once open).
    pub fn remaining(&self, now_ms: u64) -> Duration {
        let elapsed = self.elapsed(now_ms);
        if elapsed >= self.min_dwell {
            Duration::from_ticks(0)
        } else {
            self.min_dwell - elapsed
        }
    }
}
