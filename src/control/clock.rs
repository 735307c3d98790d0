//! Tick clock at 1/10-second resolution.

use super::types::TICKS_PER_SECOND;

/// What one clock advance produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStep {
    /// This tick crossed a whole-second boundary.
    pub second_boundary: bool,
    /// The configured run length is exhausted after this tick.
    pub halt: bool,
}

/// Monotonic tick counter driving the controller.
///
/// A second boundary fires exactly once every `TICKS_PER_SECOND` ticks and is
/// never re-reported. The boundary landing on the final tick is still
/// reported, together with the halt.
#[derive(Debug, Clone)]
pub struct TickClock {
    tick: u64,
    total_ticks: u64,
}

impl TickClock {
    pub fn new(total_run_seconds: u32) -> Self {
        Self {
            tick: 0,
            total_ticks: total_run_seconds as u64 * TICKS_PER_SECOND,
        }
    }

    /// Advance by one tick.
    pub fn advance(&mut self) -> ClockStep {
        self.tick += 1;
        ClockStep {
            second_boundary: self.tick % TICKS_PER_SECOND == 0,
            halt: self.tick >= self.total_ticks,
        }
    }

    /// Ticks advanced so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Whole simulated seconds completed so far.
    pub fn seconds(&self) -> u64 {
        self.tick / TICKS_PER_SECOND
    }
}
