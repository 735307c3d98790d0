//! Shared types for the intersection controller.

use std::fmt;

/// Controller steps per simulated second. One tick is 1/10 of a second.
pub const TICKS_PER_SECOND: u64 = 10;

/// One of the two controlled traffic directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approach {
    NorthSouth,
    WestEast,
}

/// Signal color shown to one approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Green,
    Yellow,
    Red,
}

impl LightColor {
    /// Console glyph for this color.
    pub fn glyph(&self) -> &'static str {
        match self {
            LightColor::Green => "-V-",
            LightColor::Yellow => "-Y-",
            LightColor::Red => "-X-",
        }
    }
}

/// The pair of colors shown at one instant, as published to display consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightState {
    pub ns: LightColor,
    pub we: LightColor,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.ns.glyph(), self.we.glyph())
    }
}
