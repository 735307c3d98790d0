//! Standalone intersection control module
//!
//! This module contains the adaptive traffic light controller: a 1/10-second
//! tick clock, per-second arrival sampling, the light phase machine, and the
//! period-boundary recompute that splits green time between the approaches.
//! It runs headless and can be tested via console without any frontend.

mod arrivals;
mod clock;
mod config;
mod error;
mod events;
mod intersection;
mod scheduler;
mod stats;
mod timing;
mod types;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use arrivals::{ArrivalDraw, ArrivalSimulator};
#[allow(unused_imports)]
pub use clock::{ClockStep, TickClock};
#[allow(unused_imports)]
pub use config::{
    ControllerConfig, DEFAULT_PERIOD, DEFAULT_RUN_SECONDS, DEFAULT_SWITCH_TIME, DEFAULT_YELLOW,
};
#[allow(unused_imports)]
pub use error::ControllerError;
#[allow(unused_imports)]
pub use events::PeriodRecord;
#[allow(unused_imports)]
pub use intersection::{IntersectionController, RunOptions, StepOutcome};
#[allow(unused_imports)]
pub use scheduler::{Phase, PhaseScheduler};
#[allow(unused_imports)]
pub use stats::RunStats;
#[allow(unused_imports)]
pub use timing::recompute_switch_time;
pub use types::{Approach, LightColor, LightState, TICKS_PER_SECOND};
