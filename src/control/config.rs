//! Run configuration, validated once before the controller starts.

use super::error::ControllerError;

/// Default total run length in seconds.
pub const DEFAULT_RUN_SECONDS: u32 = 30;
/// Default length of one full light cycle in seconds.
pub const DEFAULT_PERIOD: u32 = 10;
/// Default yellow phase length in seconds.
pub const DEFAULT_YELLOW: u32 = 2;
/// Default second within the first period at which the handover begins.
pub const DEFAULT_SWITCH_TIME: u32 = 5;

/// Immutable settings for one controller run.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// How many simulated seconds the run covers.
    pub total_run_seconds: u32,
    /// Length of one full light cycle in seconds.
    pub period: u32,
    /// How many seconds a transition holds yellow before completing.
    pub yellow_duration: u32,
    /// Switch time used during the first period, before any recompute.
    pub initial_switch_time: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            total_run_seconds: DEFAULT_RUN_SECONDS,
            period: DEFAULT_PERIOD,
            yellow_duration: DEFAULT_YELLOW,
            initial_switch_time: DEFAULT_SWITCH_TIME,
        }
    }
}

impl ControllerConfig {
    /// Check every field against its documented range, reporting the first
    /// offender as a `ControllerError::Config`.
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.total_run_seconds == 0 {
            return Err(Self::reject("total run length must be at least 1 second"));
        }
        if self.period < 2 {
            return Err(Self::reject(format!(
                "period {} is too short, a cycle needs at least 2 seconds",
                self.period
            )));
        }
        if self.yellow_duration == 0 {
            return Err(Self::reject("yellow duration must be at least 1 second"));
        }
        if self.initial_switch_time == 0 || self.initial_switch_time >= self.period {
            return Err(Self::reject(format!(
                "initial switch time {} outside [1, {}]",
                self.initial_switch_time,
                self.period - 1
            )));
        }
        Ok(())
    }

    fn reject(reason: impl Into<String>) -> ControllerError {
        ControllerError::Config {
            reason: reason.into(),
        }
    }
}
