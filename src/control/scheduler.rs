//! Light-phase state machine for the two approaches.

use log::debug;

use super::types::{LightColor, LightState};

/// Phase of the light schedule.
///
/// The two steady phases grant right-of-way to one approach. The two
/// transition phases hold the leaving approach on yellow while the other
/// stays red, so a conflicting green is impossible by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// North-south holds green, west-east waits on red.
    NsGreenWeRed,
    /// North-south is winding down on yellow before west-east gets green.
    TransitionToWe,
    /// West-east holds green, north-south waits on red.
    WeGreenNsRed,
    /// West-east is winding down on yellow before north-south gets green.
    TransitionToNs,
}

impl Phase {
    /// Colors shown to each approach during this phase.
    pub fn lights(&self) -> LightState {
        match self {
            Phase::NsGreenWeRed => LightState {
                ns: LightColor::Green,
                we: LightColor::Red,
            },
            Phase::TransitionToWe => LightState {
                ns: LightColor::Yellow,
                we: LightColor::Red,
            },
            Phase::WeGreenNsRed => LightState {
                ns: LightColor::Red,
                we: LightColor::Green,
            },
            Phase::TransitionToNs => LightState {
                ns: LightColor::Red,
                we: LightColor::Yellow,
            },
        }
    }
}

/// Drives the phase machine: starts transitions on request and walks the
/// yellow timer forward one second at a time.
#[derive(Debug)]
pub struct PhaseScheduler {
    phase: Phase,
    yellow_timer: u32,
    yellow_duration: u32,
}

impl PhaseScheduler {
    /// A fresh scheduler starts with north-south on green.
    pub fn new(yellow_duration: u32) -> Self {
        Self {
            phase: Phase::NsGreenWeRed,
            yellow_timer: 0,
            yellow_duration,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn lights(&self) -> LightState {
        self.phase.lights()
    }

    /// Begin handing right-of-way away from the approach holding green.
    ///
    /// Returns the new light state when a transition starts. A request that
    /// lands while a transition is already running is dropped, so an
    /// in-progress yellow always runs to completion.
    pub fn request_switch(&mut self) -> Option<LightState> {
        match self.phase {
            Phase::NsGreenWeRed => {
                self.phase = Phase::TransitionToWe;
                self.yellow_timer = 0;
                Some(self.lights())
            }
            Phase::WeGreenNsRed => {
                self.phase = Phase::TransitionToNs;
                self.yellow_timer = 0;
                Some(self.lights())
            }
            Phase::TransitionToWe | Phase::TransitionToNs => {
                debug!("switch request dropped, a transition is already running");
                None
            }
        }
    }

    /// Advance a running transition by one second.
    ///
    /// Returns the new steady light state when the yellow completes,
    /// `None` otherwise. Steady phases have nothing to advance.
    pub fn advance_yellow(&mut self) -> Option<LightState> {
        match self.phase {
            Phase::TransitionToWe => {
                self.yellow_timer += 1;
                if self.yellow_timer >= self.yellow_duration {
                    self.phase = Phase::WeGreenNsRed;
                    Some(self.lights())
                } else {
                    None
                }
            }
            Phase::TransitionToNs => {
                self.yellow_timer += 1;
                if self.yellow_timer >= self.yellow_duration {
                    self.phase = Phase::NsGreenWeRed;
                    Some(self.lights())
                } else {
                    None
                }
            }
            Phase::NsGreenWeRed | Phase::WeGreenNsRed => None,
        }
    }
}
