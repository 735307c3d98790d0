//! Outbound events for display and telemetry consumers.

use std::sync::mpsc::{SyncSender, TrySendError};

use log::{debug, warn};

use super::types::LightState;

/// One telemetry record, published at each period boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRecord {
    /// Total simulated seconds when the period ended.
    pub at_second: u64,
    /// North-south arrivals counted during the period.
    pub ns_cars: u32,
    /// West-east arrivals counted during the period.
    pub we_cars: u32,
    /// Switch time the period ran with.
    pub old_switch_time: u32,
    /// Switch time recomputed for the next period.
    pub new_switch_time: u32,
}

/// Sinks the controller pushes events into.
///
/// Both channels are bounded and written with `try_send`. A full or
/// disconnected sink drops the event and bumps a counter, so a slow consumer
/// can never stall the stepping thread. The first drop of a run is logged at
/// warn, the rest at debug.
#[derive(Debug, Default)]
pub struct EventSinks {
    pub(crate) display: Option<SyncSender<LightState>>,
    pub(crate) telemetry: Option<SyncSender<PeriodRecord>>,
    dropped: u64,
}

impl EventSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit_lights(&mut self, state: LightState) {
        if let Some(tx) = &self.display {
            if let Err(err) = tx.try_send(state) {
                self.dropped += 1;
                log_drop(self.dropped, "light change", err_kind(&err));
            }
        }
    }

    pub(crate) fn emit_period(&mut self, record: PeriodRecord) {
        if let Some(tx) = &self.telemetry {
            if let Err(err) = tx.try_send(record) {
                self.dropped += 1;
                log_drop(self.dropped, "period record", err_kind(&err));
            }
        }
    }

    /// Events dropped because a sink was full or disconnected.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

fn log_drop(total_dropped: u64, what: &str, why: &str) {
    if total_dropped == 1 {
        warn!("dropping {what}, sink is {why} (further drops reported at debug)");
    } else {
        debug!("dropping {what}, sink is {why}");
    }
}

fn err_kind<T>(err: &TrySendError<T>) -> &'static str {
    match err {
        TrySendError::Full(_) => "full",
        TrySendError::Disconnected(_) => "disconnected",
    }
}
