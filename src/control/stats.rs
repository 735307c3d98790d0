//! Counters accumulated over one run.

/// Summary numbers for a finished (or stopped) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Whole simulated seconds completed.
    pub seconds_elapsed: u64,
    /// Periods that reached their boundary and recomputed the switch time.
    pub periods_completed: u32,
    /// Transitions that began holding an approach on yellow.
    pub transitions_started: u32,
    /// Transitions that ran their yellow to completion.
    pub transitions_completed: u32,
    /// Vehicles counted on the north-south approach, random and injected.
    pub ns_arrivals: u32,
    /// Vehicles counted on the west-east approach, random and injected.
    pub we_arrivals: u32,
    /// Switch requests dropped because a transition was already running.
    pub switch_requests_ignored: u32,
    /// Events dropped on full or disconnected sinks.
    pub events_dropped: u64,
    /// Switch time in force when the run ended.
    pub final_switch_time: u32,
}

impl RunStats {
    /// One-line human readable summary for the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Seconds: {} | Periods: {} | Transitions: {} started, {} completed | Arrivals: {} NS, {} WE | Final switch time: {}s | Dropped events: {}",
            self.seconds_elapsed,
            self.periods_completed,
            self.transitions_started,
            self.transitions_completed,
            self.ns_arrivals,
            self.we_arrivals,
            self.final_switch_time,
            self.events_dropped,
        )
    }
}
