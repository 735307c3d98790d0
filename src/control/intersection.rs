//! The intersection controller owning all per-run state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use super::arrivals::ArrivalSimulator;
use super::clock::TickClock;
use super::config::ControllerConfig;
use super::error::ControllerError;
use super::events::{EventSinks, PeriodRecord};
use super::scheduler::{Phase, PhaseScheduler};
use super::stats::RunStats;
use super::timing::recompute_switch_time;
use super::types::{Approach, LightState};

/// Outcome of one controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The run continues.
    Running,
    /// The configured run length is exhausted. Further steps are no-ops.
    Halted,
}

/// Options for driving a controller to completion with `run_to_halt`.
#[derive(Default)]
pub struct RunOptions {
    /// Wall-clock delay inserted after each tick. 100ms per tick paces the
    /// run at real time.
    pub tick_delay: Option<Duration>,
    /// Cooperative stop flag, checked only between ticks so a transition in
    /// progress is never torn mid-step.
    pub stop: Option<Arc<AtomicBool>>,
    /// Externally reported arrivals, drained without blocking before each
    /// tick.
    pub arrival_source: Option<Receiver<Approach>>,
}

/// A two-approach intersection under adaptive control.
///
/// One instance owns the clock, the phase machine, the arrival counters and
/// the switch time. All state changes happen inside `step`, on the thread
/// that owns the controller; other threads talk to it only through the
/// bounded event channels and the run options.
#[derive(Debug)]
pub struct IntersectionController {
    config: ControllerConfig,
    clock: TickClock,
    scheduler: PhaseScheduler,
    arrivals: ArrivalSimulator,
    elapsed_seconds: u32,
    switch_time: u32,
    ns_count: u32,
    we_count: u32,
    sinks: EventSinks,
    stats: RunStats,
    halted: bool,
}

impl IntersectionController {
    /// Build a controller from a validated configuration. Arrival draws come
    /// from the thread RNG, so every run is different.
    pub fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        Self::new_internal(config, ArrivalSimulator::new())
    }

    /// Build a controller whose arrival draws come from a seeded RNG, for
    /// reproducible runs.
    pub fn new_with_seed(config: ControllerConfig, seed: u64) -> Result<Self, ControllerError> {
        Self::new_internal(config, ArrivalSimulator::with_seed(seed))
    }

    fn new_internal(
        config: ControllerConfig,
        arrivals: ArrivalSimulator,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(Self {
            config,
            clock: TickClock::new(config.total_run_seconds),
            scheduler: PhaseScheduler::new(config.yellow_duration),
            arrivals,
            elapsed_seconds: 0,
            switch_time: config.initial_switch_time,
            ns_count: 0,
            we_count: 0,
            sinks: EventSinks::new(),
            stats: RunStats::default(),
            halted: false,
        })
    }

    /// Attach the display sink. Every light change is pushed to it with
    /// `try_send`.
    pub fn attach_display(&mut self, sender: SyncSender<LightState>) {
        self.sinks.display = Some(sender);
    }

    /// Attach the telemetry sink. Every period record is pushed to it with
    /// `try_send`.
    pub fn attach_telemetry(&mut self, sender: SyncSender<PeriodRecord>) {
        self.sinks.telemetry = Some(sender);
    }

    /// Credit one externally observed vehicle to an approach, as a sensor
    /// feed would. Injected arrivals join the same counters the random draws
    /// fill and are consumed by the next recompute.
    pub fn record_arrival(&mut self, approach: Approach) {
        match approach {
            Approach::NorthSouth => {
                self.ns_count += 1;
                self.stats.ns_arrivals += 1;
            }
            Approach::WestEast => {
                self.we_count += 1;
                self.stats.we_arrivals += 1;
            }
        }
    }

    /// Advance the controller by one tick (1/10 of a simulated second).
    ///
    /// Nine out of ten ticks only move the clock. On a second boundary the
    /// per-second work runs: arrival draws, period accounting, then the
    /// transition checks. Once the run length is exhausted the controller
    /// reports `Halted` and stays put.
    pub fn step(&mut self) -> Result<StepOutcome, ControllerError> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }
        let signal = self.clock.advance();
        if signal.second_boundary {
            self.on_second_boundary()?;
        }
        if signal.halt {
            self.halted = true;
            info!("run complete after {} seconds", self.clock.seconds());
            return Ok(StepOutcome::Halted);
        }
        Ok(StepOutcome::Running)
    }

    /// Drive the controller until it halts or the stop flag is raised.
    /// Returns the final statistics.
    pub fn run_to_halt(&mut self, options: RunOptions) -> Result<RunStats, ControllerError> {
        loop {
            if let Some(stop) = &options.stop {
                if stop.load(Ordering::SeqCst) {
                    info!("stop requested, ending run at tick {}", self.clock.tick());
                    break;
                }
            }
            if let Some(source) = &options.arrival_source {
                loop {
                    match source.try_recv() {
                        Ok(approach) => self.record_arrival(approach),
                        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                    }
                }
            }
            if self.step()? == StepOutcome::Halted {
                break;
            }
            if let Some(delay) = options.tick_delay {
                thread::sleep(delay);
            }
        }
        Ok(self.stats())
    }

    fn on_second_boundary(&mut self) -> Result<(), ControllerError> {
        let draw = self.arrivals.sample();
        if draw.ns {
            self.record_arrival(Approach::NorthSouth);
        }
        if draw.we {
            self.record_arrival(Approach::WestEast);
        }

        self.elapsed_seconds += 1;
        debug!(
            "second {} (tick {}): elapsed {} of period {}",
            self.clock.seconds(),
            self.clock.tick(),
            self.elapsed_seconds,
            self.config.period
        );

        // A period boundary recomputes first and then raises the same switch
        // request a plain switch-time second would.
        let switch_requested = if self.elapsed_seconds == self.config.period {
            self.finish_period()?;
            true
        } else {
            self.elapsed_seconds == self.switch_time
        };

        let mut transition_started = false;
        if switch_requested {
            if let Some(state) = self.scheduler.request_switch() {
                transition_started = true;
                self.stats.transitions_started += 1;
                info!("lights changed: {state}");
                self.sinks.emit_lights(state);
            } else {
                self.stats.switch_requests_ignored += 1;
            }
        }

        // Only a transition that was already running when this second began
        // moves its yellow timer; one started just above waits until the
        // next second.
        if !transition_started {
            if let Some(state) = self.scheduler.advance_yellow() {
                self.stats.transitions_completed += 1;
                info!("lights changed: {state}");
                self.sinks.emit_lights(state);
            }
        }

        Ok(())
    }

    /// Close out the period that just ended: recompute the switch time from
    /// the counts, publish the record, and reset the per-period state.
    fn finish_period(&mut self) -> Result<(), ControllerError> {
        let old = self.switch_time;
        let new = recompute_switch_time(self.ns_count, self.we_count, self.config.period);
        if new == 0 || new >= self.config.period {
            return Err(ControllerError::Invariant {
                reason: format!(
                    "recomputed switch time {new} outside [1, {}]",
                    self.config.period - 1
                ),
            });
        }
        debug!(
            "period ended at second {}: {} NS and {} WE cars, switch time {} -> {}",
            self.clock.seconds(),
            self.ns_count,
            self.we_count,
            old,
            new
        );
        self.sinks.emit_period(PeriodRecord {
            at_second: self.clock.seconds(),
            ns_cars: self.ns_count,
            we_cars: self.we_count,
            old_switch_time: old,
            new_switch_time: new,
        });
        self.switch_time = new;
        self.ns_count = 0;
        self.we_count = 0;
        self.elapsed_seconds = 0;
        self.stats.periods_completed += 1;
        Ok(())
    }

    /// Colors currently shown to the two approaches.
    pub fn lights(&self) -> LightState {
        self.scheduler.lights()
    }

    /// Current phase of the light schedule.
    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Switch time in force for the current period.
    pub fn switch_time(&self) -> u32 {
        self.switch_time
    }

    /// Seconds elapsed within the current period.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Ticks advanced so far.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Arrivals counted so far in the current period.
    pub fn arrival_count(&self, approach: Approach) -> u32 {
        match approach {
            Approach::NorthSouth => self.ns_count,
            Approach::WestEast => self.we_count,
        }
    }

    /// Statistics for the run so far.
    pub fn stats(&self) -> RunStats {
        let mut stats = self.stats.clone();
        stats.seconds_elapsed = self.clock.seconds();
        stats.final_switch_time = self.switch_time;
        stats.events_dropped = self.sinks.dropped();
        stats
    }
}
