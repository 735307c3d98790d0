//! Controller behavior validation tests
//!
//! These tests drive the controller tick by tick and check the light
//! timeline, halt behavior, event delivery and run statistics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use signal_sim::control::{
    Approach, ControllerConfig, ControllerError, IntersectionController, LightColor, LightState,
    PeriodRecord, Phase, RunOptions, StepOutcome, TICKS_PER_SECOND,
};

fn step_seconds(controller: &mut IntersectionController, seconds: u32) {
    for _ in 0..(seconds as u64 * TICKS_PER_SECOND) {
        controller.step().expect("step should not fail");
    }
}

#[test]
fn test_controller_starts_with_ns_green() {
    let controller = IntersectionController::new(ControllerConfig::default())
        .expect("default config should be valid");
    assert_eq!(controller.phase(), Phase::NsGreenWeRed);
    assert_eq!(
        controller.lights(),
        LightState {
            ns: LightColor::Green,
            we: LightColor::Red,
        }
    );
    assert_eq!(controller.tick(), 0);
    assert_eq!(controller.switch_time(), 5);
}

#[test]
fn test_transition_begins_at_switch_time() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 7).unwrap();

    // Before the first period boundary the switch time is fixed at 5, so
    // the timeline does not depend on the seed.
    step_seconds(&mut controller, 4);
    assert_eq!(controller.phase(), Phase::NsGreenWeRed);

    step_seconds(&mut controller, 1);
    assert_eq!(controller.phase(), Phase::TransitionToWe);
    assert_eq!(
        controller.lights(),
        LightState {
            ns: LightColor::Yellow,
            we: LightColor::Red,
        }
    );
}

#[test]
fn test_transition_completes_after_yellow_duration() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 7).unwrap();

    // Switch at second 5, two seconds of yellow, green for west-east at 7.
    step_seconds(&mut controller, 6);
    assert_eq!(controller.phase(), Phase::TransitionToWe);

    step_seconds(&mut controller, 1);
    assert_eq!(controller.phase(), Phase::WeGreenNsRed);
    assert_eq!(
        controller.lights(),
        LightState {
            ns: LightColor::Red,
            we: LightColor::Green,
        }
    );
}

#[test]
fn test_period_boundary_hands_right_of_way_back() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 7).unwrap();

    step_seconds(&mut controller, 10);
    assert_eq!(controller.phase(), Phase::TransitionToNs);
    assert_eq!(
        controller.lights(),
        LightState {
            ns: LightColor::Red,
            we: LightColor::Yellow,
        }
    );

    step_seconds(&mut controller, 2);
    assert_eq!(controller.phase(), Phase::NsGreenWeRed);
}

#[test]
fn test_run_halts_exactly_at_final_tick() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 42).unwrap();

    let mut steps = 0u64;
    loop {
        steps += 1;
        if controller.step().unwrap() == StepOutcome::Halted {
            break;
        }
    }
    assert_eq!(steps, 30 * TICKS_PER_SECOND);
    assert_eq!(controller.tick(), 300);

    // Further steps report Halted without advancing the clock.
    assert_eq!(controller.step().unwrap(), StepOutcome::Halted);
    assert_eq!(controller.tick(), 300);
}

#[test]
fn test_final_second_boundary_is_still_processed() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 42).unwrap();
    let stats = controller.run_to_halt(RunOptions::default()).unwrap();

    // A 30 second run with a 10 second period closes exactly 3 periods,
    // including the one whose boundary lands on the final tick.
    assert_eq!(stats.seconds_elapsed, 30);
    assert_eq!(stats.periods_completed, 3);
}

#[test]
fn test_seconds_elapse_only_on_tick_boundaries() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 1).unwrap();

    for _ in 0..9 {
        controller.step().unwrap();
    }
    assert_eq!(controller.elapsed_seconds(), 0);

    controller.step().unwrap();
    assert_eq!(controller.elapsed_seconds(), 1);

    for _ in 0..9 {
        controller.step().unwrap();
    }
    assert_eq!(controller.elapsed_seconds(), 1);

    controller.step().unwrap();
    assert_eq!(controller.elapsed_seconds(), 2);
}

#[test]
fn test_lights_never_conflict_during_long_run() {
    let config = ControllerConfig {
        total_run_seconds: 600,
        ..ControllerConfig::default()
    };
    let mut controller = IntersectionController::new_with_seed(config, 99).unwrap();

    loop {
        let outcome = controller.step().unwrap();
        let lights = controller.lights();
        let valid = matches!(
            (lights.ns, lights.we),
            (LightColor::Green, LightColor::Red)
                | (LightColor::Red, LightColor::Green)
                | (LightColor::Yellow, LightColor::Red)
                | (LightColor::Red, LightColor::Yellow)
        );
        assert!(
            valid,
            "conflicting lights at tick {}: {:?}",
            controller.tick(),
            lights
        );
        if outcome == StepOutcome::Halted {
            break;
        }
    }
}

#[test]
fn test_same_seed_reproduces_the_same_run() {
    let run = |seed: u64| -> (Vec<LightState>, Vec<PeriodRecord>) {
        let config = ControllerConfig {
            total_run_seconds: 120,
            ..ControllerConfig::default()
        };
        let (display_tx, display_rx) = mpsc::sync_channel(1024);
        let (telemetry_tx, telemetry_rx) = mpsc::sync_channel(64);
        let mut controller = IntersectionController::new_with_seed(config, seed).unwrap();
        controller.attach_display(display_tx);
        controller.attach_telemetry(telemetry_tx);
        controller.run_to_halt(RunOptions::default()).unwrap();
        drop(controller);
        (display_rx.iter().collect(), telemetry_rx.iter().collect())
    };

    let (lights_a, periods_a) = run(1234);
    let (lights_b, periods_b) = run(1234);
    assert!(!lights_a.is_empty());
    assert!(!periods_a.is_empty());
    assert_eq!(lights_a, lights_b);
    assert_eq!(periods_a, periods_b);
}

#[test]
fn test_telemetry_reports_each_period_boundary() {
    let (telemetry_tx, telemetry_rx) = mpsc::sync_channel(16);
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 5).unwrap();
    controller.attach_telemetry(telemetry_tx);
    controller.run_to_halt(RunOptions::default()).unwrap();
    drop(controller);

    let records: Vec<PeriodRecord> = telemetry_rx.iter().collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].at_second, 10);
    assert_eq!(records[1].at_second, 20);
    assert_eq!(records[2].at_second, 30);

    // Each period starts with the switch time the previous one chose.
    assert_eq!(records[0].old_switch_time, 5);
    assert_eq!(records[1].old_switch_time, records[0].new_switch_time);
    assert_eq!(records[2].old_switch_time, records[1].new_switch_time);
    for record in &records {
        assert!((1..10).contains(&record.new_switch_time));
    }
}

#[test]
fn test_display_sink_sees_every_light_change() {
    let (display_tx, display_rx) = mpsc::sync_channel(64);
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 4).unwrap();
    controller.attach_display(display_tx);

    // Transition starts at second 5 and completes at 7.
    step_seconds(&mut controller, 8);
    drop(controller);

    let states: Vec<LightState> = display_rx.iter().collect();
    assert_eq!(
        states,
        vec![
            LightState {
                ns: LightColor::Yellow,
                we: LightColor::Red,
            },
            LightState {
                ns: LightColor::Red,
                we: LightColor::Green,
            },
        ]
    );
}

#[test]
fn test_injected_arrivals_feed_the_recompute() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 3).unwrap();

    // Swamp the north-south counter so random draws cannot change the
    // outcome: the recomputed split clamps at period - 1.
    for _ in 0..1000 {
        controller.record_arrival(Approach::NorthSouth);
    }
    assert_eq!(controller.arrival_count(Approach::NorthSouth), 1000);

    step_seconds(&mut controller, 10);
    assert_eq!(controller.switch_time(), 9);

    // The boundary consumed the counts.
    assert_eq!(controller.arrival_count(Approach::NorthSouth), 0);
    assert_eq!(controller.arrival_count(Approach::WestEast), 0);
}

#[test]
fn test_arrival_source_drains_between_ticks() {
    let (arrival_tx, arrival_rx) = mpsc::sync_channel(64);
    for _ in 0..50 {
        arrival_tx.send(Approach::WestEast).unwrap();
    }
    drop(arrival_tx);

    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 3).unwrap();
    let stats = controller
        .run_to_halt(RunOptions {
            arrival_source: Some(arrival_rx),
            ..RunOptions::default()
        })
        .unwrap();

    assert!(
        stats.we_arrivals >= 50,
        "injected arrivals missing from stats: {}",
        stats.we_arrivals
    );
}

#[test]
fn test_full_display_sink_never_blocks_the_run() {
    // Capacity 1 and a receiver that never reads: every change after the
    // first is dropped, and the run must still finish.
    let (display_tx, _display_rx) = mpsc::sync_channel(1);
    let config = ControllerConfig {
        total_run_seconds: 120,
        ..ControllerConfig::default()
    };
    let mut controller = IntersectionController::new_with_seed(config, 11).unwrap();
    controller.attach_display(display_tx);

    let stats = controller.run_to_halt(RunOptions::default()).unwrap();
    assert_eq!(controller.tick(), 1200);
    assert!(stats.events_dropped > 0);
}

#[test]
fn test_stop_flag_ends_the_run_between_ticks() {
    let stop = Arc::new(AtomicBool::new(false));
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 2).unwrap();

    for _ in 0..37 {
        controller.step().unwrap();
    }
    stop.store(true, Ordering::SeqCst);

    controller
        .run_to_halt(RunOptions {
            stop: Some(stop),
            ..RunOptions::default()
        })
        .unwrap();
    assert_eq!(controller.tick(), 37);
}

#[test]
fn test_period_boundary_during_transition_completes_yellow_first() {
    // Switch at 9 starts a 3 second yellow, so the period boundary at 10
    // lands mid-transition. Its request is dropped and the yellow runs on.
    let config = ControllerConfig {
        total_run_seconds: 40,
        period: 10,
        yellow_duration: 3,
        initial_switch_time: 9,
    };
    let mut controller = IntersectionController::new_with_seed(config, 8).unwrap();

    step_seconds(&mut controller, 9);
    assert_eq!(controller.phase(), Phase::TransitionToWe);

    step_seconds(&mut controller, 1);
    assert_eq!(controller.phase(), Phase::TransitionToWe);
    assert_eq!(controller.elapsed_seconds(), 0); // the period still rolled over

    step_seconds(&mut controller, 2);
    assert_eq!(controller.phase(), Phase::WeGreenNsRed);

    let stats = controller.stats();
    assert!(stats.switch_requests_ignored >= 1);
}

#[test]
fn test_run_stats_track_the_run() {
    let mut controller =
        IntersectionController::new_with_seed(ControllerConfig::default(), 21).unwrap();
    let stats = controller.run_to_halt(RunOptions::default()).unwrap();

    assert_eq!(stats.seconds_elapsed, 30);
    assert_eq!(stats.periods_completed, 3);
    assert!(stats.transitions_started >= 3);
    assert!(stats.transitions_completed >= 2);
    assert!((1..10).contains(&stats.final_switch_time));
    assert_eq!(stats.events_dropped, 0);
}

#[test]
fn test_config_rejects_out_of_range_fields() {
    let base = ControllerConfig::default();
    let bad_configs = [
        ControllerConfig {
            total_run_seconds: 0,
            ..base
        },
        ControllerConfig { period: 0, ..base },
        ControllerConfig { period: 1, ..base },
        ControllerConfig {
            yellow_duration: 0,
            ..base
        },
        ControllerConfig {
            initial_switch_time: 0,
            ..base
        },
        ControllerConfig {
            initial_switch_time: 10,
            ..base
        },
        ControllerConfig {
            initial_switch_time: 11,
            ..base
        },
    ];

    for config in bad_configs {
        let err = IntersectionController::new(config).expect_err("config should be rejected");
        assert!(
            matches!(err, ControllerError::Config { .. }),
            "unexpected error kind: {err:?}"
        );
    }
}

#[test]
fn test_config_accepts_documented_ranges() {
    for switch in 1..=9 {
        let config = ControllerConfig {
            initial_switch_time: switch,
            ..ControllerConfig::default()
        };
        assert!(
            IntersectionController::new(config).is_ok(),
            "switch time {switch} should be accepted"
        );
    }
}

#[test]
fn test_light_state_formats_console_glyphs() {
    let green_red = LightState {
        ns: LightColor::Green,
        we: LightColor::Red,
    };
    assert_eq!(green_red.to_string(), "-V-  -X-");

    let red_yellow = LightState {
        ns: LightColor::Red,
        we: LightColor::Yellow,
    };
    assert_eq!(red_yellow.to_string(), "-X-  -Y-");
}
