use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use signal_sim::control::{
    ControllerConfig, IntersectionController, LightState, PeriodRecord, RunOptions,
};

/// Light changes buffered for the display thread.
const DISPLAY_QUEUE_CAPACITY: usize = 64;
/// Period records buffered for the telemetry thread.
const TELEMETRY_QUEUE_CAPACITY: usize = 16;

#[derive(Parser)]
#[command(name = "signal_sim")]
#[command(about = "Adaptive traffic light control for a two-approach intersection")]
struct Cli {
    /// Total simulated run length in seconds
    #[arg(long, default_value = "30")]
    seconds: u32,

    /// Length of one light cycle in seconds
    #[arg(long, default_value = "10")]
    period: u32,

    /// Yellow phase duration in seconds
    #[arg(long, default_value = "2")]
    yellow: u32,

    /// Switch time within the first period, in seconds
    #[arg(long, default_value = "5")]
    switch: u32,

    /// Seed for the arrival RNG; omit for a different run every time
    #[arg(long)]
    seed: Option<u64>,

    /// Pace the run at real time (100ms per tick)
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ControllerConfig {
        total_run_seconds: cli.seconds,
        period: cli.period,
        yellow_duration: cli.yellow,
        initial_switch_time: cli.switch,
    };

    let mut controller = match cli.seed {
        Some(seed) => IntersectionController::new_with_seed(config, seed),
        None => IntersectionController::new(config),
    }
    .context("failed to start the intersection controller")?;

    // Display consumer: one glyph line per light change.
    let (display_tx, display_rx) = mpsc::sync_channel::<LightState>(DISPLAY_QUEUE_CAPACITY);
    controller.attach_display(display_tx);
    let display = thread::spawn(move || {
        while let Ok(state) = display_rx.recv() {
            println!("{state}");
        }
    });

    // Telemetry consumer: one line per period boundary.
    let (telemetry_tx, telemetry_rx) = mpsc::sync_channel::<PeriodRecord>(TELEMETRY_QUEUE_CAPACITY);
    controller.attach_telemetry(telemetry_tx);
    let telemetry = thread::spawn(move || {
        while let Ok(record) = telemetry_rx.recv() {
            println!(
                "[{}s] {} NS and {} WE cars this period, switch time {} -> {}",
                record.at_second,
                record.ns_cars,
                record.we_cars,
                record.old_switch_time,
                record.new_switch_time
            );
        }
    });

    println!(
        "Running intersection for {}s (period {}s, yellow {}s, switch time {}s)",
        cli.seconds, cli.period, cli.yellow, cli.switch
    );
    println!("{}", controller.lights());

    let options = RunOptions {
        tick_delay: cli.realtime.then(|| Duration::from_millis(100)),
        ..RunOptions::default()
    };
    let stats = controller
        .run_to_halt(options)
        .context("controller run failed")?;

    // Dropping the controller closes both sinks so the consumers exit.
    drop(controller);
    if display.join().is_err() {
        warn!("display thread panicked");
    }
    if telemetry.join().is_err() {
        warn!("telemetry thread panicked");
    }

    println!("=== Run complete ===");
    println!("{}", stats.summary());
    Ok(())
}
