mod classifier;
mod config;
mod dispatch;
mod pipeline;
mod tracks;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::classifier::{TrajectoryLabel, DEFAULT_LINEAR_TOLERANCE};
use crate::config::{ClassifierConfig, Config, InputConfig};
use crate::dispatch::ChannelConsumer;
use crate::pipeline::{RunReport, Runner};

#[derive(Parser)]
#[command(name = "track-classifier")]
#[command(about = "Classify vehicle trajectories from tracks.csv recordings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify all tracks and publish the summaries
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides input.path from the config
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Classify tracks and print the labels without publishing anything
    Check {
        path: PathBuf,
        #[arg(long, default_value = "tracks.csv")]
        suffix: String,
        #[arg(long, default_value_t = DEFAULT_LINEAR_TOLERANCE)]
        tolerance: f64,
        /// Keep rows in file order instead of sorting by frame
        #[arg(long)]
        keep_order: bool,
    },
    /// Print and acknowledge pending messages on one channel
    Consume {
        #[arg(short, long)]
        config: PathBuf,
        /// Channel name, or a trajectory label such as "Left Turn"
        #[arg(long)]
        channel: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, input } => run(config, input),
        Commands::Check {
            path,
            suffix,
            tolerance,
            keep_order,
        } => check(path, suffix, tolerance, !keep_order),
        Commands::Consume { config, channel } => consume(config, &channel),
    }
}

fn load_config(path: &Path) -> Option<Config> {
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path.display(), e);
            None
        }
    }
}

fn run(config_path: PathBuf, input: Option<PathBuf>) -> ExitCode {
    let Some(mut config) = load_config(&config_path) else {
        return ExitCode::FAILURE;
    };
    if let Some(input) = input {
        config.input.path = input;
    }

    let runner = Runner::from_config(&config);
    let report = match runner.run(&config.dispatch, config.report.dir.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Run failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_report(&report);
    if let Some(stats) = &report.dispatch {
        for (channel, count) in &stats.channels {
            println!("  -> {}: {}", channel, count);
        }
        if !stats.failures.is_empty() {
            println!("{} dispatch failures", stats.failures.len());
        }
    }
    ExitCode::SUCCESS
}

fn check(path: PathBuf, suffix: String, tolerance: f64, order_by_frame: bool) -> ExitCode {
    let runner = Runner {
        input: InputConfig { path, suffix },
        classifier: ClassifierConfig {
            linear_tolerance: tolerance,
            order_by_frame,
        },
    };

    let (report, summaries) = match runner.analyze() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Check failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for summary in &summaries {
        println!(
            "  {}/{}: {} (avg lon vel {:.2})",
            summary.recording_id, summary.track_id, summary.trajectory, summary.avg_lon_vel
        );
    }
    print_report(&report);
    ExitCode::SUCCESS
}

fn consume(config_path: PathBuf, channel: &str) -> ExitCode {
    let Some(config) = load_config(&config_path) else {
        return ExitCode::FAILURE;
    };

    // Accept a trajectory label in place of a channel name
    let channel = if TrajectoryLabel::ALL.iter().any(|l| l.channel() == channel) {
        channel
    } else {
        let routed = TrajectoryLabel::route(channel);
        log::info!("Label {:?} is routed to channel {}", channel, routed);
        routed
    };

    let consumer = ChannelConsumer::new(&config.dispatch, channel);
    match consumer.poll(|summary| match serde_json::to_string(summary) {
        Ok(json) => println!("Received message: {}", json),
        Err(e) => log::error!("Failed to render message: {}", e),
    }) {
        Ok(count) => {
            println!("{} new messages on {}", count, consumer.channel());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to read {}: {}", consumer.channel(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &RunReport) {
    println!(
        "Run {}: {} files, {} rows ({} dropped), {} tracks",
        report.run_id,
        report.inputs.len(),
        report.rows_read,
        report.dropped_rows.len(),
        report.tracks
    );
    for (label, count) in &report.labels {
        println!("  {}: {}", label, count);
    }
    println!(
        "{} classified, {} failed",
        report.classified(),
        report.failed_tracks.len()
    );
    for failure in &report.failed_tracks {
        println!("  failed {}: {}", failure.track, failure.error);
    }
}
