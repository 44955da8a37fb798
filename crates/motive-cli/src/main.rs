//! motive CLI: walks the robot to a goal along x, then stops it.
//!
//! The mission runs on its own tokio task so the controller stays free for other work while the
//! executor drives the behavior tree.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use motive_bt::{Motion, SequenceElement};
use motive_exec::{Executor, ExecutorConfig, Pacing, RunReport};
use motive_motions::{Stop, WalkToPosition};

#[derive(Parser, Debug)]
#[command(name = "motive")]
#[command(about = "Walk to a position along x, then stop", version)]
struct Cli {
    /// Executor config (YAML); defaults apply when the file is absent
    #[arg(short, long, default_value = "motive.yaml")]
    config: PathBuf,

    /// Goal position along x, meters
    #[arg(short, long, default_value_t = 4.0, allow_negative_numbers = true)]
    goal: f64,

    /// Override the tick period
    #[arg(long)]
    period_ms: Option<u64>,

    /// Run on a virtual clock instead of sleeping between ticks
    #[arg(long)]
    simulated: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Cli {
    fn executor_config(&self) -> Result<ExecutorConfig> {
        let mut config = ExecutorConfig::load_or_default(&self.config)
            .with_context(|| format!("Failed to load config from {}", self.config.display()))?;
        if let Some(period_ms) = self.period_ms {
            config.period_ms = period_ms;
        }
        if self.simulated {
            config.pacing = Pacing::Simulated;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    match cli.log_format {
        LogFormat::Text => fmt().with_env_filter(filter).with_target(false).init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).init(),
    }

    let config = cli.executor_config()?;
    let mut executor = Executor::new(config).context("Invalid executor config")?;
    let goal = cli.goal;

    tracing::info!(goal, pacing = ?executor.config().pacing, "Starting mission");
    let mut mission = tokio::spawn(async move {
        let mut walk = Motion::new(WalkToPosition::new(goal));
        let mut stop = Motion::new(Stop);
        let mut sequence = SequenceElement::named("WalkThenStop", Vec::new())
            .with_child(&mut walk)
            .with_child(&mut stop);
        executor.run_async(&mut sequence).await
    });

    let report = wait_for_mission(&mut mission).await?;
    print_report(&report, cli.json)?;

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Keep the controller busy with periodic housekeeping until the mission task finishes.
async fn wait_for_mission(mission: &mut tokio::task::JoinHandle<RunReport>) -> Result<RunReport> {
    let mut housekeeping = tokio::time::interval(Duration::from_secs(1));
    housekeeping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut cycles = 0u64;

    loop {
        tokio::select! {
            joined = &mut *mission => {
                tracing::debug!(cycles, "Housekeeping stopped");
                return joined.context("Mission task panicked");
            }
            _ = housekeeping.tick() => {
                cycles += 1;
                tracing::debug!(cycles, "Housekeeping while mission runs");
            }
        }
    }
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let summary = serde_json::to_string_pretty(&report.summary())
            .context("Failed to serialize run summary")?;
        println!("{summary}");
    } else {
        println!(
            "{}: {:?} after {} ticks ({:.1}s), x = {:.3} m",
            report.root,
            report.outcome.value,
            report.ticks,
            report.elapsed.as_secs_f64(),
            report.final_sense.measured_x,
        );
    }
    Ok(())
}
