use std::time::{Duration, Instant};

use motive_bt::{Motion, MotionContext, MotionElement};
use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};
use motive_exec::{Executor, ExecutorConfig, Pacing, Plant};

/// Runs for a fixed number of ticks, recording every timestamp it sees.
#[derive(Debug, Default)]
struct Countdown {
    remaining: u32,
    seen: Vec<Instant>,
}

impl MotionElement for Countdown {
    const NAME: &'static str = "Countdown";
    const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Disabled;
    const FLINCH_REACTION: ReactionDef = ReactionDef::Disabled;

    fn tick(&mut self, sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
        self.seen.push(sense.timestamp);
        if self.remaining == 0 {
            return Outcome::success(ActuateCmd::STOP);
        }
        self.remaining -= 1;
        Outcome::running(ActuateCmd::velocity(0.5))
    }
}

#[derive(Debug, Default)]
struct CountingPlant {
    applied: Vec<f64>,
}

impl Plant for CountingPlant {
    fn apply(&mut self, sense: &mut SenseInfo, cmd: ActuateCmd, _period: Duration) {
        self.applied.push(cmd.velocity);
        sense.measured_velocity = cmd.velocity;
    }
}

#[test]
fn simulated_ticks_are_one_period_apart() {
    let mut leaf = Motion::new(Countdown {
        remaining: 3,
        ..Countdown::default()
    });
    let report = Executor::new(ExecutorConfig::simulated()).unwrap().run(&mut leaf);

    let seen = &leaf.inner().seen;
    assert_eq!(seen.len(), 4);
    for pair in seen.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_millis(100));
    }
    assert_eq!(report.elapsed, Duration::from_millis(300));
}

#[test]
fn real_time_pacing_sleeps_between_ticks() {
    let config = ExecutorConfig {
        period_ms: 5,
        pacing: Pacing::RealTime,
        ..ExecutorConfig::default()
    };
    let mut leaf = Motion::new(Countdown {
        remaining: 3,
        ..Countdown::default()
    });
    let report = Executor::new(config).unwrap().run(&mut leaf);

    assert_eq!(report.ticks, 4);
    assert!(report.elapsed >= Duration::from_millis(15), "{:?}", report.elapsed);
}

#[test]
fn one_actuation_is_applied_per_tick() {
    let mut leaf = Motion::new(Countdown {
        remaining: 2,
        ..Countdown::default()
    });
    let mut exec = Executor::new(ExecutorConfig::simulated())
        .unwrap()
        .with_plant(CountingPlant::default());
    let report = exec.run(&mut leaf);

    assert_eq!(report.ticks, 3);
    assert_eq!(exec.plant().applied, vec![0.5, 0.5, 0.0]);
    assert_eq!(report.final_sense.measured_velocity, 0.0);
}

#[test]
fn executor_is_reusable_across_runs() {
    let mut exec = Executor::new(ExecutorConfig::simulated()).unwrap();
    let mut leaf = Motion::new(Countdown::default());

    for _ in 0..3 {
        leaf.inner_mut().remaining = 1;
        let report = exec.run(&mut leaf);
        assert!(report.succeeded());
        assert_eq!(report.ticks, 2);
    }
    assert_eq!(leaf.lifecycle().cycles(), 3);
}

#[test]
fn run_returns_without_waiting_after_the_terminal_tick() {
    let config = ExecutorConfig {
        period_ms: 500,
        pacing: Pacing::RealTime,
        ..ExecutorConfig::default()
    };
    let mut leaf = Motion::new(Countdown::default());

    let started = Instant::now();
    let report = Executor::new(config).unwrap().run(&mut leaf);

    assert_eq!(report.ticks, 1);
    assert!(started.elapsed() < Duration::from_millis(500));
}
