use std::time::Duration;

use motive_core::{ActuateCmd, Outcome, OutcomeValue, SenseInfo};
use serde::Serialize;

/// What one executor run ended with.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Name the root element reported at initialize.
    pub root: String,
    /// The terminal outcome of the root element.
    pub outcome: Outcome,
    pub ticks: u64,
    /// State after the last command was applied.
    pub final_sense: SenseInfo,
    /// Time between the first and the last tick, on the executor's clock.
    pub elapsed: Duration,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.value == OutcomeValue::Success
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            root: self.root.clone(),
            outcome: self.outcome.value,
            last_command: self.outcome.actuate,
            ticks: self.ticks,
            final_x: self.final_sense.measured_x,
            final_velocity: self.final_sense.measured_velocity,
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// Serializable view of a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub root: String,
    pub outcome: OutcomeValue,
    pub last_command: ActuateCmd,
    pub ticks: u64,
    pub final_x: f64,
    pub final_velocity: f64,
    pub elapsed_ms: u64,
}
