//! Runs a root behavior element to completion at a fixed period.
//!
//! The executor owns the only suspend point in a run: elements never block, it applies each
//! tick's command to a [`Plant`] and then waits one period (or, with simulated pacing, advances a
//! virtual clock by one period).

pub mod config;
pub mod error;
pub mod executor;
pub mod plant;
pub mod report;

pub use config::{ExecutorConfig, Pacing};
pub use error::{ExecutorError, ExecutorResult};
pub use executor::Executor;
pub use plant::{KinematicPlant, Plant};
pub use report::{RunReport, RunSummary};
