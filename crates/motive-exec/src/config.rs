//! Executor configuration, loaded from YAML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, ExecutorResult};

/// How the executor waits between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// Sleep one period between ticks and stamp ticks with the wall clock.
    #[default]
    RealTime,
    /// Never sleep; tick `n` is stamped `start + n * period`.
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Tick period in milliseconds
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    #[serde(default)]
    pub pacing: Pacing,

    /// Starting position along x, meters
    #[serde(default)]
    pub initial_x: f64,

    /// Starting measured velocity, m/s
    #[serde(default)]
    pub initial_velocity: f64,
}

fn default_period_ms() -> u64 {
    100
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
            pacing: Pacing::default(),
            initial_x: 0.0,
            initial_velocity: 0.0,
        }
    }
}

impl ExecutorConfig {
    /// Same defaults, but paced on a virtual clock.
    pub fn simulated() -> Self {
        Self {
            pacing: Pacing::Simulated,
            ..Self::default()
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn validate(&self) -> ExecutorResult<()> {
        if self.period_ms == 0 {
            return Err(ExecutorError::ZeroPeriod);
        }
        Ok(())
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> ExecutorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ExecutorError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|source| ExecutorError::ParseConfig {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> ExecutorResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no executor config, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_controller_period() {
        let config = ExecutorConfig::default();
        assert_eq!(config.period(), Duration::from_millis(100));
        assert_eq!(config.pacing, Pacing::RealTime);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: ExecutorConfig =
            serde_yaml::from_str("pacing: simulated\ninitial_x: 1.5\n").unwrap();
        assert_eq!(config.pacing, Pacing::Simulated);
        assert_eq!(config.initial_x, 1.5);
        assert_eq!(config.period_ms, 100);
    }

    #[test]
    fn empty_mapping_is_the_default_config() {
        let config: ExecutorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ExecutorConfig::default());
    }

    #[test]
    fn zero_period_is_rejected() {
        let config = ExecutorConfig {
            period_ms: 0,
            ..ExecutorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ExecutorError::ZeroPeriod)));
    }
}
