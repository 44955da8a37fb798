use std::borrow::Cow;
use std::time::Instant;

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Robot state observed at one tick.
///
/// Produced once per period by the executor (or a sensing subsystem) and shared read-only by
/// every element on the active path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenseInfo {
    pub measured_velocity: f64,
    pub measured_x: f64,
    pub is_flinching: bool,
    pub is_knee_jerking: bool,
    pub timestamp: Instant,
}

impl SenseInfo {
    pub fn at(timestamp: Instant) -> Self {
        Self {
            measured_velocity: 0.0,
            measured_x: 0.0,
            is_flinching: false,
            is_knee_jerking: false,
            timestamp,
        }
    }

    pub fn with_position(mut self, x: f64) -> Self {
        self.measured_x = x;
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.measured_velocity = velocity;
        self
    }
}

/// The single commanded quantity applied to the robot each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuateCmd {
    pub velocity: f64,
}

impl ActuateCmd {
    pub const STOP: ActuateCmd = ActuateCmd { velocity: 0.0 };

    pub fn velocity(velocity: f64) -> Self {
        Self { velocity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutcomeValue {
    Running,
    Success,
    Fail,
}

impl OutcomeValue {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OutcomeValue::Running)
    }
}

/// Result of ticking an element: its status plus the command it wants applied.
///
/// Every outcome carries a command so the robot is driven on every tick, terminal ticks included.
/// The default outcome is a failure with a zero-velocity command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    pub value: OutcomeValue,
    pub actuate: ActuateCmd,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            value: OutcomeValue::Fail,
            actuate: ActuateCmd::STOP,
        }
    }
}

impl Outcome {
    pub fn new(value: OutcomeValue, actuate: ActuateCmd) -> Self {
        Self { value, actuate }
    }

    pub fn running(actuate: ActuateCmd) -> Self {
        Self::new(OutcomeValue::Running, actuate)
    }

    pub fn success(actuate: ActuateCmd) -> Self {
        Self::new(OutcomeValue::Success, actuate)
    }

    pub fn fail(actuate: ActuateCmd) -> Self {
        Self::new(OutcomeValue::Fail, actuate)
    }

    pub fn is_running(&self) -> bool {
        self.value == OutcomeValue::Running
    }

    pub fn is_terminal(&self) -> bool {
        self.value.is_terminal()
    }
}

/// Identity of an element for one initialize/finalize cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMeta {
    pub name: Cow<'static, str>,
}

impl ElementMeta {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Per-category reflex declaration of a leaf behavior.
///
/// There is no "unspecified" value: a leaf that does not declare both categories does not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReactionDef {
    Disabled,
    Enabled,
}

impl ReactionDef {
    pub const fn is_enabled(self) -> bool {
        matches!(self, ReactionDef::Enabled)
    }
}

bitflags! {
    /// Set of reflex categories handed to the reaction service.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ReactionMask: u32 {
        const KNEE_JERK = 1 << 0;
        const FLINCH = 1 << 1;
    }
}

impl ReactionMask {
    /// Build the mask of categories declared `Enabled`.
    pub const fn from_defs(knee_jerk: ReactionDef, flinch: ReactionDef) -> Self {
        let mut bits = 0;
        if knee_jerk.is_enabled() {
            bits |= Self::KNEE_JERK.bits();
        }
        if flinch.is_enabled() {
            bits |= Self::FLINCH.bits();
        }
        Self::from_bits_retain(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_outcome_is_fail_with_stop_command() {
        let outcome = Outcome::default();
        assert_eq!(outcome.value, OutcomeValue::Fail);
        assert_eq!(outcome.actuate, ActuateCmd::STOP);
        assert!(outcome.is_terminal());
    }

    #[test]
    fn mask_bits_follow_declarations() {
        use ReactionDef::{Disabled, Enabled};

        assert_eq!(ReactionMask::from_defs(Disabled, Disabled), ReactionMask::empty());
        assert_eq!(ReactionMask::from_defs(Enabled, Disabled), ReactionMask::KNEE_JERK);
        assert_eq!(ReactionMask::from_defs(Disabled, Enabled), ReactionMask::FLINCH);
        assert_eq!(ReactionMask::from_defs(Enabled, Enabled).bits(), 0b11);
    }

    #[test]
    fn only_running_is_non_terminal() {
        assert!(!OutcomeValue::Running.is_terminal());
        assert!(OutcomeValue::Success.is_terminal());
        assert!(OutcomeValue::Fail.is_terminal());
    }
}
