use std::time::{Duration, Instant};

use motive_bt::{MotionContext, MotionElement};
use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};

pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_GOAL_THRESHOLD: f64 = 0.1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Walks along the x axis toward an absolute goal (meters) at constant speed.
///
/// Succeeds once within the goal threshold and fails when the timeout elapses first, measured from
/// the first tick of the cycle. While a knee-jerk reflex is in progress it commands zero velocity
/// and keeps running. Flinch reflexes stay unmasked while walking.
#[derive(Debug, Clone)]
pub struct WalkToPosition {
    goal_x: f64,
    speed: f64,
    goal_threshold: f64,
    timeout: Duration,
    started_at: Option<Instant>,
}

impl WalkToPosition {
    pub fn new(goal_x: f64) -> Self {
        Self {
            goal_x,
            speed: DEFAULT_SPEED,
            goal_threshold: DEFAULT_GOAL_THRESHOLD,
            timeout: DEFAULT_TIMEOUT,
            started_at: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed.abs();
        self
    }

    pub fn with_goal_threshold(mut self, threshold: f64) -> Self {
        self.goal_threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn goal(&self) -> f64 {
        self.goal_x
    }

    /// Timestamp latched on the first tick of the current cycle; `None` until that tick.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }
}

impl MotionElement for WalkToPosition {
    const NAME: &'static str = "WalkToPosition";
    const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Enabled;
    const FLINCH_REACTION: ReactionDef = ReactionDef::Disabled;

    fn on_initialize(&mut self, _ctx: &MotionContext<'_>) {
        self.started_at = None;
    }

    fn data_initialize(&mut self, sense: &SenseInfo, _ctx: &MotionContext<'_>) {
        self.started_at = Some(sense.timestamp);
    }

    fn tick(&mut self, sense: &SenseInfo, ctx: &MotionContext<'_>) -> Outcome {
        let dist_x = self.goal_x - sense.measured_x;
        // Keep commanding motion on the terminal tick; the next element takes over from here.
        let velocity = if dist_x >= 0.0 { self.speed } else { -self.speed };
        let elapsed = self
            .started_at
            .map(|start| sense.timestamp.saturating_duration_since(start))
            .unwrap_or_default();

        if dist_x.abs() < self.goal_threshold {
            ctx.notify("goal reached");
            Outcome::success(ActuateCmd::velocity(velocity))
        } else if elapsed > self.timeout {
            ctx.notify("timeout");
            Outcome::fail(ActuateCmd::velocity(velocity))
        } else if sense.is_knee_jerking {
            // The reflex owns the robot now; command zero and keep going once it settles.
            Outcome::running(ActuateCmd::STOP)
        } else {
            ctx.notify(&format!(
                "velocity={velocity:.6} pos={:.6} dist={dist_x:.6} goal={:.6}",
                sense.measured_x, self.goal_x
            ));
            Outcome::running(ActuateCmd::velocity(velocity))
        }
    }
}
