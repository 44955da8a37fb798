use motive_bt::{MotionContext, MotionElement};
use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};

/// Commands zero velocity and completes once measured motion has stopped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stop;

impl Stop {
    pub fn new() -> Self {
        Self
    }
}

impl MotionElement for Stop {
    const NAME: &'static str = "Stop";
    const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Enabled;
    const FLINCH_REACTION: ReactionDef = ReactionDef::Enabled;

    fn tick(&mut self, sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
        if sense.measured_velocity.abs() <= f64::EPSILON {
            Outcome::success(ActuateCmd::STOP)
        } else {
            Outcome::running(ActuateCmd::STOP)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use motive_bt::Motion;
    use motive_core::{BehaviorElement, OutcomeValue, ReactionMask};
    use motive_tools::Recorder;

    use super::*;

    #[test]
    fn stop_waits_for_zero_velocity() {
        let rec = Recorder::new();
        let mut stop = Motion::new(Stop);
        stop.initialize(rec.services());

        let moving = SenseInfo::at(Instant::now()).with_velocity(0.5);
        let out = stop.tick(&moving);
        assert_eq!(out.value, OutcomeValue::Running);
        assert_eq!(out.actuate, ActuateCmd::STOP);

        let backwards = moving.with_velocity(-1e-9);
        assert_eq!(stop.tick(&backwards).value, OutcomeValue::Running);

        let stopped = moving.with_velocity(0.0);
        assert_eq!(stop.tick(&stopped), Outcome::success(ActuateCmd::STOP));
        stop.finalize();

        assert_eq!(rec.snapshot().activations(), vec![ReactionMask::all()]);
        assert!(rec.snapshot().reactions_balanced());
    }

    #[test]
    fn velocity_within_epsilon_counts_as_stopped() {
        let mut stop = Motion::new(Stop);
        stop.initialize(Recorder::new().services());
        let sense = SenseInfo::at(Instant::now()).with_velocity(f64::EPSILON);
        assert!(stop.tick(&sense).is_terminal());
        stop.finalize();
    }
}
