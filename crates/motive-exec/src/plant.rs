use std::time::Duration;

use motive_core::{ActuateCmd, SenseInfo};

/// The physical side of the loop: turns a command into the next measured state.
///
/// Called exactly once per period, after the root element has ticked.
pub trait Plant: Send {
    fn apply(&mut self, sense: &mut SenseInfo, cmd: ActuateCmd, period: Duration);
}

/// Ideal point mass that reaches the commanded velocity instantly.
#[derive(Debug, Default, Clone, Copy)]
pub struct KinematicPlant;

impl Plant for KinematicPlant {
    fn apply(&mut self, sense: &mut SenseInfo, cmd: ActuateCmd, period: Duration) {
        sense.measured_x += cmd.velocity * period.as_secs_f64();
        sense.measured_velocity = cmd.velocity;
    }
}

impl<P: Plant + ?Sized> Plant for Box<P> {
    fn apply(&mut self, sense: &mut SenseInfo, cmd: ActuateCmd, period: Duration) {
        (**self).apply(sense, cmd, period)
    }
}
