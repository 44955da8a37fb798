//! Adapter turning a small leaf definition into a full [`BehaviorElement`].
//!
//! A leaf author implements [`MotionElement`]: a name, both reflex declarations, and a per-tick
//! decision function. Wrapping it in [`Motion`] adds the parts every leaf must get right:
//! activating the leaf's reaction mask for exactly the span of one initialize/finalize cycle, and
//! running the one-time data hook on the first tick of each cycle.

use motive_core::lifecycle::trap;
use motive_core::{
    BehaviorElement, ElementMeta, Lifecycle, LifecycleError, MessengerService, Outcome,
    ReactionDef, ReactionMask, SenseInfo, Services,
};

/// Definition of a leaf behavior that actuates the robot.
///
/// `NAME`, `KNEE_JERK_REACTION` and `FLINCH_REACTION` have no defaults: a leaf that leaves one out
/// does not compile, and an empty `NAME` is rejected when the leaf is wrapped in [`Motion`].
///
/// ```
/// use motive_bt::{Motion, MotionContext, MotionElement};
/// use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};
///
/// struct Hold;
///
/// impl MotionElement for Hold {
///     const NAME: &'static str = "Hold";
///     const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Enabled;
///     const FLINCH_REACTION: ReactionDef = ReactionDef::Disabled;
///
///     fn tick(&mut self, _sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
///         Outcome::success(ActuateCmd::STOP)
///     }
/// }
///
/// let hold = Motion::new(Hold);
/// assert_eq!(hold.mask().bits(), 0b01);
/// ```
///
/// Leaving out a reflex declaration is a build error:
///
/// ```compile_fail,E0046
/// use motive_bt::{MotionContext, MotionElement};
/// use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};
///
/// struct NoFlinch;
///
/// impl MotionElement for NoFlinch {
///     const NAME: &'static str = "NoFlinch";
///     const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Enabled;
///
///     fn tick(&mut self, _sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
///         Outcome::success(ActuateCmd::STOP)
///     }
/// }
/// ```
///
/// ```compile_fail,E0046
/// use motive_bt::{MotionContext, MotionElement};
/// use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};
///
/// struct NoKneeJerk;
///
/// impl MotionElement for NoKneeJerk {
///     const NAME: &'static str = "NoKneeJerk";
///     const FLINCH_REACTION: ReactionDef = ReactionDef::Disabled;
///
///     fn tick(&mut self, _sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
///         Outcome::success(ActuateCmd::STOP)
///     }
/// }
/// ```
///
/// So is wrapping a leaf whose name is empty:
///
/// ```compile_fail,E0080
/// use motive_bt::{Motion, MotionContext, MotionElement};
/// use motive_core::{ActuateCmd, Outcome, ReactionDef, SenseInfo};
///
/// struct Nameless;
///
/// impl MotionElement for Nameless {
///     const NAME: &'static str = "";
///     const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Enabled;
///     const FLINCH_REACTION: ReactionDef = ReactionDef::Enabled;
///
///     fn tick(&mut self, _sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
///         Outcome::success(ActuateCmd::STOP)
///     }
/// }
///
/// let _leaf = Motion::new(Nameless);
/// ```
pub trait MotionElement: Send {
    const NAME: &'static str;
    const KNEE_JERK_REACTION: ReactionDef;
    const FLINCH_REACTION: ReactionDef;

    /// Called at the end of `initialize`, after the reaction mask is active.
    fn on_initialize(&mut self, _ctx: &MotionContext<'_>) {}

    /// Called once per cycle, on the first tick, before [`tick`](Self::tick).
    fn data_initialize(&mut self, _sense: &SenseInfo, _ctx: &MotionContext<'_>) {}

    fn tick(&mut self, sense: &SenseInfo, ctx: &MotionContext<'_>) -> Outcome;

    /// Called at the start of `finalize`, before the reaction mask is released.
    fn on_finalize(&mut self, _ctx: &MotionContext<'_>) {}
}

/// What a leaf may reach during a hook or tick.
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    name: &'static str,
    services: &'a Services,
}

impl<'a> MotionContext<'a> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn messenger(&self) -> &'a dyn MessengerService {
        self.services.messenger()
    }

    /// Notify under the leaf's own name.
    pub fn notify(&self, message: &str) {
        self.services.notify(self.name, message);
    }
}

pub struct Motion<M: MotionElement> {
    motion: M,
    services: Option<Services>,
    active_mask: Option<ReactionMask>,
    first_tick: bool,
    lifecycle: Lifecycle,
}

impl<M: MotionElement> Motion<M> {
    const NAME_IS_SET: () = assert!(!M::NAME.is_empty(), "MotionElement::NAME must not be empty");

    /// OR of the categories the leaf declares enabled.
    pub const MASK: ReactionMask =
        ReactionMask::from_defs(M::KNEE_JERK_REACTION, M::FLINCH_REACTION);

    pub fn new(motion: M) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NAME_IS_SET;
        Self {
            motion,
            services: None,
            active_mask: None,
            first_tick: true,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn mask(&self) -> ReactionMask {
        Self::MASK
    }

    pub fn inner(&self) -> &M {
        &self.motion
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    pub fn into_inner(self) -> M {
        self.motion
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Mask currently held on the reaction service, if the leaf is between initialize and finalize.
    pub fn active_mask(&self) -> Option<ReactionMask> {
        self.active_mask
    }
}

impl<M: MotionElement + Default> Default for Motion<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: MotionElement> From<M> for Motion<M> {
    fn from(motion: M) -> Self {
        Self::new(motion)
    }
}

impl<M: MotionElement> BehaviorElement for Motion<M> {
    fn initialize(&mut self, services: Services) -> ElementMeta {
        if let Err(err) = self.lifecycle.begin(M::NAME) {
            trap(err);
        }

        self.first_tick = true;

        let mask = Self::MASK;
        services.reactions().activate(mask);
        self.active_mask = Some(mask);

        let services = &*self.services.insert(services);
        let ctx = MotionContext {
            name: M::NAME,
            services,
        };
        self.motion.on_initialize(&ctx);

        ElementMeta::new(M::NAME)
    }

    fn tick(&mut self, sense: &SenseInfo) -> Outcome {
        if let Err(err) = self.lifecycle.check_tick(M::NAME) {
            trap(err);
        }
        let Some(services) = self.services.as_ref() else {
            trap(LifecycleError::TickBeforeInitialize {
                element: M::NAME.to_owned(),
            });
        };
        let ctx = MotionContext {
            name: M::NAME,
            services,
        };

        if self.first_tick {
            self.first_tick = false;
            self.motion.data_initialize(sense, &ctx);
        }

        let outcome = self.motion.tick(sense, &ctx);
        self.lifecycle.record(outcome.value);
        outcome
    }

    fn finalize(&mut self) {
        if let Err(err) = self.lifecycle.end(M::NAME) {
            trap(err);
        }
        let Some(services) = self.services.take() else {
            return;
        };

        let ctx = MotionContext {
            name: M::NAME,
            services: &services,
        };
        self.motion.on_finalize(&ctx);

        if let Some(mask) = self.active_mask.take() {
            services.reactions().release(mask);
        }
    }
}

impl<M: MotionElement + std::fmt::Debug> std::fmt::Debug for Motion<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Motion")
            .field("name", &M::NAME)
            .field("motion", &self.motion)
            .field("active_mask", &self.active_mask)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
