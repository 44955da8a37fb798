//! Tick-driven behavior primitives for a robot controller.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod element;
pub mod lifecycle;
pub mod model;
pub mod services;

pub use element::BehaviorElement;
pub use lifecycle::{trap, Lifecycle, LifecycleError, LifecycleState};
pub use model::{
    ActuateCmd, ElementMeta, Outcome, OutcomeValue, ReactionDef, ReactionMask, SenseInfo,
};
pub use services::{
    MessengerService, NoopReactionService, NullMessenger, ReactionRegistry, ReactionService,
    Services, TracingMessenger,
};
