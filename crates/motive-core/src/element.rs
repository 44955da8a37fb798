use crate::{ElementMeta, Outcome, SenseInfo, Services};

/// A unit of robot behavior driven by periodic ticks.
///
/// `initialize` and `finalize` act as a constructor/destructor pair so one instance can be run
/// several times (for example inside a loop). Each `initialize` resets all mutable state except
/// configuration supplied at construction, and each must be matched by exactly one `finalize`.
///
/// `tick` performs one bounded unit of work and never blocks; it reports `Running` until the
/// element is done. Calling `tick` before `initialize`, or after a terminal outcome without a new
/// `initialize`, is a usage error and traps.
pub trait BehaviorElement: Send {
    fn initialize(&mut self, services: Services) -> ElementMeta;

    fn tick(&mut self, sense: &SenseInfo) -> Outcome;

    fn finalize(&mut self);
}

impl<E> BehaviorElement for Box<E>
where
    E: BehaviorElement + ?Sized,
{
    fn initialize(&mut self, services: Services) -> ElementMeta {
        (**self).initialize(services)
    }

    fn tick(&mut self, sense: &SenseInfo) -> Outcome {
        (**self).tick(sense)
    }

    fn finalize(&mut self) {
        (**self).finalize()
    }
}
