use std::borrow::Cow;

use motive_core::lifecycle::trap;
use motive_core::{
    BehaviorElement, ElementMeta, Lifecycle, LifecycleError, Outcome, OutcomeValue, SenseInfo,
    Services,
};

/// Runs borrowed children one at a time, in order, AND-combining their outcomes.
///
/// - A child that succeeds hands over to the next one on the following tick; the sequence keeps
///   reporting `Running` with the finished child's command so actuation never has a gap.
/// - A child that fails ends the sequence immediately; later children are never initialized.
/// - The last child's terminal outcome is the sequence's outcome, on the same tick.
/// - An empty sequence fails on its first tick.
///
/// Children are borrowed, not owned: whoever assembles the tree keeps them and can inspect them
/// once the sequence is dropped.
pub struct SequenceElement<'a> {
    name: Cow<'static, str>,
    children: Vec<&'a mut dyn BehaviorElement>,
    index: usize,
    current: Option<ElementMeta>,
    services: Option<Services>,
    lifecycle: Lifecycle,
}

impl<'a> SequenceElement<'a> {
    pub fn new(children: Vec<&'a mut dyn BehaviorElement>) -> Self {
        Self::named("Sequence", children)
    }

    pub fn named(
        name: impl Into<Cow<'static, str>>,
        children: Vec<&'a mut dyn BehaviorElement>,
    ) -> Self {
        Self {
            name: name.into(),
            children,
            index: 0,
            current: None,
            services: None,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Append a child; it runs after every child already added.
    pub fn with_child(mut self, child: &'a mut dyn BehaviorElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the child that runs on the next tick.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Metadata of the child currently between initialize and finalize.
    pub fn active_child(&self) -> Option<&ElementMeta> {
        self.current.as_ref()
    }

    fn step(&mut self, sense: &SenseInfo) -> Outcome {
        let Some(services) = self.services.as_ref() else {
            trap(LifecycleError::TickBeforeInitialize {
                element: self.name.to_string(),
            });
        };
        let Some(child) = self.children.get_mut(self.index) else {
            // Only an empty sequence gets here: after the last child the lifecycle guard traps.
            return Outcome::default();
        };

        let meta = match self.current.take() {
            Some(meta) => meta,
            None => {
                let meta = child.initialize(services.clone());
                services.notify(meta.name(), "initialize");
                tracing::debug!(
                    sequence = %self.name,
                    child = meta.name(),
                    index = self.index,
                    "child initialized"
                );
                meta
            }
        };

        services.notify(meta.name(), "tick");
        let outcome = child.tick(sense);

        if outcome.is_running() {
            self.current = Some(meta);
            return outcome;
        }

        child.finalize();
        services.notify(meta.name(), "finalize");
        tracing::debug!(
            sequence = %self.name,
            child = meta.name(),
            index = self.index,
            outcome = ?outcome.value,
            "child finished"
        );
        self.index += 1;

        let more = self.index < self.children.len();
        match outcome.value {
            OutcomeValue::Success if more => Outcome::running(outcome.actuate),
            _ => outcome,
        }
    }
}

impl Default for SequenceElement<'_> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BehaviorElement for SequenceElement<'_> {
    fn initialize(&mut self, services: Services) -> ElementMeta {
        if let Err(err) = self.lifecycle.begin(&self.name) {
            trap(err);
        }
        self.index = 0;
        self.current = None;
        self.services = Some(services);
        ElementMeta::new(self.name.clone())
    }

    fn tick(&mut self, sense: &SenseInfo) -> Outcome {
        if let Err(err) = self.lifecycle.check_tick(&self.name) {
            trap(err);
        }
        let outcome = self.step(sense);
        self.lifecycle.record(outcome.value);
        outcome
    }

    fn finalize(&mut self) {
        if let Err(err) = self.lifecycle.end(&self.name) {
            trap(err);
        }
        let services = self.services.take();

        // Abandoned mid-run: close the active child's cycle so its reaction mask is released.
        if let Some(meta) = self.current.take() {
            if let Some(child) = self.children.get_mut(self.index) {
                tracing::warn!(
                    sequence = %self.name,
                    child = meta.name(),
                    "finalized while a child was still running"
                );
                child.finalize();
                if let Some(services) = services.as_ref() {
                    services.notify(meta.name(), "finalize");
                }
            }
        }
    }
}

impl std::fmt::Debug for SequenceElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceElement")
            .field("name", &self.name)
            .field("len", &self.children.len())
            .field("index", &self.index)
            .field("current", &self.current)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
