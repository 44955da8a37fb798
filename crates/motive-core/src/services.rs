//! Capabilities handed to every element at `initialize`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ReactionMask;

/// Fire-and-forget telemetry sink.
///
/// Implementations must not fail or block; notifications never influence control flow.
pub trait MessengerService: Send + Sync {
    fn notify(&self, source: &str, message: &str);
}

/// Mutes and unmutes categories of reflex on the safety controller.
///
/// Every `activate` must be matched by a `release` with the same mask, issued by the same element.
pub trait ReactionService: Send + Sync {
    fn activate(&self, mask: ReactionMask);

    fn release(&self, mask: ReactionMask);
}

/// Forwards notifications as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMessenger;

impl MessengerService for TracingMessenger {
    fn notify(&self, source: &str, message: &str) {
        tracing::info!(target: "motive::messenger", source, "{message}");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullMessenger;

impl MessengerService for NullMessenger {
    fn notify(&self, _source: &str, _message: &str) {}
}

/// Accepts activations without muting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReactionService;

impl ReactionService for NoopReactionService {
    fn activate(&self, _mask: ReactionMask) {}

    fn release(&self, _mask: ReactionMask) {}
}

/// Reaction service keeping the stack of live activations.
///
/// The effective mask is the OR of every live activation. Releases are expected in strict LIFO
/// order; an out-of-order release still removes the most recent matching activation, and a release
/// with no matching activation is ignored. Both are reported with `tracing::warn!`.
#[derive(Debug, Default)]
pub struct ReactionRegistry {
    stack: Mutex<Vec<ReactionMask>>,
}

impl ReactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn stack(&self) -> MutexGuard<'_, Vec<ReactionMask>> {
        self.stack.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn effective(&self) -> ReactionMask {
        self.stack()
            .iter()
            .fold(ReactionMask::empty(), |acc, mask| acc | *mask)
    }

    pub fn depth(&self) -> usize {
        self.stack().len()
    }

    pub fn is_idle(&self) -> bool {
        self.stack().is_empty()
    }
}

impl ReactionService for ReactionRegistry {
    fn activate(&self, mask: ReactionMask) {
        let mut stack = self.stack();
        stack.push(mask);
        tracing::debug!(mask = mask.bits(), depth = stack.len(), "reaction mask activated");
    }

    fn release(&self, mask: ReactionMask) {
        let mut stack = self.stack();
        match stack.iter().rposition(|m| *m == mask) {
            Some(pos) => {
                if pos + 1 != stack.len() {
                    tracing::warn!(
                        mask = mask.bits(),
                        depth = stack.len(),
                        "reaction mask released out of order"
                    );
                }
                stack.remove(pos);
                tracing::debug!(mask = mask.bits(), depth = stack.len(), "reaction mask released");
            }
            None => {
                tracing::warn!(mask = mask.bits(), "release without matching activation");
            }
        }
    }
}

/// Capability bundle shared by reference along the active path for one executor run.
#[derive(Clone)]
pub struct Services {
    messenger: Arc<dyn MessengerService>,
    reactions: Arc<dyn ReactionService>,
}

impl Services {
    pub fn new(messenger: Arc<dyn MessengerService>, reactions: Arc<dyn ReactionService>) -> Self {
        Self {
            messenger,
            reactions,
        }
    }

    pub fn messenger(&self) -> &dyn MessengerService {
        self.messenger.as_ref()
    }

    pub fn reactions(&self) -> &dyn ReactionService {
        self.reactions.as_ref()
    }

    pub fn notify(&self, source: &str, message: &str) {
        self.messenger.notify(source, message);
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(Arc::new(TracingMessenger), Arc::new(ReactionRegistry::new()))
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ors_live_activations() {
        let reg = ReactionRegistry::new();
        reg.activate(ReactionMask::KNEE_JERK);
        reg.activate(ReactionMask::FLINCH);
        assert_eq!(reg.effective(), ReactionMask::all());
        assert_eq!(reg.depth(), 2);

        reg.release(ReactionMask::FLINCH);
        assert_eq!(reg.effective(), ReactionMask::KNEE_JERK);

        reg.release(ReactionMask::KNEE_JERK);
        assert!(reg.is_idle());
        assert_eq!(reg.effective(), ReactionMask::empty());
    }

    #[test]
    fn registry_out_of_order_release_removes_matching_entry() {
        let reg = ReactionRegistry::new();
        reg.activate(ReactionMask::KNEE_JERK);
        reg.activate(ReactionMask::FLINCH);

        reg.release(ReactionMask::KNEE_JERK);
        assert_eq!(reg.effective(), ReactionMask::FLINCH);
        assert_eq!(reg.depth(), 1);
    }

    #[test]
    fn registry_ignores_unmatched_release() {
        let reg = ReactionRegistry::new();
        reg.activate(ReactionMask::KNEE_JERK);
        reg.release(ReactionMask::FLINCH);
        assert_eq!(reg.depth(), 1);
        assert_eq!(reg.effective(), ReactionMask::KNEE_JERK);
    }

    #[test]
    fn empty_mask_activation_still_counts() {
        let reg = ReactionRegistry::new();
        reg.activate(ReactionMask::empty());
        assert_eq!(reg.depth(), 1);
        reg.release(ReactionMask::empty());
        assert!(reg.is_idle());
    }
}
