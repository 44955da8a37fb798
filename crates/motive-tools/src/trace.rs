#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use motive_core::{MessengerService, ReactionMask, ReactionService, Services};

/// One messenger notification, captured as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notification {
    pub source: String,
    pub message: String,
}

impl Notification {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReactionCall {
    Activate(ReactionMask),
    Release(ReactionMask),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub notifications: Vec<Notification>,
    pub reactions: Vec<ReactionCall>,
}

impl TraceLog {
    /// Messages sent from `source`, in order.
    pub fn messages_from(&self, source: &str) -> Vec<&str> {
        self.notifications
            .iter()
            .filter(|n| n.source == source)
            .map(|n| n.message.as_str())
            .collect()
    }

    pub fn count(&self, source: &str, message: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.source == source && n.message == message)
            .count()
    }

    pub fn activations(&self) -> Vec<ReactionMask> {
        self.reactions
            .iter()
            .filter_map(|call| match call {
                ReactionCall::Activate(mask) => Some(*mask),
                ReactionCall::Release(_) => None,
            })
            .collect()
    }

    pub fn releases(&self) -> Vec<ReactionMask> {
        self.reactions
            .iter()
            .filter_map(|call| match call {
                ReactionCall::Release(mask) => Some(*mask),
                ReactionCall::Activate(_) => None,
            })
            .collect()
    }

    /// True when every release matches the most recent unreleased activation.
    pub fn reactions_balanced(&self) -> bool {
        let mut live = Vec::new();
        for call in &self.reactions {
            match call {
                ReactionCall::Activate(mask) => live.push(*mask),
                ReactionCall::Release(mask) => {
                    if live.pop() != Some(*mask) {
                        return false;
                    }
                }
            }
        }
        live.is_empty()
    }
}

/// Messenger and reaction service that record every call into a shared [`TraceLog`].
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    log: Arc<Mutex<TraceLog>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Services bundle whose messenger and reaction service both feed this recorder.
    pub fn services(&self) -> Services {
        Services::new(Arc::new(self.clone()), Arc::new(self.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, TraceLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> TraceLog {
        self.lock().clone()
    }

    pub fn clear(&self) {
        *self.lock() = TraceLog::default();
    }
}

impl MessengerService for Recorder {
    fn notify(&self, source: &str, message: &str) {
        self.lock()
            .notifications
            .push(Notification::new(source, message));
    }
}

impl ReactionService for Recorder {
    fn activate(&self, mask: ReactionMask) {
        self.lock().reactions.push(ReactionCall::Activate(mask));
    }

    fn release(&self, mask: ReactionMask) {
        self.lock().reactions.push(ReactionCall::Release(mask));
    }
}
