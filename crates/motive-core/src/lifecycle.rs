//! Per-instance lifecycle tracking for behavior elements.
//!
//! Out-of-order calls (ticking before `initialize`, ticking after a terminal outcome, a second
//! `initialize` without `finalize`) are programmer errors. Elements record each transition here and
//! trap on the first violation instead of silently continuing.

use thiserror::Error;

use crate::OutcomeValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    Terminated,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{element}: initialize called while {state:?}; finalize the previous cycle first")]
    InitializeWhileActive {
        element: String,
        state: LifecycleState,
    },

    #[error("{element}: tick called before initialize")]
    TickBeforeInitialize { element: String },

    #[error("{element}: tick called after a terminal outcome without re-initializing")]
    TickAfterTerminal { element: String },

    #[error("{element}: finalize called while {state:?}")]
    FinalizeWithoutInitialize {
        element: String,
        state: LifecycleState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lifecycle {
    state: LifecycleState,
    cycles: u64,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of completed `initialize` calls.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Initialized | LifecycleState::Terminated
        )
    }

    pub fn begin(&mut self, element: &str) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Uninitialized | LifecycleState::Finalized => {
                self.state = LifecycleState::Initialized;
                self.cycles += 1;
                Ok(())
            }
            state => Err(LifecycleError::InitializeWhileActive {
                element: element.to_owned(),
                state,
            }),
        }
    }

    pub fn check_tick(&self, element: &str) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Initialized => Ok(()),
            LifecycleState::Terminated => Err(LifecycleError::TickAfterTerminal {
                element: element.to_owned(),
            }),
            LifecycleState::Uninitialized | LifecycleState::Finalized => {
                Err(LifecycleError::TickBeforeInitialize {
                    element: element.to_owned(),
                })
            }
        }
    }

    pub fn record(&mut self, value: OutcomeValue) {
        if value.is_terminal() && self.state == LifecycleState::Initialized {
            self.state = LifecycleState::Terminated;
        }
    }

    pub fn end(&mut self, element: &str) -> Result<(), LifecycleError> {
        if self.is_active() {
            self.state = LifecycleState::Finalized;
            Ok(())
        } else {
            Err(LifecycleError::FinalizeWithoutInitialize {
                element: element.to_owned(),
                state: self.state,
            })
        }
    }
}

/// Abort on a lifecycle violation.
#[track_caller]
pub fn trap(err: LifecycleError) -> ! {
    panic!("behavior element misuse: {err}")
}
