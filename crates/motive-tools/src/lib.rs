//! Inspection tooling for behavior runs.
//!
//! The recorder stands in for the messenger and reaction services so tests and debugging sessions
//! can assert on exactly what an element tree asked of its collaborators.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{Notification, ReactionCall, Recorder, TraceLog};
