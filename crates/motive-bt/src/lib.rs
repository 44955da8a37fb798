//! Behavior composition built on `motive-core`: the leaf motion adapter and the sequence
//! composite.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod motion;
pub mod sequence;

pub use motion::{Motion, MotionContext, MotionElement};
pub use sequence::SequenceElement;
