//! Reference motion leaves.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod stop;
pub mod walk;

pub use stop::Stop;
pub use walk::WalkToPosition;
