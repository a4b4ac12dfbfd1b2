//! Hierarchical override extraction.
//!
//! Given a local configuration document and the defaults it was written
//! against, compute the smallest document that, merged onto the defaults,
//! reproduces the local one. The crate is pure: no I/O, no logging, no
//! configuration.

mod diff;
mod merge;
mod tree;

pub use diff::extract_overrides;
pub use merge::{apply_overrides, merge_layers};
pub use tree::{Kind, Mapping, Scalar, Tree};
