//! Branch references for Arbor.
//!
//! A repository has a set of named branches, each pointing at a head commit,
//! and exactly one current branch. [`RefTable`] holds both and knows how to
//! encode itself into the two backend keys [`BRANCH_KEY`] and [`REFS_KEY`].
//!
//! # Design Rules
//!
//! 1. Branch names are validated before creation.
//! 2. The current branch always has a head.
//! 3. The heads map is ordered so its encoding is deterministic.

pub mod error;
pub mod names;
pub mod table;

pub use error::{RefError, RefResult};
pub use names::validate_branch_name;
pub use table::{RefTable, BRANCH_KEY, DEFAULT_BRANCH, REFS_KEY};
