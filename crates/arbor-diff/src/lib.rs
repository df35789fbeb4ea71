//! Diff engine for Arbor.
//!
//! Compares two snapshots structurally and produces a [`FileChange`] for
//! every file whose text differs.
//!
//! # Components
//!
//! - [`TreeComparator`] -- walks two trees through independent resolvers
//! - [`TextDiffer`] / [`LineDiffer`] -- edit scripts for file contents
//! - [`FileChange`] / [`Edit`] -- the resulting change set

pub mod compare;
pub mod edit;
pub mod error;
pub mod text;

pub use compare::TreeComparator;
pub use edit::{Edit, EditOp, FileChange};
pub use error::{DiffError, DiffResult};
pub use text::{diff_byte_lines, LineDiffer, TextDiffer, REFINE_MAX_BYTES};
