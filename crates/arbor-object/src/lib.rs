//! Object model for Arbor.
//!
//! Everything Arbor persists is an immutable [`Object`] identified by the
//! SHA-256 of its canonical serialization.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw file contents
//! - [`Tree`] -- ordered directory listing of [`Child`] entries
//! - [`Commit`] -- root tree plus an optional link to the previous commit
//!
//! Graph edges are hashes, never references: a tree names its children by
//! digest and a commit names its tree and origin the same way, so every
//! traversal goes through a lookup.

mod codec;

pub mod blob;
pub mod commit;
pub mod error;
pub mod object;
pub mod tree;

pub use blob::Blob;
pub use commit::{Commit, INITIAL_COMMIT};
pub use error::{ObjectError, ObjectResult};
pub use object::{Object, ObjectKind};
pub use tree::{Child, ChildKind, Tree};

pub use arbor_types::ObjectHash;
