//! Working-directory snapshots for Arbor.
//!
//! [`SnapshotBuilder`] turns a directory into a Merkle tree: every regular
//! file becomes a blob, every directory a tree naming its children by
//! digest. Objects go to any [`ObjectSink`](arbor_store::ObjectSink), either
//! the persistent store when committing or a throwaway arena when diffing.

pub mod builder;
pub mod error;

pub use builder::{Snapshot, SnapshotBuilder};
pub use error::{SnapshotError, SnapshotResult};
