//! Content-addressed object storage for Arbor.
//!
//! Objects are written under their SHA-256 digest as zlib-compressed bytes
//! into an ordered key-value backend. The same backend also carries the
//! repository's reference keys, so a single database holds everything.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvBackend`] trait:
//!
//! - [`SledBackend`] -- embedded on-disk database
//! - [`MemoryBackend`] -- `BTreeMap`-based backend for tests and embedding
//!
//! # Capabilities
//!
//! Algorithms that walk the object graph take an [`ObjectResolver`]; those
//! that produce objects take an [`ObjectSink`]. [`ObjectStore`] is both, and
//! so is the uncompressed [`ObjectArena`] used for throwaway snapshots.
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; storing known content is a no-op.
//! 2. Identity is the digest of the uncompressed serialization.
//! 3. Batched writes are all-or-nothing.
//! 4. All backend errors are propagated, never silently ignored.

pub mod backend;
pub mod compress;
pub mod error;
pub mod memory;
pub mod sled_backend;
pub mod store;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use backend::{KvBackend, WriteBatch};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryBackend, ObjectArena};
pub use sled_backend::SledBackend;
pub use store::ObjectStore;
pub use traits::{ObjectResolver, ObjectSink};
