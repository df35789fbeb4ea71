//! Repository engine for Arbor.
//!
//! [`Repository`] ties the object store, the branch refs, and the working
//! tree together. It is the entry point for applications embedding Arbor:
//!
//! ```no_run
//! use arbor_repo::Repository;
//!
//! let mut repo = Repository::init("/path/to/project")?;
//! repo.create_commit("alice", "first snapshot")?;
//! for entry in repo.get_commits("master", 0)? {
//!     println!("{} {}", entry.hash.short_hex(), entry.commit.description);
//! }
//! repo.close()?;
//! # Ok::<(), arbor_repo::RepoError>(())
//! ```

pub mod config;
pub mod error;
pub mod repository;

pub use config::RepoConfig;
pub use error::{RepoError, RepoResult};
pub use repository::{CommitEntry, Repository, METADATA_DIR};

// Re-export key types
pub use arbor_diff::{Edit, EditOp, FileChange};
pub use arbor_object::{Blob, Child, ChildKind, Commit, Object, ObjectKind, Tree};
pub use arbor_types::ObjectHash;
