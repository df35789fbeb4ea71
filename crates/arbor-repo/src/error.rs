use std::path::{Path, PathBuf};

use arbor_diff::DiffError;
use arbor_object::{ObjectError, ObjectKind};
use arbor_refs::RefError;
use arbor_snapshot::SnapshotError;
use arbor_store::StoreError;
use arbor_types::ObjectHash;
use thiserror::Error;

/// Errors surfaced by repository operations.
///
/// Lower-layer errors are folded into this one flat set so callers can match
/// on what went wrong without knowing which crate raised it.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("object not found: {0}")]
    NotFound(ObjectHash),

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("branch already exists: {0}")]
    BranchExists(String),

    #[error("invalid branch name {name:?}: {reason}")]
    InvalidBranchName { name: String, reason: String },

    #[error("expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error("corrupt history at {hash}: {reason}")]
    CorruptHistory { hash: ObjectHash, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),
}

impl RepoError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<ObjectError> for RepoError {
    fn from(e: ObjectError) -> Self {
        match e {
            ObjectError::TypeMismatch { expected, actual } => Self::TypeMismatch { expected, actual },
            other => Self::CorruptData(other.to_string()),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(hash) => Self::NotFound(hash),
            StoreError::CorruptData { hash, reason } => {
                Self::CorruptData(format!("object {hash}: {reason}"))
            }
            StoreError::Object(e) => e.into(),
            StoreError::Backend(msg) => Self::Storage(msg),
            StoreError::Io(e) => Self::Storage(e.to_string()),
        }
    }
}

impl From<RefError> for RepoError {
    fn from(e: RefError) -> Self {
        match e {
            RefError::BranchNotFound { name } => Self::BranchNotFound(name),
            RefError::BranchExists { name } => Self::BranchExists(name),
            RefError::InvalidBranchName { name, reason } => Self::InvalidBranchName { name, reason },
            RefError::Corrupt(msg) => Self::CorruptData(msg),
            RefError::Serialization(msg) => Self::CorruptData(format!("refs: {msg}")),
        }
    }
}

impl From<SnapshotError> for RepoError {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::Io { path, source } => Self::Io { path, source },
            SnapshotError::InvalidName(path) => Self::Io {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "file name is not valid UTF-8",
                ),
            },
            SnapshotError::Store(e) => e.into(),
            SnapshotError::Object(e) => e.into(),
        }
    }
}

impl From<DiffError> for RepoError {
    fn from(e: DiffError) -> Self {
        match e {
            DiffError::Store(e) => e.into(),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
