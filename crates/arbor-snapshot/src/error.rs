use std::path::PathBuf;

use arbor_object::ObjectError;
use arbor_store::StoreError;

/// Errors raised while snapshotting a directory.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file name is not valid UTF-8 and cannot be recorded in a tree.
    #[error("file name is not valid UTF-8: {}", .0.display())]
    InvalidName(PathBuf),

    /// Writing an object to the sink failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A tree could not be encoded.
    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl SnapshotError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
