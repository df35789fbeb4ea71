use arbor_object::ObjectError;
use arbor_types::ObjectHash;

/// Errors from object store and backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectHash),

    /// Stored bytes could not be decompressed or decoded.
    #[error("corrupt object {hash}: {reason}")]
    CorruptData { hash: ObjectHash, reason: String },

    /// The object decoded but could not be narrowed or re-encoded.
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// The key-value backend rejected a read or write.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        match e {
            sled::Error::Io(io) => Self::Io(io),
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
