//! Error types for diff operations.

use arbor_store::StoreError;
use thiserror::Error;

/// Errors that can occur while comparing snapshots.
#[derive(Debug, Error)]
pub enum DiffError {
    /// An object on either side could not be resolved or had the wrong kind.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for diff operations.
pub type DiffResult<T> = std::result::Result<T, DiffError>;
