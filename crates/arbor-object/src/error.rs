use crate::object::ObjectKind;

/// Errors from encoding, decoding, or narrowing objects.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ObjectError {
    /// The bytes do not decode to a well-formed object.
    #[error("malformed object: {0}")]
    Deserialization(String),

    /// A variant could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The object was narrowed to the wrong variant.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ObjectKind,
        actual: ObjectKind,
    },
}

/// Result alias for object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
