//! Foundation types for Arbor.
//!
//! Every other Arbor crate depends on `arbor-types` for [`ObjectHash`], the
//! SHA-256 content digest that names blobs, trees, and commits.

pub mod error;
pub mod hash;

pub use error::TypeError;
pub use hash::{ObjectHash, HASH_LEN};
