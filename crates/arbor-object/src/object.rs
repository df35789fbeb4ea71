use arbor_types::ObjectHash;
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::commit::Commit;
use crate::error::{ObjectError, ObjectResult};
use crate::tree::Tree;

/// Size of the envelope header: 4 bytes kind + 8 bytes payload length.
const HEADER_SIZE: usize = 12;

/// The kind of object stored.
///
/// Discriminants are part of the wire format and must never be reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw file contents.
    Blob = 0,
    /// Directory listing.
    Tree = 1,
    /// Snapshot root plus history link.
    Commit = 2,
}

impl ObjectKind {
    /// Wire discriminant.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Parse a wire discriminant.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Blob),
            1 => Some(Self::Tree),
            2 => Some(Self::Commit),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Tree => write!(f, "tree"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// A tagged, immutable object: kind plus the canonical encoding of the
/// variant's fields.
///
/// On the wire an object is framed as:
///
/// ```text
/// [4 bytes: kind discriminant (little-endian u32)]
/// [8 bytes: payload length (little-endian u64)]
/// [N bytes: payload]
/// ```
///
/// Blob payloads are the raw file bytes; tree and commit payloads are the
/// bincode encoding of [`Tree`] and [`Commit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    kind: ObjectKind,
    payload: Vec<u8>,
}

impl Object {
    /// Wrap an already-encoded payload.
    pub fn new(kind: ObjectKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Canonical serialization of the whole object.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.kind.code().to_le_bytes());
        out.extend_from_slice(&(self.payload.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Decode an object from its canonical serialization.
    pub fn deserialize(bytes: &[u8]) -> ObjectResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ObjectError::Deserialization(format!(
                "truncated header: {} bytes",
                bytes.len()
            )));
        }
        let (code, rest) = bytes.split_at(4);
        let (len, payload) = rest.split_at(8);

        let code = u32::from_le_bytes([code[0], code[1], code[2], code[3]]);
        let kind = ObjectKind::from_code(code).ok_or_else(|| {
            ObjectError::Deserialization(format!("unknown object kind {code}"))
        })?;

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(len);
        let len = u64::from_le_bytes(len_bytes);
        if len != payload.len() as u64 {
            return Err(ObjectError::Deserialization(format!(
                "payload length {len} does not match {} remaining bytes",
                payload.len()
            )));
        }

        Ok(Self {
            kind,
            payload: payload.to_vec(),
        })
    }

    /// SHA-256 over [`Object::serialize`].
    pub fn hash(&self) -> ObjectHash {
        ObjectHash::digest(&self.serialize())
    }

    pub fn as_blob(&self) -> ObjectResult<Blob> {
        Blob::from_object(self)
    }

    pub fn as_tree(&self) -> ObjectResult<Tree> {
        Tree::from_object(self)
    }

    pub fn as_commit(&self) -> ObjectResult<Commit> {
        Commit::from_object(self)
    }

    /// Fail with `TypeMismatch` unless this object has the expected kind.
    pub(crate) fn expect_kind(&self, expected: ObjectKind) -> ObjectResult<()> {
        if self.kind != expected {
            return Err(ObjectError::TypeMismatch {
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn serialize_layout() {
        let obj = Object::new(ObjectKind::Tree, b"abc".to_vec());
        let bytes = obj.serialize();
        assert_eq!(&bytes[..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..12], &3u64.to_le_bytes());
        assert_eq!(&bytes[12..], b"abc");
    }

    #[test]
    fn deserialize_roundtrip() {
        let obj = Object::new(ObjectKind::Commit, b"payload".to_vec());
        let decoded = Object::deserialize(&obj.serialize()).unwrap();
        assert_eq!(obj, decoded);
    }

    #[test]
    fn deserialize_rejects_truncated_header() {
        let err = Object::deserialize(&[0, 0, 0]).unwrap_err();
        assert!(matches!(err, ObjectError::Deserialization(_)));
    }

    #[test]
    fn deserialize_rejects_unknown_kind() {
        let mut bytes = Object::new(ObjectKind::Blob, vec![1]).serialize();
        bytes[0] = 9;
        let err = Object::deserialize(&bytes).unwrap_err();
        assert!(matches!(err, ObjectError::Deserialization(_)));
    }

    #[test]
    fn deserialize_rejects_length_mismatch() {
        let mut bytes = Object::new(ObjectKind::Blob, b"four".to_vec()).serialize();
        bytes.push(0);
        assert!(Object::deserialize(&bytes).is_err());
        bytes.truncate(bytes.len() - 2);
        assert!(Object::deserialize(&bytes).is_err());
    }

    #[test]
    fn kind_participates_in_hash() {
        let blob = Object::new(ObjectKind::Blob, b"same".to_vec());
        let tree = Object::new(ObjectKind::Tree, b"same".to_vec());
        assert_ne!(blob.hash(), tree.hash());
    }

    #[test]
    fn narrowing_wrong_kind_is_type_mismatch() {
        let obj = Object::new(ObjectKind::Blob, b"data".to_vec());
        assert_eq!(
            obj.as_commit().unwrap_err(),
            ObjectError::TypeMismatch {
                expected: ObjectKind::Commit,
                actual: ObjectKind::Blob,
            }
        );
        assert!(matches!(
            obj.as_tree(),
            Err(ObjectError::TypeMismatch { .. })
        ));
        assert!(obj.as_blob().is_ok());
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(ObjectKind::Blob.code(), 0);
        assert_eq!(ObjectKind::Tree.code(), 1);
        assert_eq!(ObjectKind::Commit.code(), 2);
        assert_eq!(ObjectKind::from_code(3), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ObjectKind::Blob.to_string(), "blob");
        assert_eq!(ObjectKind::Tree.to_string(), "tree");
        assert_eq!(ObjectKind::Commit.to_string(), "commit");
    }

    proptest! {
        #[test]
        fn hash_is_pure(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
            let a = Object::new(ObjectKind::Blob, payload.clone());
            let b = Object::new(ObjectKind::Blob, payload);
            prop_assert_eq!(a.hash(), b.hash());
            prop_assert_eq!(a.hash(), a.hash());
        }
    }
}
