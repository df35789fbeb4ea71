use arbor_types::ObjectHash;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::ObjectResult;
use crate::object::{Object, ObjectKind};

/// What a tree child points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildKind {
    /// A file.
    Blob,
    /// A subdirectory.
    Tree,
}

impl From<ChildKind> for ObjectKind {
    fn from(kind: ChildKind) -> Self {
        match kind {
            ChildKind::Blob => ObjectKind::Blob,
            ChildKind::Tree => ObjectKind::Tree,
        }
    }
}

impl std::fmt::Display for ChildKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ObjectKind::from(*self).fmt(f)
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Whether the entry is a file or a subdirectory.
    pub kind: ChildKind,
    /// File or directory name (one path component).
    pub name: String,
    /// Hash of the referenced object.
    pub hash: ObjectHash,
}

impl Child {
    pub fn new(kind: ChildKind, name: impl Into<String>, hash: ObjectHash) -> Self {
        Self {
            kind,
            name: name.into(),
            hash,
        }
    }

    pub fn blob(name: impl Into<String>, hash: ObjectHash) -> Self {
        Self::new(ChildKind::Blob, name, hash)
    }

    pub fn tree(name: impl Into<String>, hash: ObjectHash) -> Self {
        Self::new(ChildKind::Tree, name, hash)
    }
}

/// Directory snapshot.
///
/// Children keep the order they were given in (directory-listing order when
/// produced by the snapshot builder). The order is part of the hashed
/// encoding, so the same entries in a different order yield a different
/// tree hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub children: Vec<Child>,
}

impl Tree {
    pub fn new(children: Vec<Child>) -> Self {
        Self { children }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap as an [`Object`].
    pub fn to_object(&self) -> ObjectResult<Object> {
        Ok(Object::new(ObjectKind::Tree, codec::encode(self)?))
    }

    /// Unwrap from an [`Object`].
    pub fn from_object(obj: &Object) -> ObjectResult<Self> {
        obj.expect_kind(ObjectKind::Tree)?;
        codec::decode(obj.payload())
    }

    /// Look up a child by name.
    pub fn get(&self, name: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObjectError;

    fn h(b: u8) -> ObjectHash {
        ObjectHash::from_raw([b; 32])
    }

    #[test]
    fn tree_roundtrip() {
        let tree = Tree::new(vec![
            Child::blob("file.txt", h(1)),
            Child::tree("subdir", h(2)),
        ]);
        let obj = tree.to_object().unwrap();
        let decoded = Object::deserialize(&obj.serialize())
            .unwrap()
            .as_tree()
            .unwrap();
        assert_eq!(tree, decoded);
    }

    #[test]
    fn children_keep_insertion_order() {
        let tree = Tree::new(vec![
            Child::blob("zebra.txt", h(1)),
            Child::blob("alpha.txt", h(2)),
        ]);
        assert_eq!(tree.children[0].name, "zebra.txt");
        assert_eq!(tree.children[1].name, "alpha.txt");
    }

    #[test]
    fn order_changes_hash() {
        let a = Tree::new(vec![Child::blob("a", h(1)), Child::blob("b", h(2))]);
        let b = Tree::new(vec![Child::blob("b", h(2)), Child::blob("a", h(1))]);
        assert_ne!(
            a.to_object().unwrap().hash(),
            b.to_object().unwrap().hash()
        );
    }

    #[test]
    fn child_hash_changes_tree_hash() {
        let a = Tree::new(vec![Child::blob("a", h(1))]);
        let b = Tree::new(vec![Child::blob("a", h(3))]);
        assert_ne!(
            a.to_object().unwrap().hash(),
            b.to_object().unwrap().hash()
        );
    }

    #[test]
    fn tree_get_child() {
        let tree = Tree::new(vec![Child::blob("a.txt", h(1)), Child::tree("src", h(2))]);
        assert_eq!(tree.get("src").map(|c| c.kind), Some(ChildKind::Tree));
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn empty_tree_is_stable() {
        let a = Tree::empty().to_object().unwrap().hash();
        let b = Tree::new(Vec::new()).to_object().unwrap().hash();
        assert_eq!(a, b);
        assert!(Tree::empty().is_empty());
    }

    #[test]
    fn garbage_payload_is_deserialization_error() {
        let obj = Object::new(ObjectKind::Tree, vec![0xff; 5]);
        assert!(matches!(
            Tree::from_object(&obj),
            Err(ObjectError::Deserialization(_))
        ));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut payload = Tree::empty().to_object().unwrap().payload().to_vec();
        payload.push(0);
        let obj = Object::new(ObjectKind::Tree, payload);
        assert!(Tree::from_object(&obj).is_err());
    }

    #[test]
    fn child_kind_display() {
        assert_eq!(ChildKind::Blob.to_string(), "blob");
        assert_eq!(ChildKind::Tree.to_string(), "tree");
    }
}
