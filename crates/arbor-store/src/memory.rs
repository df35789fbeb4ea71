use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use arbor_object::Object;
use arbor_types::ObjectHash;

use crate::backend::{KvBackend, WriteBatch};
use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectResolver, ObjectSink};

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend(format!("lock poisoned: {e}"))
}

/// In-memory, ordered key-value backend.
///
/// Intended for tests and embedding. Data is lost when the backend is
/// dropped; `flush` is a no-op.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(poisoned)?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        // One write guard for the whole batch keeps it atomic to readers.
        let mut map = self.entries.write().map_err(poisoned)?;
        for (key, value) in batch.into_entries() {
            map.insert(key, value);
        }
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        let map = self.entries.read().map_err(poisoned)?;
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("key_count", &self.len())
            .finish()
    }
}

/// Uncompressed, in-memory arena of objects keyed by digest.
///
/// Holds ephemeral snapshots (such as the current working directory) that
/// are compared against stored history but never persisted.
#[derive(Default)]
pub struct ObjectArena {
    objects: RwLock<HashMap<ObjectHash, Object>>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, hash: &ObjectHash) -> bool {
        self.objects
            .read()
            .map(|m| m.contains_key(hash))
            .unwrap_or(false)
    }
}

impl ObjectSink for ObjectArena {
    fn write_object(&self, object: &Object) -> StoreResult<ObjectHash> {
        let hash = object.hash();
        let mut map = self.objects.write().map_err(poisoned)?;
        map.entry(hash).or_insert_with(|| object.clone());
        Ok(hash)
    }
}

impl ObjectResolver for ObjectArena {
    fn resolve(&self, hash: &ObjectHash) -> StoreResult<Object> {
        let map = self.objects.read().map_err(poisoned)?;
        map.get(hash).cloned().ok_or(StoreError::NotFound(*hash))
    }
}

impl std::fmt::Debug for ObjectArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectArena")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_object::{Blob, Child, Tree};

    #[test]
    fn backend_set_and_get() {
        let kv = MemoryBackend::new();
        kv.set(b"key", b"value").unwrap();
        assert_eq!(kv.get(b"key").unwrap(), Some(b"value".to_vec()));
        assert!(kv.contains(b"key").unwrap());
        assert_eq!(kv.get(b"missing").unwrap(), None);
    }

    #[test]
    fn backend_apply_batch() {
        let kv = MemoryBackend::new();
        let mut batch = WriteBatch::new();
        batch.set("BRANCH", "master").set("REFS", vec![1, 2, 3]);
        kv.apply(batch).unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.get(b"REFS").unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn backend_overwrite() {
        let kv = MemoryBackend::new();
        kv.set(b"k", b"1").unwrap();
        kv.set(b"k", b"2").unwrap();
        assert_eq!(kv.get(b"k").unwrap(), Some(b"2".to_vec()));
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn arena_dedups_identical_objects() {
        let arena = ObjectArena::new();
        let a = arena
            .write_object(&Blob::new(b"same".to_vec()).to_object())
            .unwrap();
        let b = arena
            .write_object(&Blob::new(b"same".to_vec()).to_object())
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(&a));
    }

    #[test]
    fn arena_resolves_typed() {
        let arena = ObjectArena::new();
        let blob = arena
            .write_object(&Blob::new(b"x".to_vec()).to_object())
            .unwrap();
        let tree = Tree::new(vec![Child::blob("x.txt", blob)]);
        let tree_hash = arena.write_object(&tree.to_object().unwrap()).unwrap();

        assert_eq!(arena.resolve_tree(&tree_hash).unwrap(), tree);
        assert!(matches!(
            arena.resolve_tree(&blob),
            Err(StoreError::Object(_))
        ));
    }

    #[test]
    fn arena_missing_is_not_found() {
        let arena = ObjectArena::new();
        let hash = ObjectHash::digest(b"nope");
        assert!(matches!(
            arena.resolve(&hash),
            Err(StoreError::NotFound(h)) if h == hash
        ));
    }

    #[test]
    fn debug_format() {
        let kv = MemoryBackend::new();
        kv.set(b"x", b"y").unwrap();
        assert!(format!("{kv:?}").contains("key_count"));
        assert!(format!("{:?}", ObjectArena::new()).contains("object_count"));
    }
}
