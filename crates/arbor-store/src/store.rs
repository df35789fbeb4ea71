use arbor_object::{Blob, Commit, Object, Tree};
use arbor_types::ObjectHash;
use tracing::{debug, trace};

use crate::backend::KvBackend;
use crate::compress::{self, DEFAULT_LEVEL};
use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectResolver, ObjectSink};

/// Content-addressed object store over a key-value backend.
///
/// Each object is stored under its 32-byte digest as the zlib-compressed
/// canonical serialization. The digest is always taken over the
/// uncompressed bytes, so the compression level never changes identity.
///
/// - Objects are immutable once written; `put` of existing content is a
///   no-op.
/// - The store never deletes objects.
pub struct ObjectStore<B> {
    backend: B,
    level: u32,
}

impl<B: KvBackend> ObjectStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_compression_level(backend, DEFAULT_LEVEL)
    }

    pub fn with_compression_level(backend: B, level: u32) -> Self {
        Self { backend, level }
    }

    /// Store an object and return its digest.
    pub fn put(&self, object: &Object) -> StoreResult<ObjectHash> {
        let raw = object.serialize();
        let hash = ObjectHash::digest(&raw);
        if self.backend.contains(hash.as_bytes())? {
            trace!(hash = %hash.short_hex(), "object already stored");
            return Ok(hash);
        }
        let packed = compress::compress(&raw, self.level)?;
        self.backend.set(hash.as_bytes(), &packed)?;
        debug!(
            hash = %hash.short_hex(),
            kind = %object.kind(),
            raw = raw.len(),
            packed = packed.len(),
            "stored object"
        );
        Ok(hash)
    }

    /// Load an object by digest.
    pub fn get(&self, hash: &ObjectHash) -> StoreResult<Object> {
        let packed = self
            .backend
            .get(hash.as_bytes())?
            .ok_or(StoreError::NotFound(*hash))?;
        let raw = compress::decompress(&packed).map_err(|e| StoreError::CorruptData {
            hash: *hash,
            reason: format!("decompression failed: {e}"),
        })?;
        Object::deserialize(&raw).map_err(|e| StoreError::CorruptData {
            hash: *hash,
            reason: e.to_string(),
        })
    }

    pub fn contains(&self, hash: &ObjectHash) -> StoreResult<bool> {
        self.backend.contains(hash.as_bytes())
    }

    pub fn get_blob(&self, hash: &ObjectHash) -> StoreResult<Blob> {
        Ok(self.get(hash)?.as_blob()?)
    }

    pub fn get_tree(&self, hash: &ObjectHash) -> StoreResult<Tree> {
        Ok(self.get(hash)?.as_tree()?)
    }

    pub fn get_commit(&self, hash: &ObjectHash) -> StoreResult<Commit> {
        Ok(self.get(hash)?.as_commit()?)
    }

    /// Make all stored objects durable.
    pub fn flush(&self) -> StoreResult<()> {
        self.backend.flush()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: KvBackend> ObjectResolver for ObjectStore<B> {
    fn resolve(&self, hash: &ObjectHash) -> StoreResult<Object> {
        self.get(hash)
    }
}

impl<B: KvBackend> ObjectSink for ObjectStore<B> {
    fn write_object(&self, object: &Object) -> StoreResult<ObjectHash> {
        self.put(object)
    }
}

impl<B> std::fmt::Debug for ObjectStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("compression_level", &self.level)
            .finish()
    }
}
