use std::sync::Arc;

use crate::error::StoreResult;

/// A group of writes applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `key -> value`. Later writes to the same key win.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
    }
}

/// Ordered, durable key-value storage the object store and repository sit on.
///
/// Implementations must satisfy these invariants:
/// - `set` is visible to every subsequent `get` on the same backend.
/// - `apply` installs every entry of the batch or none of them.
/// - After `flush` returns, all previously acknowledged writes survive a
///   process restart (for persistent backends).
pub trait KvBackend: Send + Sync {
    /// Read the value stored under `key`, `Ok(None)` if absent.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Write a single key.
    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Atomically apply a batch of writes.
    fn apply(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Make all acknowledged writes durable.
    fn flush(&self) -> StoreResult<()>;

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<B: KvBackend + ?Sized> KvBackend for Arc<B> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        (**self).apply(batch)
    }

    fn flush(&self) -> StoreResult<()> {
        (**self).flush()
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).contains(key)
    }
}

impl<B: KvBackend + ?Sized> KvBackend for Box<B> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        (**self).apply(batch)
    }

    fn flush(&self) -> StoreResult<()> {
        (**self).flush()
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).contains(key)
    }
}
