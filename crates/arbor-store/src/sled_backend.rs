use std::path::Path;

use tracing::debug;

use crate::backend::{KvBackend, WriteBatch};
use crate::error::StoreResult;

/// Persistent key-value backend on an embedded `sled` database.
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open or create the database directory at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = sled::open(path)?;
        debug!(path = %path.display(), recovered = db.was_recovered(), "opened sled backend");
        Ok(Self { db })
    }

    /// Open a throwaway database that is removed when dropped.
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }
}

impl KvBackend for SledBackend {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn apply(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut sled_batch = sled::Batch::default();
        for (key, value) in batch.into_entries() {
            sled_batch.insert(key, value);
        }
        self.db.apply_batch(sled_batch)?;
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        let bytes = self.db.flush()?;
        debug!(bytes, "flushed sled backend");
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.db.contains_key(key)?)
    }
}

impl std::fmt::Debug for SledBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledBackend")
            .field("key_count", &self.db.len())
            .finish()
    }
}
