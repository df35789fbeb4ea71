use arbor_object::{Blob, Commit, Object, Tree};
use arbor_types::ObjectHash;

use crate::error::StoreResult;

/// Anything that can turn a digest back into an object.
///
/// Graph traversal (history walks, tree diffs) only ever goes through this
/// capability, so the same algorithm runs against the persistent store, an
/// in-memory arena, or one of each.
pub trait ObjectResolver {
    /// Fetch an object, failing with `NotFound` if the digest is unknown.
    fn resolve(&self, hash: &ObjectHash) -> StoreResult<Object>;

    fn resolve_blob(&self, hash: &ObjectHash) -> StoreResult<Blob> {
        Ok(self.resolve(hash)?.as_blob()?)
    }

    fn resolve_tree(&self, hash: &ObjectHash) -> StoreResult<Tree> {
        Ok(self.resolve(hash)?.as_tree()?)
    }

    fn resolve_commit(&self, hash: &ObjectHash) -> StoreResult<Commit> {
        Ok(self.resolve(hash)?.as_commit()?)
    }
}

/// Anything objects can be written into.
///
/// Writing is idempotent: the same object always lands under the same digest.
pub trait ObjectSink {
    fn write_object(&self, object: &Object) -> StoreResult<ObjectHash>;
}

impl<R: ObjectResolver + ?Sized> ObjectResolver for &R {
    fn resolve(&self, hash: &ObjectHash) -> StoreResult<Object> {
        (**self).resolve(hash)
    }
}

impl<S: ObjectSink + ?Sized> ObjectSink for &S {
    fn write_object(&self, object: &Object) -> StoreResult<ObjectHash> {
        (**self).write_object(object)
    }
}
