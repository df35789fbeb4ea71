use arbor_types::ObjectHash;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::ObjectResult;
use crate::object::{Object, ObjectKind};

/// Description given to the commit created when a repository is initialized.
pub const INITIAL_COMMIT: &str = "Initial commit";

/// A point in history: a root tree plus a link to the previous commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Predecessor commit. `None` only for the root commit.
    pub origin: Option<ObjectHash>,
    /// Root tree of the snapshot.
    pub tree: ObjectHash,
    pub author: String,
    /// Unix timestamp in seconds.
    pub time: i64,
    pub description: String,
}

impl Commit {
    pub fn new(
        origin: Option<ObjectHash>,
        tree: ObjectHash,
        author: impl Into<String>,
        time: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            tree,
            author: author.into(),
            time,
            description: description.into(),
        }
    }

    /// The commit a fresh repository starts from.
    pub fn initial(tree: ObjectHash, time: i64) -> Self {
        Self::new(None, tree, "", time, INITIAL_COMMIT)
    }

    pub fn is_root(&self) -> bool {
        self.origin.is_none()
    }

    /// Wrap as an [`Object`].
    pub fn to_object(&self) -> ObjectResult<Object> {
        Ok(Object::new(ObjectKind::Commit, codec::encode(self)?))
    }

    /// Unwrap from an [`Object`].
    pub fn from_object(obj: &Object) -> ObjectResult<Self> {
        obj.expect_kind(ObjectKind::Commit)?;
        codec::decode(obj.payload())
    }
}
