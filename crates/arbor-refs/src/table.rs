use std::collections::BTreeMap;

use arbor_types::ObjectHash;
use bincode::Options;
use tracing::debug;

use crate::error::{RefError, RefResult};
use crate::names::validate_branch_name;

/// Backend key holding the UTF-8 name of the current branch.
pub const BRANCH_KEY: &str = "BRANCH";

/// Backend key holding the encoded branch-to-head map.
pub const REFS_KEY: &str = "REFS";

/// Branch a new repository starts on unless configured otherwise.
pub const DEFAULT_BRANCH: &str = "master";

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// The current branch plus the head commit of every branch.
///
/// Invariant: `current` is always a key of `heads`. Every constructor and
/// mutator preserves it, and decoding rejects data that violates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefTable {
    current: String,
    heads: BTreeMap<String, ObjectHash>,
}

impl RefTable {
    /// A table with a single branch, which is also current.
    pub fn new(branch: impl Into<String>, head: ObjectHash) -> Self {
        let current = branch.into();
        let mut heads = BTreeMap::new();
        heads.insert(current.clone(), head);
        Self { current, heads }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Head commit of the current branch.
    pub fn current_head(&self) -> RefResult<ObjectHash> {
        self.heads
            .get(&self.current)
            .copied()
            .ok_or_else(|| RefError::BranchNotFound {
                name: self.current.clone(),
            })
    }

    /// Head commit of `name`, if the branch exists.
    pub fn head_of(&self, name: &str) -> Option<ObjectHash> {
        self.heads.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.heads.contains_key(name)
    }

    /// Branch names in sorted order.
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.heads.keys().map(String::as_str)
    }

    pub fn heads(&self) -> &BTreeMap<String, ObjectHash> {
        &self.heads
    }

    /// Create `name` pointing at the current head, without switching to it.
    pub fn create_branch(&mut self, name: &str) -> RefResult<ObjectHash> {
        validate_branch_name(name)?;
        if self.heads.contains_key(name) {
            return Err(RefError::BranchExists {
                name: name.to_string(),
            });
        }
        let head = self.current_head()?;
        self.heads.insert(name.to_string(), head);
        debug!(branch = name, head = %head.short_hex(), "created branch");
        Ok(head)
    }

    /// Make `name` the current branch.
    pub fn change_branch(&mut self, name: &str) -> RefResult<()> {
        if !self.heads.contains_key(name) {
            return Err(RefError::BranchNotFound {
                name: name.to_string(),
            });
        }
        self.current = name.to_string();
        debug!(branch = name, "changed branch");
        Ok(())
    }

    /// Move the current branch to `head`.
    pub fn advance(&mut self, head: ObjectHash) {
        self.heads.insert(self.current.clone(), head);
    }

    /// Encoded value for [`BRANCH_KEY`].
    pub fn encode_branch(&self) -> Vec<u8> {
        self.current.as_bytes().to_vec()
    }

    /// Encoded value for [`REFS_KEY`]: canonical bincode of the ordered map.
    pub fn encode_heads(&self) -> RefResult<Vec<u8>> {
        options()
            .serialize(&self.heads)
            .map_err(|e| RefError::Serialization(e.to_string()))
    }

    /// Rebuild a table from the values stored under [`BRANCH_KEY`] and
    /// [`REFS_KEY`].
    pub fn decode(branch: &[u8], heads: &[u8]) -> RefResult<Self> {
        let current = String::from_utf8(branch.to_vec())
            .map_err(|e| RefError::Corrupt(format!("current branch is not UTF-8: {e}")))?;
        let heads: BTreeMap<String, ObjectHash> = options()
            .deserialize(heads)
            .map_err(|e| RefError::Serialization(e.to_string()))?;
        if !heads.contains_key(&current) {
            return Err(RefError::Corrupt(format!(
                "current branch {current:?} has no head"
            )));
        }
        Ok(Self { current, heads })
    }
}
