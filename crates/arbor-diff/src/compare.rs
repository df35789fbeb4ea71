//! Structural comparison of two snapshots.

use arbor_object::{Child, ChildKind};
use arbor_store::ObjectResolver;
use arbor_types::ObjectHash;

use crate::edit::FileChange;
use crate::error::DiffResult;
use crate::text::{diff_byte_lines, LineDiffer, TextDiffer};

/// Compares trees drawn from two independent object sources.
///
/// The left side is the "old" snapshot and the right side the "new" one.
/// Each side resolves its hashes through its own resolver, so a stored
/// commit can be compared against a working-directory snapshot that only
/// exists in memory.
pub struct TreeComparator<L, R, D = LineDiffer> {
    left: L,
    right: R,
    differ: D,
}

impl<L, R> TreeComparator<L, R, LineDiffer>
where
    L: ObjectResolver,
    R: ObjectResolver,
{
    /// Comparator using the default refined line differ.
    pub fn with_default_differ(left: L, right: R) -> Self {
        Self::new(left, right, LineDiffer::default())
    }
}

impl<L, R, D> TreeComparator<L, R, D>
where
    L: ObjectResolver,
    R: ObjectResolver,
    D: TextDiffer,
{
    pub fn new(left: L, right: R, differ: D) -> Self {
        Self {
            left,
            right,
            differ,
        }
    }

    /// Compare the root trees of two commits.
    pub fn compare_commits(&self, left: &ObjectHash, right: &ObjectHash) -> DiffResult<Vec<FileChange>> {
        if left == right {
            return Ok(Vec::new());
        }
        let old = self.left.resolve_commit(left)?;
        let new = self.right.resolve_commit(right)?;
        self.compare_trees(Some(&old.tree), Some(&new.tree))
    }

    /// Compare two trees. An absent side is treated as an empty directory.
    ///
    /// Changes are reported depth-first: left children in order, then
    /// children only present on the right.
    pub fn compare_trees(
        &self,
        left: Option<&ObjectHash>,
        right: Option<&ObjectHash>,
    ) -> DiffResult<Vec<FileChange>> {
        let mut changes = Vec::new();
        self.walk_trees("", left, right, &mut changes)?;
        Ok(changes)
    }

    /// Compare two blobs, returning a change only if their contents differ.
    ///
    /// Content that is not valid UTF-8 on either side is compared line by
    /// line on raw bytes instead of going through the text differ.
    pub fn compare_blobs(
        &self,
        path: &str,
        left: Option<&ObjectHash>,
        right: Option<&ObjectHash>,
    ) -> DiffResult<Option<FileChange>> {
        if left == right {
            return Ok(None);
        }
        let old = match left {
            Some(hash) => self.left.resolve_blob(hash)?.data,
            None => Vec::new(),
        };
        let new = match right {
            Some(hash) => self.right.resolve_blob(hash)?.data,
            None => Vec::new(),
        };
        let edits = match (std::str::from_utf8(&old), std::str::from_utf8(&new)) {
            (Ok(old), Ok(new)) => self.differ.diff(old, new),
            _ => diff_byte_lines(&old, &new),
        };
        if edits.iter().any(|e| e.is_change()) {
            Ok(Some(FileChange::new(path, edits)))
        } else {
            Ok(None)
        }
    }

    fn walk_trees(
        &self,
        prefix: &str,
        left: Option<&ObjectHash>,
        right: Option<&ObjectHash>,
        changes: &mut Vec<FileChange>,
    ) -> DiffResult<()> {
        if left == right {
            return Ok(());
        }
        let old = match left {
            Some(hash) => self.left.resolve_tree(hash)?.children,
            None => Vec::new(),
        };
        let new = match right {
            Some(hash) => self.right.resolve_tree(hash)?.children,
            None => Vec::new(),
        };

        for l in &old {
            let path = join(prefix, &l.name);
            match find(&new, &l.name) {
                Some(r) if r.kind == l.kind => {
                    self.walk_child(&path, l.kind, Some(&l.hash), Some(&r.hash), changes)?;
                }
                Some(r) => {
                    self.walk_child(&path, l.kind, Some(&l.hash), None, changes)?;
                    self.walk_child(&path, r.kind, None, Some(&r.hash), changes)?;
                }
                None => self.walk_child(&path, l.kind, Some(&l.hash), None, changes)?,
            }
        }
        for r in new.iter().filter(|r| find(&old, &r.name).is_none()) {
            let path = join(prefix, &r.name);
            self.walk_child(&path, r.kind, None, Some(&r.hash), changes)?;
        }
        Ok(())
    }

    fn walk_child(
        &self,
        path: &str,
        kind: ChildKind,
        left: Option<&ObjectHash>,
        right: Option<&ObjectHash>,
        changes: &mut Vec<FileChange>,
    ) -> DiffResult<()> {
        match kind {
            ChildKind::Tree => self.walk_trees(path, left, right, changes),
            ChildKind::Blob => {
                if let Some(change) = self.compare_blobs(path, left, right)? {
                    changes.push(change);
                }
                Ok(())
            }
        }
    }
}

fn find<'a>(children: &'a [Child], name: &str) -> Option<&'a Child> {
    children.iter().find(|c| c.name == name)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
