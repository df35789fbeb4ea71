use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use arbor_object::{Blob, Child, ChildKind, Tree};
use arbor_store::ObjectSink;
use arbor_types::ObjectHash;
use tracing::{debug, trace, warn};

use crate::error::{SnapshotError, SnapshotResult};

/// Result of snapshotting a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Hash of the root tree.
    pub root: ObjectHash,
    /// The root tree itself.
    pub tree: Tree,
    /// Number of objects handed to the sink, duplicates included.
    pub objects_written: usize,
}

/// Walks a directory post-order and writes one blob per file and one tree
/// per directory into an [`ObjectSink`].
///
/// Entries are visited sorted by file name, so an unchanged directory
/// always reproduces the same root hash. Entries whose name is in the
/// ignore set (always including the metadata directory) are skipped at
/// every level.
pub struct SnapshotBuilder<S> {
    sink: S,
    ignore: BTreeSet<String>,
}

impl<S: ObjectSink> SnapshotBuilder<S> {
    pub fn new(sink: S, metadata_dir: impl Into<String>) -> Self {
        let mut ignore = BTreeSet::new();
        ignore.insert(metadata_dir.into());
        Self { sink, ignore }
    }

    /// Skip entries with any of these names as well.
    pub fn with_ignored<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }

    /// Snapshot the directory at `root`.
    pub fn build(&self, root: &Path) -> SnapshotResult<Snapshot> {
        let mut written = 0;
        let (hash, tree) = self.snapshot_dir(root, &mut written)?;
        debug!(
            path = %root.display(),
            root = %hash.short_hex(),
            objects = written,
            "built snapshot"
        );
        Ok(Snapshot {
            root: hash,
            tree,
            objects_written: written,
        })
    }

    fn snapshot_file(&self, path: &Path, written: &mut usize) -> SnapshotResult<(ObjectHash, Blob)> {
        let data = fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
        let blob = Blob::new(data);
        let hash = self.sink.write_object(&blob.to_object())?;
        *written += 1;
        trace!(path = %path.display(), hash = %hash.short_hex(), size = blob.len(), "blob");
        Ok((hash, blob))
    }

    fn snapshot_dir(&self, path: &Path, written: &mut usize) -> SnapshotResult<(ObjectHash, Tree)> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| SnapshotError::io(path, e))? {
            let entry = entry.map_err(|e| SnapshotError::io(path, e))?;
            let entry_path = entry.path();
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| SnapshotError::InvalidName(entry_path.clone()))?;
            if self.is_ignored(&name) {
                continue;
            }
            entries.push((name, entry_path));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut children = Vec::with_capacity(entries.len());
        for (name, entry_path) in entries {
            let meta = fs::metadata(&entry_path).map_err(|e| SnapshotError::io(&entry_path, e))?;
            if meta.is_dir() {
                let (hash, _) = self.snapshot_dir(&entry_path, written)?;
                children.push(Child::new(ChildKind::Tree, name, hash));
            } else if meta.is_file() {
                let (hash, _) = self.snapshot_file(&entry_path, written)?;
                children.push(Child::new(ChildKind::Blob, name, hash));
            } else {
                warn!(path = %entry_path.display(), "skipping special file");
            }
        }

        let tree = Tree::new(children);
        let hash = self.sink.write_object(&tree.to_object()?)?;
        *written += 1;
        trace!(path = %path.display(), hash = %hash.short_hex(), entries = tree.len(), "tree");
        Ok((hash, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_store::{MemoryBackend, ObjectArena, ObjectResolver, ObjectStore};

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn empty_directory_is_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let arena = ObjectArena::new();
        let snap = SnapshotBuilder::new(&arena, ".arbor").build(dir.path()).unwrap();
        assert!(snap.tree.is_empty());
        assert_eq!(snap.root, Tree::empty().to_object().unwrap().hash());
        assert_eq!(snap.objects_written, 1);
    }

    #[test]
    fn files_and_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "hello");
        write(dir.path(), "src/main.rs", "fn main() {}");

        let arena = ObjectArena::new();
        let snap = SnapshotBuilder::new(&arena, ".arbor").build(dir.path()).unwrap();

        assert_eq!(snap.tree.len(), 2);
        let a = snap.tree.get("a.txt").unwrap();
        assert_eq!(a.kind, ChildKind::Blob);
        assert_eq!(arena.resolve_blob(&a.hash).unwrap().data, b"hello");

        let src = snap.tree.get("src").unwrap();
        assert_eq!(src.kind, ChildKind::Tree);
        let sub = arena.resolve_tree(&src.hash).unwrap();
        assert_eq!(sub.children[0].name, "main.rs");
        assert_eq!(snap.objects_written, 4);
    }

    #[test]
    fn children_are_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "zebra", "z");
        write(dir.path(), "alpha", "a");
        write(dir.path(), "mid/x", "x");

        let arena = ObjectArena::new();
        let snap = SnapshotBuilder::new(&arena, ".arbor").build(dir.path()).unwrap();
        let names: Vec<_> = snap.tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn metadata_dir_and_ignored_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "keep.txt", "keep");
        write(dir.path(), ".arbor/db/blob", "internal");
        write(dir.path(), "target/out", "build output");
        write(dir.path(), "nested/.arbor", "also skipped");

        let arena = ObjectArena::new();
        let snap = SnapshotBuilder::new(&arena, ".arbor")
            .with_ignored(["target"])
            .build(dir.path())
            .unwrap();
        let names: Vec<_> = snap.tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["keep.txt", "nested"]);
        let nested = arena.resolve_tree(&snap.tree.get("nested").unwrap().hash).unwrap();
        assert!(nested.is_empty());
    }

    #[test]
    fn unchanged_directory_reproduces_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "one");
        write(dir.path(), "d/b.txt", "two");

        let first = SnapshotBuilder::new(ObjectArena::new(), ".arbor")
            .build(dir.path())
            .unwrap();
        let second = SnapshotBuilder::new(ObjectArena::new(), ".arbor")
            .build(dir.path())
            .unwrap();
        assert_eq!(first.root, second.root);

        write(dir.path(), "d/b.txt", "changed");
        let third = SnapshotBuilder::new(ObjectArena::new(), ".arbor")
            .build(dir.path())
            .unwrap();
        assert_ne!(first.root, third.root);
    }

    #[test]
    fn duplicate_contents_share_a_blob() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one.txt", "same");
        write(dir.path(), "two.txt", "same");

        let store = ObjectStore::new(MemoryBackend::new());
        let snap = SnapshotBuilder::new(&store, ".arbor").build(dir.path()).unwrap();
        assert_eq!(snap.tree.children[0].hash, snap.tree.children[1].hash);
        assert_eq!(snap.objects_written, 3);
        // one blob plus one tree
        assert_eq!(store.backend().len(), 2);
    }

    #[test]
    fn missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = SnapshotBuilder::new(ObjectArena::new(), ".arbor")
            .build(&missing)
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Io { path, .. } if path == missing));
    }
}
