use std::fs;
use std::path::{Path, PathBuf};

use arbor_diff::{FileChange, LineDiffer, TreeComparator};
use arbor_object::{Commit, Object, Tree};
use arbor_refs::{validate_branch_name, RefTable, BRANCH_KEY, REFS_KEY};
use arbor_snapshot::SnapshotBuilder;
use arbor_store::{KvBackend, ObjectArena, ObjectSink, ObjectStore, SledBackend, WriteBatch};
use arbor_types::ObjectHash;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::{RepoError, RepoResult};

/// Name of the metadata directory inside the working tree.
pub const METADATA_DIR: &str = ".arbor";

const DB_DIR: &str = "db";
const CONFIG_FILE: &str = "config.toml";

/// A commit together with its hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitEntry {
    pub hash: ObjectHash,
    pub commit: Commit,
}

/// An open repository: object store, branch refs, and the working tree they
/// describe.
///
/// Every mutation persists the refs before returning. If persisting fails,
/// the in-memory refs are left as they were.
pub struct Repository<B: KvBackend = SledBackend> {
    config: RepoConfig,
    store: ObjectStore<B>,
    refs: RefTable,
    working_path: PathBuf,
}

impl Repository<SledBackend> {
    /// Open the repository rooted at `path`, creating it on first use.
    ///
    /// Metadata lives in `<path>/.arbor`: the database under `db` and the
    /// settings in `config.toml`, which is written with defaults if absent.
    pub fn init(path: impl AsRef<Path>) -> RepoResult<Self> {
        let root = path.as_ref().to_path_buf();
        let meta = root.join(METADATA_DIR);
        fs::create_dir_all(&meta).map_err(|e| RepoError::io(&meta, e))?;

        let config_path = meta.join(CONFIG_FILE);
        let config = match RepoConfig::load(&config_path)? {
            Some(config) => config,
            None => {
                let config = RepoConfig::default();
                config.save(&config_path)?;
                config
            }
        };

        let backend = SledBackend::open(&meta.join(DB_DIR))?;
        Self::with_backend(root, backend, config)
    }
}

impl<B: KvBackend> Repository<B> {
    /// Open a repository over an existing backend.
    ///
    /// Loads the refs if both reference keys are present. If neither is,
    /// stores an empty root tree and the initial commit and makes
    /// `config.default_branch` point at it.
    pub fn with_backend(
        working_path: impl Into<PathBuf>,
        backend: B,
        config: RepoConfig,
    ) -> RepoResult<Self> {
        let working_path = working_path.into();
        let store = ObjectStore::with_compression_level(backend, config.compression_level);

        let branch = store.backend().get(BRANCH_KEY.as_bytes())?;
        let heads = store.backend().get(REFS_KEY.as_bytes())?;
        let refs = match (branch, heads) {
            (Some(branch), Some(heads)) => {
                let refs = RefTable::decode(&branch, &heads)?;
                info!(
                    path = %working_path.display(),
                    branch = refs.current(),
                    "opened repository"
                );
                refs
            }
            (None, None) => Self::bootstrap(&store, &config)?,
            (Some(_), None) => {
                return Err(RepoError::CorruptData(format!(
                    "{BRANCH_KEY} is set but {REFS_KEY} is missing"
                )))
            }
            (None, Some(_)) => {
                return Err(RepoError::CorruptData(format!(
                    "{REFS_KEY} is set but {BRANCH_KEY} is missing"
                )))
            }
        };

        Ok(Self {
            config,
            store,
            refs,
            working_path,
        })
    }

    fn bootstrap(store: &ObjectStore<B>, config: &RepoConfig) -> RepoResult<RefTable> {
        validate_branch_name(&config.default_branch)?;
        let tree = store.put(&Tree::empty().to_object()?)?;
        let commit = Commit::initial(tree, now());
        let hash = store.put(&commit.to_object()?)?;
        store.flush()?;

        let refs = RefTable::new(config.default_branch.clone(), hash);
        persist_refs(store, &refs)?;
        info!(
            branch = refs.current(),
            commit = %hash.short_hex(),
            "initialized repository"
        );
        Ok(refs)
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn working_path(&self) -> &Path {
        &self.working_path
    }

    pub fn store(&self) -> &ObjectStore<B> {
        &self.store
    }

    pub fn current_branch(&self) -> &str {
        self.refs.current()
    }

    /// Head commit of the current branch.
    pub fn head(&self) -> RepoResult<ObjectHash> {
        Ok(self.refs.current_head()?)
    }

    /// Branch names, sorted.
    pub fn list_branches(&self) -> Vec<String> {
        self.refs.branches().map(str::to_string).collect()
    }

    // ---- History ----

    /// Snapshot the working tree and record it as a new commit on the
    /// current branch.
    pub fn create_commit(&mut self, author: &str, description: &str) -> RepoResult<ObjectHash> {
        let parent = self.refs.current_head()?;
        let snapshot = self.snapshot_builder(&self.store).build(&self.working_path)?;

        let commit = Commit::new(Some(parent), snapshot.root, author, now(), description);
        let hash = self.store.put(&commit.to_object()?)?;
        self.store.flush()?;

        let mut refs = self.refs.clone();
        refs.advance(hash);
        self.update_refs(refs)?;

        info!(
            branch = self.refs.current(),
            commit = %hash.short_hex(),
            tree = %snapshot.root.short_hex(),
            objects = snapshot.objects_written,
            "created commit"
        );
        Ok(hash)
    }

    /// Walk `branch` from its head towards the root, newest first.
    ///
    /// Stops after `limit` commits; `0` means no limit.
    pub fn get_commits(&self, branch: &str, limit: usize) -> RepoResult<Vec<CommitEntry>> {
        let head = self
            .refs
            .head_of(branch)
            .ok_or_else(|| RepoError::BranchNotFound(branch.to_string()))?;

        let mut entries = Vec::new();
        let mut next = Some(head);
        while let Some(hash) = next {
            if limit != 0 && entries.len() >= limit {
                break;
            }
            let commit = self
                .store
                .get_commit(&hash)
                .map_err(|e| RepoError::CorruptHistory {
                    hash,
                    reason: e.to_string(),
                })?;
            next = commit.origin;
            entries.push(CommitEntry { hash, commit });
        }
        debug!(branch, count = entries.len(), "walked history");
        Ok(entries)
    }

    pub fn get_commit(&self, hash: &ObjectHash) -> RepoResult<CommitEntry> {
        let commit = self.store.get_commit(hash)?;
        Ok(CommitEntry {
            hash: *hash,
            commit,
        })
    }

    pub fn get_object(&self, hash: &ObjectHash) -> RepoResult<Object> {
        Ok(self.store.get(hash)?)
    }

    /// Resolve a branch name or a full hex hash to a hash.
    ///
    /// Branch names win over hashes.
    pub fn resolve_hash(&self, rev: &str) -> RepoResult<ObjectHash> {
        if let Some(head) = self.refs.head_of(rev) {
            return Ok(head);
        }
        ObjectHash::from_hex(rev).map_err(|_| RepoError::BranchNotFound(rev.to_string()))
    }

    // ---- Branches ----

    /// Create `name` at the current head without switching to it.
    pub fn create_branch(&mut self, name: &str) -> RepoResult<ObjectHash> {
        let mut refs = self.refs.clone();
        let head = refs.create_branch(name)?;
        self.update_refs(refs)?;
        info!(branch = name, head = %head.short_hex(), "created branch");
        Ok(head)
    }

    /// Make `name` the current branch. The working tree is not touched.
    pub fn change_branch(&mut self, name: &str) -> RepoResult<()> {
        let mut refs = self.refs.clone();
        refs.change_branch(name)?;
        self.update_refs(refs)?;
        info!(branch = name, "switched branch");
        Ok(())
    }

    // ---- Diffs ----

    /// Changes in the working tree since the head of the current branch.
    pub fn diff_working_vs_head(&self) -> RepoResult<Vec<FileChange>> {
        let head = self.refs.current_head()?;
        self.diff_working_vs_commit(&head)
    }

    /// Changes in the working tree relative to `commit`.
    ///
    /// The working tree is snapshotted into a scratch arena; nothing is
    /// written to the store.
    pub fn diff_working_vs_commit(&self, commit: &ObjectHash) -> RepoResult<Vec<FileChange>> {
        let base = self.get_commit(commit)?.commit;
        let arena = ObjectArena::new();
        let snapshot = self.snapshot_builder(&arena).build(&self.working_path)?;

        let comparator = TreeComparator::new(&self.store, &arena, self.differ());
        let changes = comparator.compare_trees(Some(&base.tree), Some(&snapshot.root))?;
        debug!(commit = %commit.short_hex(), changes = changes.len(), "diffed working tree");
        Ok(changes)
    }

    /// Changes between two stored commits, `old` to `new`.
    pub fn diff_commits(&self, old: &ObjectHash, new: &ObjectHash) -> RepoResult<Vec<FileChange>> {
        self.get_commit(old)?;
        self.get_commit(new)?;
        let comparator = TreeComparator::new(&self.store, &self.store, self.differ());
        Ok(comparator.compare_commits(old, new)?)
    }

    /// Flush outstanding writes and release the backend.
    pub fn close(self) -> RepoResult<()> {
        self.store.flush()?;
        debug!(path = %self.working_path.display(), "closed repository");
        Ok(())
    }

    fn snapshot_builder<S: ObjectSink>(&self, sink: S) -> SnapshotBuilder<S> {
        SnapshotBuilder::new(sink, METADATA_DIR).with_ignored(self.config.ignore.iter().cloned())
    }

    fn differ(&self) -> LineDiffer {
        LineDiffer::new(self.config.refine_edits)
    }

    fn update_refs(&mut self, refs: RefTable) -> RepoResult<()> {
        persist_refs(&self.store, &refs)?;
        self.refs = refs;
        Ok(())
    }
}

/// Write both reference keys in one atomic batch and flush.
fn persist_refs<B: KvBackend>(store: &ObjectStore<B>, refs: &RefTable) -> RepoResult<()> {
    let mut batch = WriteBatch::new();
    batch
        .set(BRANCH_KEY, refs.encode_branch())
        .set(REFS_KEY, refs.encode_heads()?);
    store.backend().apply(batch)?;
    store.flush()?;
    Ok(())
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl<B: KvBackend> std::fmt::Debug for Repository<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("working_path", &self.working_path)
            .field("branch", &self.refs.current())
            .finish()
    }
}
