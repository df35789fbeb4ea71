use std::fs;
use std::path::Path;

use arbor_refs::DEFAULT_BRANCH;
use arbor_store::compress::DEFAULT_LEVEL;
use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// Per-repository settings, stored as TOML in the metadata directory.
///
/// Missing keys fall back to their defaults, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch created when the repository is initialized.
    pub default_branch: String,
    /// zlib level for stored objects (0-9).
    pub compression_level: u32,
    /// Author recorded when a commit does not name one.
    pub author: Option<String>,
    /// Extra file or directory names the snapshot builder skips.
    pub ignore: Vec<String>,
    /// Refine changed lines into character spans in diffs.
    pub refine_edits: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: DEFAULT_BRANCH.to_string(),
            compression_level: DEFAULT_LEVEL,
            author: None,
            ignore: Vec::new(),
            refine_edits: true,
        }
    }
}

impl RepoConfig {
    pub fn from_toml_str(s: &str) -> RepoResult<Self> {
        toml::from_str(s).map_err(|e| RepoError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> RepoResult<String> {
        toml::to_string_pretty(self).map_err(|e| RepoError::Config(e.to_string()))
    }

    /// Read the config file at `path`, `Ok(None)` if it does not exist.
    pub fn load(path: &Path) -> RepoResult<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepoError::io(path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> RepoResult<()> {
        fs::write(path, self.to_toml_string()?).map_err(|e| RepoError::io(path, e))
    }
}
