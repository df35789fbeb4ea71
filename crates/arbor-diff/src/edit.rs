use serde::{Deserialize, Serialize};

/// Kind of span in an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    Equal,
    Insert,
    Delete,
}

/// One span of an edit script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub op: EditOp,
    pub text: String,
}

impl Edit {
    pub fn new(op: EditOp, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(EditOp::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(EditOp::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(EditOp::Delete, text)
    }

    pub fn is_change(&self) -> bool {
        self.op != EditOp::Equal
    }
}

/// Append `text` to the script, merging with the last span when it has the
/// same op. Empty text is dropped.
pub(crate) fn push_span(script: &mut Vec<Edit>, op: EditOp, text: &str) {
    if text.is_empty() {
        return;
    }
    match script.last_mut() {
        Some(last) if last.op == op => last.text.push_str(text),
        _ => script.push(Edit::new(op, text)),
    }
}

/// A changed file: its path relative to the snapshot root and the edit
/// script turning the old contents into the new.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub edits: Vec<Edit>,
}

impl FileChange {
    pub fn new(path: impl Into<String>, edits: Vec<Edit>) -> Self {
        Self {
            path: path.into(),
            edits,
        }
    }

    /// Characters in inserted spans.
    pub fn insertions(&self) -> usize {
        self.count(EditOp::Insert)
    }

    /// Characters in deleted spans.
    pub fn deletions(&self) -> usize {
        self.count(EditOp::Delete)
    }

    /// The file was added: nothing but insertions.
    pub fn is_pure_insertion(&self) -> bool {
        self.edits.iter().all(|e| e.op == EditOp::Insert) && !self.edits.is_empty()
    }

    /// The file was removed: nothing but deletions.
    pub fn is_pure_deletion(&self) -> bool {
        self.edits.iter().all(|e| e.op == EditOp::Delete) && !self.edits.is_empty()
    }

    fn count(&self, op: EditOp) -> usize {
        self.edits
            .iter()
            .filter(|e| e.op == op)
            .map(|e| e.text.chars().count())
            .sum()
    }
}
