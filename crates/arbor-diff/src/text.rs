//! Text-level edit scripts.
//!
//! Uses the `similar` crate (Myers diff algorithm).

use std::time::{Duration, Instant};

use similar::{capture_diff_slices, Algorithm, ChangeTag, DiffTag, TextDiff};

use crate::edit::{push_span, Edit, EditOp};

/// Replaced runs larger than this (old plus new bytes) stay whole-line.
pub const REFINE_MAX_BYTES: usize = 16 * 1024;

/// Upper bound on time spent refining one replaced run.
const REFINE_TIMEOUT: Duration = Duration::from_millis(100);

/// Produces an edit script turning `old` into `new`.
///
/// Concatenating the `Equal` and `Delete` spans must give back `old`, and
/// concatenating the `Equal` and `Insert` spans must give back `new`.
pub trait TextDiffer {
    fn diff(&self, old: &str, new: &str) -> Vec<Edit>;
}

impl<D: TextDiffer + ?Sized> TextDiffer for &D {
    fn diff(&self, old: &str, new: &str) -> Vec<Edit> {
        (**self).diff(old, new)
    }
}

fn tag_op(tag: ChangeTag) -> EditOp {
    match tag {
        ChangeTag::Equal => EditOp::Equal,
        ChangeTag::Insert => EditOp::Insert,
        ChangeTag::Delete => EditOp::Delete,
    }
}

/// Line diff with optional character refinement.
///
/// Lines are compared first. Each run of deleted lines directly followed by
/// inserted lines is then re-diffed character by character when `refine` is
/// set, so `"hello"` to `"hello world"` yields `Equal("hello")` plus
/// `Insert(" world")` instead of a whole-line replacement. Runs above
/// [`REFINE_MAX_BYTES`] are left as whole-line spans.
#[derive(Clone, Copy, Debug)]
pub struct LineDiffer {
    refine: bool,
}

impl Default for LineDiffer {
    fn default() -> Self {
        Self { refine: true }
    }
}

impl LineDiffer {
    pub fn new(refine: bool) -> Self {
        Self { refine }
    }

    /// Line-level spans only.
    pub fn lines_only() -> Self {
        Self::new(false)
    }

    fn flush(&self, deleted: &mut String, inserted: &mut String, script: &mut Vec<Edit>) {
        let refinable = !deleted.is_empty()
            && !inserted.is_empty()
            && deleted.len() + inserted.len() <= REFINE_MAX_BYTES;
        if self.refine && refinable {
            let chars = TextDiff::configure()
                .algorithm(Algorithm::Myers)
                .deadline(Instant::now() + REFINE_TIMEOUT)
                .diff_chars(deleted.as_str(), inserted.as_str());
            for change in chars.iter_all_changes() {
                push_span(script, tag_op(change.tag()), change.value());
            }
        } else {
            push_span(script, EditOp::Delete, deleted);
            push_span(script, EditOp::Insert, inserted);
        }
        deleted.clear();
        inserted.clear();
    }
}

impl TextDiffer for LineDiffer {
    fn diff(&self, old: &str, new: &str) -> Vec<Edit> {
        let lines = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(old, new);

        let mut script = Vec::new();
        let mut deleted = String::new();
        let mut inserted = String::new();
        for change in lines.iter_all_changes() {
            match change.tag() {
                ChangeTag::Equal => {
                    self.flush(&mut deleted, &mut inserted, &mut script);
                    push_span(&mut script, EditOp::Equal, change.value());
                }
                ChangeTag::Delete => deleted.push_str(change.value()),
                ChangeTag::Insert => inserted.push_str(change.value()),
            }
        }
        self.flush(&mut deleted, &mut inserted, &mut script);
        script
    }
}

/// Line diff over raw bytes, for content that is not valid UTF-8.
///
/// Lines are compared byte-exactly; spans are rendered lossily, so two
/// different invalid sequences still show up as a delete plus an insert.
pub fn diff_byte_lines(old: &[u8], new: &[u8]) -> Vec<Edit> {
    let old_lines: Vec<&[u8]> = old.split_inclusive(|b| *b == b'\n').collect();
    let new_lines: Vec<&[u8]> = new.split_inclusive(|b| *b == b'\n').collect();

    let mut script = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let old_text = String::from_utf8_lossy(&old_lines[old_range].concat()).into_owned();
        let new_text = String::from_utf8_lossy(&new_lines[new_range].concat()).into_owned();
        match tag {
            DiffTag::Equal => push_span(&mut script, EditOp::Equal, &old_text),
            DiffTag::Delete => push_span(&mut script, EditOp::Delete, &old_text),
            DiffTag::Insert => push_span(&mut script, EditOp::Insert, &new_text),
            DiffTag::Replace => {
                push_span(&mut script, EditOp::Delete, &old_text);
                push_span(&mut script, EditOp::Insert, &new_text);
            }
        }
    }
    script
}
