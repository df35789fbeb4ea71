//! Text and JSON views of repository data.

use arbor_repo::{CommitEntry, EditOp, FileChange, Object, ObjectKind};
use colored::Colorize;
use serde::Serialize;
use serde_json::{json, Value};

/// JSON shape of a commit, with hashes in hex.
#[derive(Debug, Serialize)]
pub struct CommitView {
    pub hash: String,
    pub origin: Option<String>,
    pub tree: String,
    pub author: String,
    pub time: i64,
    pub date: String,
    pub description: String,
}

impl From<&CommitEntry> for CommitView {
    fn from(entry: &CommitEntry) -> Self {
        let c = &entry.commit;
        Self {
            hash: entry.hash.to_hex(),
            origin: c.origin.map(|h| h.to_hex()),
            tree: c.tree.to_hex(),
            author: c.author.clone(),
            time: c.time,
            date: format_time(c.time),
            description: c.description.clone(),
        }
    }
}

pub fn format_time(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub fn commit_oneline(entry: &CommitEntry) -> String {
    format!(
        "{} {}",
        entry.hash.short_hex().yellow(),
        entry.commit.description
    )
}

pub fn commit_block(entry: &CommitEntry) -> String {
    let c = &entry.commit;
    let mut out = format!("{} {}\n", "commit".yellow(), entry.hash.to_hex().yellow());
    if let Some(origin) = c.origin {
        out.push_str(&format!("Origin: {}\n", origin.short_hex()));
    }
    if !c.author.is_empty() {
        out.push_str(&format!("Author: {}\n", c.author));
    }
    out.push_str(&format!("Date:   {}\n\n    {}\n", format_time(c.time), c.description));
    out
}

pub fn change_stat(change: &FileChange) -> String {
    format!(
        "{} | {} {}",
        change.path,
        format!("+{}", change.insertions()).green(),
        format!("-{}", change.deletions()).red()
    )
}

/// Header line plus the new text with inserted spans in green and deleted
/// spans in red.
pub fn change_body(change: &FileChange) -> String {
    let status = if change.is_pure_insertion() {
        "added"
    } else if change.is_pure_deletion() {
        "deleted"
    } else {
        "modified"
    };
    let mut out = format!("{} {}\n", format!("{status}:").bold(), change.path.bold());
    for edit in &change.edits {
        let span = match edit.op {
            EditOp::Equal => edit.text.normal(),
            EditOp::Insert => edit.text.green(),
            EditOp::Delete => edit.text.red().strikethrough(),
        };
        out.push_str(&span.to_string());
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Human-readable dump of a stored object.
pub fn object_text(object: &Object) -> anyhow::Result<String> {
    Ok(match object.kind() {
        ObjectKind::Blob => String::from_utf8_lossy(object.payload()).into_owned(),
        ObjectKind::Tree => object
            .as_tree()?
            .children
            .iter()
            .map(|c| format!("{} {} {}\n", c.kind, c.hash, c.name))
            .collect(),
        ObjectKind::Commit => {
            let c = object.as_commit()?;
            let mut out = format!("tree {}\n", c.tree);
            if let Some(origin) = c.origin {
                out.push_str(&format!("origin {origin}\n"));
            }
            out.push_str(&format!(
                "author {}\ntime {}\n\n{}\n",
                c.author, c.time, c.description
            ));
            out
        }
    })
}

pub fn object_json(object: &Object) -> anyhow::Result<Value> {
    let hash = object.hash().to_hex();
    Ok(match object.kind() {
        ObjectKind::Blob => json!({
            "hash": hash,
            "kind": "blob",
            "size": object.payload().len(),
            "data": String::from_utf8_lossy(object.payload()),
        }),
        ObjectKind::Tree => {
            let children: Vec<Value> = object
                .as_tree()?
                .children
                .iter()
                .map(|c| json!({ "kind": c.kind.to_string(), "name": c.name, "hash": c.hash.to_hex() }))
                .collect();
            json!({ "hash": hash, "kind": "tree", "children": children })
        }
        ObjectKind::Commit => {
            let c = object.as_commit()?;
            json!({
                "hash": hash,
                "kind": "commit",
                "tree": c.tree.to_hex(),
                "origin": c.origin.map(|h| h.to_hex()),
                "author": c.author,
                "time": c.time,
                "description": c.description,
            })
        }
    })
}
