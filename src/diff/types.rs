//! Diff data types
//!
//! Structured, line-addressable records produced from unified diff text.
//! These are plain value objects: they are built fresh for every request and
//! serialized as-is to the UI layer.

use serde::{Deserialize, Serialize};

/// File-operation status of a changed path.
///
/// Shared by diff records and by file tree status annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Untracked,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Renamed => "renamed",
            ChangeStatus::Copied => "copied",
            ChangeStatus::Untracked => "untracked",
        }
    }

    /// Whether this status carries an `old_path` on diff records
    pub fn has_old_path(&self) -> bool {
        matches!(self, ChangeStatus::Renamed | ChangeStatus::Copied)
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a single line inside a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Context,
    Add,
    Delete,
}

/// One line of a chunk, with its marker stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Line number in the old file (absent for additions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line: Option<u32>,
    /// Line number in the new file (absent for deletions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<u32>,
    pub content: String,
}

/// Decoded `@@ -a,b +c,d @@` quadruple
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRange {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
}

impl ChunkRange {
    /// True for the all-zero fallback produced by an unreadable header
    pub fn is_degenerate(&self) -> bool {
        *self == ChunkRange::default()
    }
}

/// A contiguous block of changes within one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffChunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// The raw `@@ ... @@` line
    pub header: String,
    pub changes: Vec<DiffChange>,
}

impl DiffChunk {
    pub fn new(range: ChunkRange, header: impl Into<String>) -> Self {
        Self {
            old_start: range.old_start,
            old_lines: range.old_lines,
            new_start: range.new_start,
            new_lines: range.new_lines,
            header: header.into(),
            changes: Vec::new(),
        }
    }

    pub fn range(&self) -> ChunkRange {
        ChunkRange {
            old_start: self.old_start,
            old_lines: self.old_lines,
            new_start: self.new_start,
            new_lines: self.new_lines,
        }
    }

    pub fn count(&self, change_type: ChangeType) -> usize {
        self.changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .count()
    }
}

/// Structured diff of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub path: String,
    pub status: ChangeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub additions: usize,
    pub deletions: usize,
    pub chunks: Vec<DiffChunk>,
    pub is_binary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl FileDiff {
    /// An untracked file has no diff body; only its path is known
    pub fn untracked(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: ChangeStatus::Untracked,
            old_path: None,
            additions: 0,
            deletions: 0,
            chunks: Vec::new(),
            is_binary: false,
            file_size: None,
        }
    }

    /// Nothing meaningful to render: every chunk (if any) has an all-zero
    /// header and no changes
    pub fn is_degenerate(&self) -> bool {
        self.chunks.iter().all(|c| c.range().is_degenerate() && c.changes.is_empty())
    }
}
