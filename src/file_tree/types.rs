//! File tree data types

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::diff::ChangeStatus;

/// Kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

/// A node of the repository file tree.
///
/// `children` distinguishes two directory states explicitly:
/// - `None`: the listing has not been fetched yet (lazy)
/// - `Some(vec![])`: fetched, and the directory is empty
///
/// Children are shared through `Arc` so transformations can hand back the
/// very same subtree when nothing in it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub name: String,
    /// Slash-joined path from the root; empty for the root itself
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<FileNode>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChangeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_binary: Option<bool>,
}

impl FileNode {
    /// Root directory with the given (already loaded) children
    pub fn root(children: Vec<Arc<FileNode>>) -> Self {
        Self::directory("", "", Some(children))
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: NodeType::File,
            children: None,
            status: None,
            is_binary: None,
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Option<Vec<Arc<FileNode>>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: NodeType::Directory,
            children,
            status: None,
            is_binary: None,
        }
    }

    /// Directory whose listing has not been fetched yet
    pub fn unloaded_directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::directory(name, path, None)
    }

    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.node_type == NodeType::File
    }

    /// A directory whose children have been fetched (possibly empty)
    pub fn is_loaded(&self) -> bool {
        self.children.is_some()
    }

    pub fn with_status(mut self, status: Option<ChangeStatus>) -> Self {
        self.status = status;
        self
    }

    /// Copy of this node with a different child list; other fields are kept
    pub fn with_children(&self, children: Option<Vec<Arc<FileNode>>>) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            node_type: self.node_type,
            children,
            status: self.status,
            is_binary: self.is_binary,
        }
    }

    /// Find a descendant (or self) by exact path
    pub fn find(self: &Arc<Self>, path: &str) -> Option<Arc<FileNode>> {
        if self.path == path {
            return Some(Arc::clone(self));
        }
        let children = self.children.as_ref()?;
        children
            .iter()
            .filter(|child| child.path == path || is_path_prefix(&child.path, path))
            .find_map(|child| child.find(path))
    }

    /// Number of file nodes in the loaded part of the tree
    pub fn file_count(&self) -> usize {
        match &self.children {
            _ if self.is_file() => 1,
            Some(children) => children.iter().map(|c| c.file_count()).sum(),
            None => 0,
        }
    }
}

/// Join a parent path and a child name with `/`; the root has an empty path
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Whether `dir` is a strict ancestor directory of `path` (`a/b` of `a/b/c`)
pub fn is_path_prefix(dir: &str, path: &str) -> bool {
    if dir.is_empty() {
        return !path.is_empty();
    }
    path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

/// One entry of a flat status listing, the input to status merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub path: String,
    pub status: ChangeStatus,
    #[serde(default)]
    pub staged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
}

impl FileStatus {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
            staged: false,
            old_path: None,
        }
    }
}
