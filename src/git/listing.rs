//! Path listings for GitManager
//!
//! Flat, slash-separated, repository-relative listings that feed the tree
//! builder, plus the one-level listing used for lazy directory expansion.

use git2::{ErrorCode, Status, StatusOptions};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use super::{GitError, GitManager};
use crate::diff::SNIFF_LIMIT;
use crate::file_tree::{compare_nodes, join_path, FileNode, NodeType};

impl GitManager {
    /// Paths recorded in the index, in index order, without duplicates
    pub fn list_tracked_files(&self) -> Result<Vec<String>, GitError> {
        let index = self.repo.index()?;
        let mut seen = HashSet::new();
        let mut paths = Vec::new();

        for entry in index.iter() {
            let path = String::from_utf8_lossy(&entry.path).into_owned();
            // Conflicted paths have one entry per stage
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }

        Ok(paths)
    }

    /// Untracked files, recursing into untracked directories
    pub fn list_untracked_files(&self) -> Result<Vec<String>, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        self.paths_with_status(&mut opts, Status::WT_NEW)
    }

    /// Ignored files, recursing into ignored directories
    pub fn list_ignored_files(&self) -> Result<Vec<String>, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(true)
            .recurse_ignored_dirs(true);
        self.paths_with_status(&mut opts, Status::IGNORED)
    }

    fn paths_with_status(
        &self,
        opts: &mut StatusOptions,
        wanted: Status,
    ) -> Result<Vec<String>, GitError> {
        let statuses = self.repo.statuses(Some(opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().intersects(wanted))
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }

    /// Direct children of `dir` among tracked and untracked paths.
    ///
    /// Subdirectories come back unloaded (`children = None`) so the UI can
    /// expand them on demand. An empty `dir` lists the repository root.
    pub fn list_directory(&self, dir: &str) -> Result<Vec<Arc<FileNode>>, GitError> {
        let dir = dir.trim_matches('/');
        let mut paths = self.list_tracked_files()?;
        paths.extend(self.list_untracked_files()?);
        Ok(direct_children(dir, &paths))
    }

    /// Up to `SNIFF_LIMIT` leading bytes of a working-copy file
    pub fn read_sample(&self, relative: &str) -> Result<Vec<u8>, GitError> {
        let path = self.resolve_workdir_path(relative)?;
        if !path.is_file() {
            return Err(GitError::NotFound(relative.to_string()));
        }
        let mut sample = Vec::with_capacity(SNIFF_LIMIT);
        File::open(&path)?
            .take(SNIFF_LIMIT as u64)
            .read_to_end(&mut sample)?;
        Ok(sample)
    }

    /// Size in bytes of a working-copy file
    pub fn file_size(&self, relative: &str) -> Result<u64, GitError> {
        let path = self.resolve_workdir_path(relative)?;
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(GitError::NotFound(relative.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GitError::NotFound(relative.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Size in bytes of a file as recorded in the tree of `rev`
    pub fn blob_size_at(&self, rev: &str, relative: &str) -> Result<u64, GitError> {
        let tree = self.repo.revparse_single(rev)?.peel_to_tree()?;
        let entry = match tree.get_path(Path::new(relative)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(GitError::NotFound(relative.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let blob = self.repo.find_blob(entry.id())?;
        Ok(blob.size() as u64)
    }
}

/// One level of the tree below `dir`, built from a flat listing and sorted
/// directories first.
pub(crate) fn direct_children(dir: &str, paths: &[String]) -> Vec<Arc<FileNode>> {
    let mut entries: BTreeMap<String, NodeType> = BTreeMap::new();

    for path in paths {
        let rest = if dir.is_empty() {
            path.as_str()
        } else {
            match path.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
                Some(rest) => rest,
                None => continue,
            }
        };

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let Some(name) = segments.next() else {
            continue;
        };
        let node_type = if segments.next().is_some() {
            NodeType::Directory
        } else {
            NodeType::File
        };
        // First listing of a name decides its kind
        entries.entry(name.to_string()).or_insert(node_type);
    }

    let mut children: Vec<Arc<FileNode>> = entries
        .into_iter()
        .map(|(name, node_type)| {
            let path = join_path(dir, &name);
            Arc::new(match node_type {
                NodeType::File => FileNode::file(name, path),
                NodeType::Directory => FileNode::unloaded_directory(name, path),
            })
        })
        .collect();
    children.sort_by(|a, b| compare_nodes(a, b));
    children
}
