// File tree commands: repository listings through the tree engine

use super::config::ConfigState;
use super::git::{primary_statuses, GitState};
use crate::diff::{detect_binary, BinaryInfo};
use crate::file_tree::{
    build_tree_from_paths, insert_children_into_tree, mark_binary_files, mark_untracked_files,
    merge_status_into_tree, FileNode, FileStatus,
};
use crate::git::{GitError, GitManager};
use std::collections::HashSet;
use std::sync::Arc;

/// Build a sorted tree from client-supplied paths
pub fn build_tree(paths: Vec<String>) -> Arc<FileNode> {
    build_tree_from_paths(paths)
}

/// Annotate a client-supplied tree with statuses
pub fn merge_status(tree: Arc<FileNode>, statuses: Vec<FileStatus>) -> Arc<FileNode> {
    merge_status_into_tree(&tree, &statuses)
}

/// Attach a directory listing to a client-supplied tree
pub fn insert_children(
    tree: Arc<FileNode>,
    dir_path: String,
    children: Vec<Arc<FileNode>>,
) -> Arc<FileNode> {
    insert_children_into_tree(&tree, &dir_path, children)
}

/// Full annotated tree of the working copy
pub fn get_file_tree(
    repo_path: String,
    include_untracked: Option<bool>,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Arc<FileNode>, String> {
    let include_untracked =
        include_untracked.unwrap_or(config_state.tree_config()?.include_untracked);

    git_state.with_manager(&repo_path, |manager| {
        let mut paths = manager.list_tracked_files()?;
        let untracked: HashSet<String> = if include_untracked {
            manager.list_untracked_files()?.into_iter().collect()
        } else {
            HashSet::new()
        };
        paths.extend(untracked.iter().cloned());

        let tree = build_tree_from_paths(&paths);
        let statuses = tree_statuses(manager, include_untracked)?;
        Ok(annotate(&tree, &untracked, &statuses))
    })
}

/// Load one directory level into an existing tree
pub fn expand_directory(
    repo_path: String,
    tree: Arc<FileNode>,
    dir_path: String,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Arc<FileNode>, String> {
    let include_untracked = config_state.tree_config()?.include_untracked;

    git_state.with_manager(&repo_path, |manager| {
        let untracked: HashSet<String> = manager.list_untracked_files()?.into_iter().collect();
        let children: Vec<Arc<FileNode>> = manager
            .list_directory(&dir_path)?
            .into_iter()
            .filter(|child| include_untracked || child.is_dir() || !untracked.contains(&child.path))
            .collect();

        let expanded = insert_children_into_tree(&tree, &dir_path, children);
        let statuses = tree_statuses(manager, include_untracked)?;
        Ok(annotate(&expanded, &untracked, &statuses))
    })
}

/// Classify one working-copy file as binary or text
pub fn detect_file_binary(
    repo_path: String,
    path: String,
    git_state: &GitState,
) -> Result<BinaryInfo, String> {
    git_state.with_manager(&repo_path, |manager| {
        let sample = match manager.read_sample(&path) {
            Ok(bytes) => Some(bytes),
            Err(GitError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        Ok(detect_binary(&path, sample.as_deref()))
    })
}

fn tree_statuses(manager: &GitManager, include_untracked: bool) -> Result<Vec<FileStatus>, GitError> {
    let statuses = primary_statuses(manager.get_status()?);
    Ok(statuses
        .into_iter()
        .filter(|s| include_untracked || s.status != crate::diff::ChangeStatus::Untracked)
        .collect())
}

fn annotate(
    tree: &Arc<FileNode>,
    untracked: &HashSet<String>,
    statuses: &[FileStatus],
) -> Arc<FileNode> {
    let tree = mark_untracked_files(tree, untracked);
    let tree = merge_status_into_tree(&tree, statuses);
    mark_binary_files(&tree)
}
