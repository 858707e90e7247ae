//! File tree command routing
//!
//! Handles: tree_build, tree_get, tree_expand, tree_insert_children,
//! tree_merge_status

use crate::commands;
use crate::file_tree::{FileNode, FileStatus};
use serde_json::Value;
use std::sync::Arc;

use super::{get_arg, get_opt_arg, route_sync, route_value, ServerAppState};

/// Route file tree commands
pub async fn route_tree_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    match cmd {
        "tree_build" => {
            let paths: Vec<String> = get_arg(&args, "paths")?;
            route_value!(commands::build_tree(paths))
        }

        "tree_get" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            let include_untracked: Option<bool> = get_opt_arg(&args, "includeUntracked")?;
            route_sync!(commands::get_file_tree(
                repo_path,
                include_untracked,
                &state.git_state,
                &state.config_state
            ))
        }

        "tree_expand" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            let tree: Arc<FileNode> = get_arg(&args, "tree")?;
            let dir_path: String = get_arg(&args, "dirPath")?;
            route_sync!(commands::expand_directory(
                repo_path,
                tree,
                dir_path,
                &state.git_state,
                &state.config_state
            ))
        }

        "tree_insert_children" => {
            let tree: Arc<FileNode> = get_arg(&args, "tree")?;
            let dir_path: String = get_arg(&args, "dirPath")?;
            let children: Vec<Arc<FileNode>> = get_arg(&args, "children")?;
            route_value!(commands::insert_children(tree, dir_path, children))
        }

        "tree_merge_status" => {
            let tree: Arc<FileNode> = get_arg(&args, "tree")?;
            let statuses: Vec<FileStatus> = get_arg(&args, "statuses")?;
            route_value!(commands::merge_status(tree, statuses))
        }

        _ => Err(format!("Unknown tree command: {}", cmd)),
    }
}

/// Check if a command is a file tree command
pub fn is_tree_command(cmd: &str) -> bool {
    matches!(
        cmd,
        "tree_build" | "tree_get" | "tree_expand" | "tree_insert_children" | "tree_merge_status"
    )
}
