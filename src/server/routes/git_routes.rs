//! Git-related command routing
//!
//! Handles: git_status, git_list_untracked, file_binary_info

use crate::commands;
use serde_json::Value;

use super::{get_arg, route_sync, ServerAppState};

/// Route git-related commands
pub async fn route_git_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    match cmd {
        "git_status" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            route_sync!(commands::git_get_status(repo_path, &state.git_state))
        }

        "git_list_untracked" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            route_sync!(commands::git_list_untracked(repo_path, &state.git_state))
        }

        "file_binary_info" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            let path: String = get_arg(&args, "path")?;
            route_sync!(commands::detect_file_binary(
                repo_path,
                path,
                &state.git_state
            ))
        }

        _ => Err(format!("Unknown git command: {}", cmd)),
    }
}

/// Check if a command is a git command
pub fn is_git_command(cmd: &str) -> bool {
    matches!(cmd, "git_status" | "git_list_untracked" | "file_binary_info")
}
