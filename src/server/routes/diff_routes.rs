//! Diff command routing
//!
//! Handles: diff_parse, diff_working, diff_staged, diff_unstaged, diff_commit,
//! diff_range

use crate::commands;
use serde_json::Value;

use super::{get_arg, get_opt_arg, route_sync, route_value, ServerAppState};

/// Route diff commands
pub async fn route_diff_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    match cmd {
        "diff_parse" => {
            let text: String = get_arg(&args, "text")?;
            route_value!(commands::parse_diff_text(text))
        }

        "diff_working" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            let include_untracked: Option<bool> = get_opt_arg(&args, "includeUntracked")?;
            route_sync!(commands::get_working_diff(
                repo_path,
                include_untracked,
                &state.git_state,
                &state.config_state
            ))
        }

        "diff_staged" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            route_sync!(commands::get_staged_diff(
                repo_path,
                &state.git_state,
                &state.config_state
            ))
        }

        "diff_unstaged" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            route_sync!(commands::get_unstaged_diff(
                repo_path,
                &state.git_state,
                &state.config_state
            ))
        }

        "diff_commit" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            let commit_id: String = get_arg(&args, "commitId")?;
            route_sync!(commands::get_commit_diff(
                repo_path,
                commit_id,
                &state.git_state,
                &state.config_state
            ))
        }

        "diff_range" => {
            let repo_path: String = get_arg(&args, "repoPath")?;
            let from: String = get_arg(&args, "from")?;
            let to: String = get_arg(&args, "to")?;
            route_sync!(commands::get_range_diff(
                repo_path,
                from,
                to,
                &state.git_state,
                &state.config_state
            ))
        }

        _ => Err(format!("Unknown diff command: {}", cmd)),
    }
}

/// Check if a command is a diff command
pub fn is_diff_command(cmd: &str) -> bool {
    matches!(
        cmd,
        "diff_parse"
            | "diff_working"
            | "diff_staged"
            | "diff_unstaged"
            | "diff_commit"
            | "diff_range"
    )
}
