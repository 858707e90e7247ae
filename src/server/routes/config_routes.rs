//! Configuration command routing
//!
//! Handles: get_config, set_config_project_path, get_config_paths_cmd,
//! update_diff_config

use crate::commands;
use serde_json::Value;

use super::{get_opt_arg, route_async, ServerAppState};

/// Route configuration commands
pub async fn route_config_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    match cmd {
        "get_config" => route_async!(commands::get_config(&state.config_state)),

        "set_config_project_path" => {
            let project_path: Option<String> = get_opt_arg(&args, "projectPath")?;
            route_async!(commands::set_config_project_path(
                project_path,
                &state.config_state
            ))
        }

        "get_config_paths_cmd" => {
            route_async!(commands::get_config_paths_cmd(&state.config_state))
        }

        "update_diff_config" => {
            let context_lines: Option<u32> = get_opt_arg(&args, "contextLines")?;
            let include_untracked: Option<bool> = get_opt_arg(&args, "includeUntracked")?;
            let detect_renames: Option<bool> = get_opt_arg(&args, "detectRenames")?;
            route_async!(commands::update_diff_config(
                context_lines,
                include_untracked,
                detect_renames,
                &state.config_state
            ))
        }

        _ => Err(format!("Unknown config command: {}", cmd)),
    }
}

/// Check if a command is a config command
pub fn is_config_command(cmd: &str) -> bool {
    matches!(
        cmd,
        "get_config" | "set_config_project_path" | "get_config_paths_cmd" | "update_diff_config"
    )
}
