//! Command routing modules
//!
//! This module organizes command routing into focused sub-modules by domain:
//! - diff_routes: diff parsing and repository diffs
//! - tree_routes: file tree construction, annotation and expansion
//! - git_routes: status and per-file queries
//! - config_routes: configuration commands

pub mod config_routes;
pub mod diff_routes;
pub mod git_routes;
pub mod tree_routes;

use serde_json::Value;

use super::ServerAppState;

/// Extract a required argument from JSON args
pub fn get_arg<T: serde::de::DeserializeOwned>(args: &Value, name: &str) -> Result<T, String> {
    serde_json::from_value(
        args.get(name)
            .ok_or_else(|| format!("Missing argument: {}", name))?
            .clone(),
    )
    .map_err(|e| format!("Invalid argument {}: {}", name, e))
}

/// Extract an optional argument from JSON args
pub fn get_opt_arg<T: serde::de::DeserializeOwned>(
    args: &Value,
    name: &str,
) -> Result<Option<T>, String> {
    match args.get(name) {
        Some(v) if !v.is_null() => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| format!("Invalid argument {}: {}", name, e)),
        _ => Ok(None),
    }
}

/// Routes a simple async command: awaits the handler, serializes result
#[macro_export]
macro_rules! route_async {
    ($handler:expr) => {{
        let result = $handler.await?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }};
}

/// Routes a sync command
#[macro_export]
macro_rules! route_sync {
    ($handler:expr) => {{
        let result = $handler?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }};
}

/// Routes an infallible command
#[macro_export]
macro_rules! route_value {
    ($handler:expr) => {{
        serde_json::to_value($handler).map_err(|e| e.to_string())
    }};
}

pub use route_async;
pub use route_sync;
pub use route_value;

/// Route a command to its implementation by dispatching to the appropriate sub-router
pub async fn route_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    if diff_routes::is_diff_command(cmd) {
        return diff_routes::route_diff_command(cmd, args, state).await;
    }

    if tree_routes::is_tree_command(cmd) {
        return tree_routes::route_tree_command(cmd, args, state).await;
    }

    if git_routes::is_git_command(cmd) {
        return git_routes::route_git_command(cmd, args, state).await;
    }

    if config_routes::is_config_command(cmd) {
        return config_routes::route_config_command(cmd, args, state).await;
    }

    Err(format!("Unknown command: {}", cmd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_arg() {
        let args = json!({ "repoPath": "/tmp/repo", "limit": 5 });
        let path: String = get_arg(&args, "repoPath").unwrap();
        assert_eq!(path, "/tmp/repo");

        assert_eq!(
            get_arg::<String>(&args, "missing").unwrap_err(),
            "Missing argument: missing"
        );
        assert!(get_arg::<String>(&args, "limit")
            .unwrap_err()
            .starts_with("Invalid argument limit"));
    }

    #[test]
    fn test_get_opt_arg() {
        let args = json!({ "flag": true, "empty": null });
        assert_eq!(get_opt_arg::<bool>(&args, "flag").unwrap(), Some(true));
        assert_eq!(get_opt_arg::<bool>(&args, "empty").unwrap(), None);
        assert_eq!(get_opt_arg::<bool>(&args, "absent").unwrap(), None);
        assert!(get_opt_arg::<bool>(&json!({ "flag": "yes" }), "flag").is_err());
    }
}
