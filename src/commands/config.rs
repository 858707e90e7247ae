// Configuration commands

use crate::config::{
    get_config_paths, load_merged_config, DiffConfig, DiffdeskConfig, PartialConfig, TreeConfig,
};
use crate::utils::ResultExt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

/// Application configuration state
pub struct ConfigState {
    /// Current merged configuration
    config: RwLock<DiffdeskConfig>,
    /// CLI overrides, re-applied whenever the project changes
    cli_overrides: Option<PartialConfig>,
    /// Repository whose `.diffdesk/config.toml` is layered in
    project_path: RwLock<Option<PathBuf>>,
}

impl ConfigState {
    /// Wrap an already merged configuration
    pub fn new(
        config: DiffdeskConfig,
        project_path: Option<PathBuf>,
        cli_overrides: Option<PartialConfig>,
    ) -> Self {
        log::info!(
            "[ConfigState] port={}, contextLines={}, detectRenames={}",
            config.server.port,
            config.diff.context_lines,
            config.diff.detect_renames
        );
        Self {
            config: RwLock::new(config),
            cli_overrides,
            project_path: RwLock::new(project_path),
        }
    }

    /// Set project path and reload config
    pub fn set_project_path(&self, path: Option<PathBuf>) -> Result<(), String> {
        let new_config = load_merged_config(path.as_deref(), self.cli_overrides.clone())
            .with_context("Failed to load config")?;

        let mut project_path = self
            .project_path
            .write()
            .with_context("Failed to acquire lock")?;
        *project_path = path;

        let mut config = self.config.write().with_context("Failed to acquire lock")?;
        *config = new_config;

        Ok(())
    }

    /// Get current config
    pub fn get_config(&self) -> Result<DiffdeskConfig, String> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|e| format!("Failed to acquire lock: {}", e))
    }

    pub fn diff_config(&self) -> Result<DiffConfig, String> {
        self.get_config().map(|c| c.diff)
    }

    pub fn tree_config(&self) -> Result<TreeConfig, String> {
        self.get_config().map(|c| c.tree)
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::new(DiffdeskConfig::default(), None, None)
    }
}

/// Config paths response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPaths {
    pub global_path: Option<String>,
    pub project_path: Option<String>,
    pub global_exists: bool,
    pub project_exists: bool,
}

/// Get current configuration
pub async fn get_config(config_state: &ConfigState) -> Result<DiffdeskConfig, String> {
    config_state.get_config()
}

/// Set project path and reload configuration
pub async fn set_config_project_path(
    project_path: Option<String>,
    config_state: &ConfigState,
) -> Result<DiffdeskConfig, String> {
    config_state.set_project_path(project_path.map(PathBuf::from))?;
    config_state.get_config()
}

/// Get configuration file paths
pub async fn get_config_paths_cmd(config_state: &ConfigState) -> Result<ConfigPaths, String> {
    let project_path = config_state
        .project_path
        .read()
        .with_context("Failed to acquire lock")?;

    let (global, project) = get_config_paths(project_path.as_deref());

    Ok(ConfigPaths {
        global_exists: global.as_ref().map(|p| p.exists()).unwrap_or(false),
        project_exists: project.as_ref().map(|p| p.exists()).unwrap_or(false),
        global_path: global.map(|p| p.to_string_lossy().to_string()),
        project_path: project.map(|p| p.to_string_lossy().to_string()),
    })
}

/// Update diff configuration for this session (not persisted)
pub async fn update_diff_config(
    context_lines: Option<u32>,
    include_untracked: Option<bool>,
    detect_renames: Option<bool>,
    config_state: &ConfigState,
) -> Result<DiffConfig, String> {
    let mut config = config_state
        .config
        .write()
        .with_context("Failed to acquire lock")?;

    if let Some(v) = context_lines {
        config.diff.context_lines = v;
    }
    if let Some(v) = include_untracked {
        config.diff.include_untracked = v;
    }
    if let Some(v) = detect_renames {
        config.diff.detect_renames = v;
    }

    Ok(config.diff.clone())
}
