// Configuration file loading

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::merger::PartialConfig;
use crate::git::DiffTextOptions;

/// Directory name used for both the global and the per-repository config
pub const CONFIG_DIR_NAME: &str = "diffdesk";

/// Diffdesk configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiffdeskConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Diff generation settings
    #[serde(default)]
    pub diff: DiffConfig,
    /// File tree settings
    #[serde(default)]
    pub tree: TreeConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allowed CORS origins; empty allows any origin
    #[serde(rename = "corsOrigins", alias = "cors_origins", default)]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 { 3430 }
fn default_bind() -> String { "127.0.0.1".to_string() }
fn default_true() -> bool { true }
fn default_context_lines() -> u32 { 3 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            cors_origins: Vec::new(),
        }
    }
}

/// Diff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Unchanged lines shown around each change
    #[serde(rename = "contextLines", alias = "context_lines", default = "default_context_lines")]
    pub context_lines: u32,
    /// Append untracked files to working-copy diffs
    #[serde(rename = "includeUntracked", alias = "include_untracked", default)]
    pub include_untracked: bool,
    #[serde(rename = "detectRenames", alias = "detect_renames", default = "default_true")]
    pub detect_renames: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            include_untracked: false,
            detect_renames: default_true(),
        }
    }
}

impl DiffConfig {
    pub fn text_options(&self) -> DiffTextOptions {
        DiffTextOptions {
            context_lines: self.context_lines,
            detect_renames: self.detect_renames,
        }
    }
}

/// File tree configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Show untracked files in the tree
    #[serde(rename = "includeUntracked", alias = "include_untracked", default = "default_true")]
    pub include_untracked: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            include_untracked: default_true(),
        }
    }
}

/// Config loader
pub struct ConfigLoader {
    /// Global config path
    global_path: Option<PathBuf>,
    /// Project config path
    project_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            global_path: Self::get_global_config_path(),
            project_path: None,
        }
    }

    /// Set the repository whose `.diffdesk/config.toml` overrides the global file
    pub fn with_project_path(mut self, path: &Path) -> Self {
        self.project_path = Some(
            path.join(format!(".{}", CONFIG_DIR_NAME))
                .join("config.toml"),
        );
        self
    }

    fn get_global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load global config layer
    pub fn load_global(&self) -> Result<Option<PartialConfig>> {
        match self.global_path {
            Some(ref path) => self.load_from_path(path),
            None => Ok(None),
        }
    }

    /// Load project config layer
    pub fn load_project(&self) -> Result<Option<PartialConfig>> {
        match self.project_path {
            Some(ref path) => self.load_from_path(path),
            None => Ok(None),
        }
    }

    /// Load one config layer from a specific path; a missing file is not an error.
    ///
    /// Keys absent from the file stay `None` so lower layers show through.
    pub fn load_from_path(&self, path: &Path) -> Result<Option<PartialConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: PartialConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        if config.server.as_ref().and_then(|s| s.port) == Some(0) {
            return Err(anyhow!(
                "Invalid config file '{}': server.port must be greater than 0",
                path.display()
            ));
        }

        log::debug!("[ConfigLoader] Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Get the global config path
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the project config path
    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    /// Save config to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &Path, config: &DiffdeskConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    anyhow!("Failed to create config directory '{}': {}", parent.display(), e)
                })?;
            }
        }

        validate_config(config)?;

        let contents = toml::to_string_pretty(config)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;
        fs::write(path, contents)
            .map_err(|e| anyhow!("Failed to write config file '{}': {}", path.display(), e))?;

        log::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate config values
pub fn validate_config(config: &DiffdeskConfig) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        return Err(anyhow!("server.bind cannot be empty"));
    }
    if config.server.port == 0 {
        return Err(anyhow!("server.port must be greater than 0"));
    }
    Ok(())
}
