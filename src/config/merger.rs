// Configuration merging with priority

use crate::config::loader::{DiffConfig, DiffdeskConfig, ServerConfig, TreeConfig};
use serde::{Deserialize, Serialize};

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialConfig {
    #[serde(default)]
    pub server: Option<PartialServerConfig>,
    #[serde(default)]
    pub diff: Option<PartialDiffConfig>,
    #[serde(default)]
    pub tree: Option<PartialTreeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialServerConfig {
    pub port: Option<u16>,
    pub bind: Option<String>,
    #[serde(rename = "corsOrigins", alias = "cors_origins")]
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialDiffConfig {
    #[serde(rename = "contextLines", alias = "context_lines")]
    pub context_lines: Option<u32>,
    #[serde(rename = "includeUntracked", alias = "include_untracked")]
    pub include_untracked: Option<bool>,
    #[serde(rename = "detectRenames", alias = "detect_renames")]
    pub detect_renames: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialTreeConfig {
    #[serde(rename = "includeUntracked", alias = "include_untracked")]
    pub include_untracked: Option<bool>,
}

/// Configuration merger
/// Priority order: CLI -> Project -> Global -> Defaults
pub struct ConfigMerger {
    defaults: DiffdeskConfig,
    global: Option<PartialConfig>,
    project: Option<PartialConfig>,
    cli: Option<PartialConfig>,
}

impl ConfigMerger {
    /// Create a new config merger with defaults
    pub fn new() -> Self {
        Self {
            defaults: DiffdeskConfig::default(),
            global: None,
            project: None,
            cli: None,
        }
    }

    pub fn with_global(mut self, config: Option<PartialConfig>) -> Self {
        self.global = config;
        self
    }

    pub fn with_project(mut self, config: Option<PartialConfig>) -> Self {
        self.project = config;
        self
    }

    pub fn with_cli(mut self, config: Option<PartialConfig>) -> Self {
        self.cli = config;
        self
    }

    /// Merge all configs with priority
    pub fn merge(&self) -> DiffdeskConfig {
        [&self.global, &self.project, &self.cli]
            .into_iter()
            .flatten()
            .fold(self.defaults.clone(), |acc, layer| {
                self.merge_partial(&acc, layer)
            })
    }

    fn merge_partial(&self, base: &DiffdeskConfig, partial: &PartialConfig) -> DiffdeskConfig {
        DiffdeskConfig {
            server: partial
                .server
                .as_ref()
                .map(|p| merge_partial_server(&base.server, p))
                .unwrap_or_else(|| base.server.clone()),
            diff: partial
                .diff
                .as_ref()
                .map(|p| merge_partial_diff(&base.diff, p))
                .unwrap_or_else(|| base.diff.clone()),
            tree: partial
                .tree
                .as_ref()
                .map(|p| merge_partial_tree(&base.tree, p))
                .unwrap_or_else(|| base.tree.clone()),
        }
    }
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_partial_server(base: &ServerConfig, p: &PartialServerConfig) -> ServerConfig {
    ServerConfig {
        port: p.port.unwrap_or(base.port),
        bind: p.bind.clone().unwrap_or_else(|| base.bind.clone()),
        cors_origins: p
            .cors_origins
            .clone()
            .unwrap_or_else(|| base.cors_origins.clone()),
    }
}

fn merge_partial_diff(base: &DiffConfig, p: &PartialDiffConfig) -> DiffConfig {
    DiffConfig {
        context_lines: p.context_lines.unwrap_or(base.context_lines),
        include_untracked: p.include_untracked.unwrap_or(base.include_untracked),
        detect_renames: p.detect_renames.unwrap_or(base.detect_renames),
    }
}

fn merge_partial_tree(base: &TreeConfig, p: &PartialTreeConfig) -> TreeConfig {
    TreeConfig {
        include_untracked: p.include_untracked.unwrap_or(base.include_untracked),
    }
}
