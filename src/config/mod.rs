// Layered configuration system

pub mod loader;
pub mod merger;

pub use loader::{
    validate_config, ConfigLoader, DiffConfig, DiffdeskConfig, ServerConfig, TreeConfig,
    CONFIG_DIR_NAME,
};
pub use merger::{
    ConfigMerger, PartialConfig, PartialDiffConfig, PartialServerConfig, PartialTreeConfig,
};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Load and merge configuration from all sources
/// Priority: CLI -> Project -> Global -> Defaults
pub fn load_merged_config(
    project_path: Option<&Path>,
    cli_overrides: Option<PartialConfig>,
) -> Result<DiffdeskConfig> {
    let loader = match project_path {
        Some(path) => ConfigLoader::new().with_project_path(path),
        None => ConfigLoader::new(),
    };

    let global = loader.load_global()?;
    let project = loader.load_project()?;

    let config = ConfigMerger::new()
        .with_global(global)
        .with_project(project)
        .with_cli(cli_overrides)
        .merge();

    validate_config(&config)?;
    Ok(config)
}

/// Get config file paths for debugging
pub fn get_config_paths(project_path: Option<&Path>) -> (Option<PathBuf>, Option<PathBuf>) {
    let loader = match project_path {
        Some(path) => ConfigLoader::new().with_project_path(path),
        None => ConfigLoader::new(),
    };

    (
        loader.global_config_path().map(|p| p.to_path_buf()),
        loader.project_config_path().map(|p| p.to_path_buf()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_merged_config_with_project() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".diffdesk");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "[diff]\ncontextLines = 5\n").unwrap();

        let config = load_merged_config(Some(temp_dir.path()), None).unwrap();
        assert_eq!(config.diff.context_lines, 5);
    }

    #[test]
    fn test_load_merged_config_with_cli_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let cli = PartialConfig {
            server: Some(PartialServerConfig {
                bind: Some("0.0.0.0".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = load_merged_config(Some(temp_dir.path()), Some(cli)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
    }

    #[test]
    fn test_malformed_project_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".diffdesk");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "not = [valid").unwrap();

        assert!(load_merged_config(Some(temp_dir.path()), None).is_err());
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".diffdesk");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "[server]\nport = 0\n").unwrap();

        let err = load_merged_config(Some(temp_dir.path()), None).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_config_paths() {
        let temp_dir = TempDir::new().unwrap();
        let (_, project) = get_config_paths(Some(temp_dir.path()));
        assert_eq!(
            project.unwrap(),
            temp_dir.path().join(".diffdesk").join("config.toml")
        );
    }
}
