use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use diffdesk_lib::commands::{self, ConfigState, GitState};
use diffdesk_lib::config::{load_merged_config, PartialConfig, PartialServerConfig};
use diffdesk_lib::server::{self, generate_auth_token, ServerAppState};
use diffdesk_lib::shutdown::{register_signal_handlers, ShutdownState};

/// diffdesk - review a git working copy from the browser
#[derive(Parser, Debug)]
#[command(name = "diffdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind the server to
    #[arg(long)]
    bind: Option<String>,

    /// Fixed auth token (or set DIFFDESK_TOKEN env var)
    /// If not provided, a random token is generated on each startup
    #[arg(long, env = "DIFFDESK_TOKEN")]
    token: Option<String>,

    /// Repository whose `.diffdesk/config.toml` is layered over the global config
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a unified diff (file or stdin) and print the FileDiff list as JSON
    ParseDiff {
        /// Diff file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print the annotated file tree of a repository as JSON
    Tree {
        /// Repository path
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Include untracked files
        #[arg(long)]
        untracked: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Command::ParseDiff { ref file }) => parse_diff_command(file.as_ref()),
        Some(Command::Tree { ref repo, untracked }) => tree_command(repo, untracked),
        None => run_server_mode(&cli),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn parse_diff_command(file: Option<&PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let files = commands::parse_diff_text(text);
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}

fn tree_command(repo: &Path, untracked: bool) -> Result<()> {
    let config = load_merged_config(Some(repo), None)?;
    let config_state = ConfigState::new(config, Some(repo.to_path_buf()), None);
    let git_state = GitState::new();

    let tree = commands::get_file_tree(
        repo.to_string_lossy().to_string(),
        Some(untracked),
        &git_state,
        &config_state,
    )
    .map_err(anyhow::Error::msg)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn run_server_mode(cli: &Cli) -> Result<()> {
    let cli_overrides = PartialConfig {
        server: Some(PartialServerConfig {
            port: cli.port,
            bind: cli.bind.clone(),
            cors_origins: None,
        }),
        ..Default::default()
    };
    let config = load_merged_config(Some(cli.repo.as_path()), Some(cli_overrides.clone()))?;
    let server_config = config.server.clone();

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    rt.block_on(async {
        let shutdown_state = ShutdownState::new();
        if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        let config_state = ConfigState::new(config, Some(cli.repo.clone()), Some(cli_overrides));
        let auth_token = cli.token.clone().unwrap_or_else(generate_auth_token);

        let state = ServerAppState::new(auth_token, GitState::new(), config_state, shutdown_state);

        server::run_server(
            server_config.port,
            &server_config.bind,
            state,
            server_config.cors_origins,
        )
        .await
        .map_err(anyhow::Error::msg)
    })
}
