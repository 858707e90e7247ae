//! Server application state shared across handlers

use crate::commands::config::ConfigState;
use crate::commands::git::GitState;
use crate::shutdown::ShutdownState;
use std::sync::Arc;

/// Shared state for the server
#[derive(Clone)]
pub struct ServerAppState {
    /// Authentication token for this session
    pub auth_token: String,

    /// Opened repositories
    pub git_state: Arc<GitState>,

    /// Configuration state
    pub config_state: Arc<ConfigState>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    pub fn new(
        auth_token: String,
        git_state: GitState,
        config_state: ConfigState,
        shutdown_state: ShutdownState,
    ) -> Self {
        Self {
            auth_token,
            git_state: Arc::new(git_state),
            config_state: Arc::new(config_state),
            shutdown_state,
        }
    }
}
