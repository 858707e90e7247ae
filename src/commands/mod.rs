// Backend command handlers shared by the HTTP routes and the CLI

pub mod config;
pub mod diff;
pub mod git;
pub mod tree;

// Re-export all commands for easy registration
pub use config::*;
pub use diff::*;
pub use git::*;
pub use tree::*;
