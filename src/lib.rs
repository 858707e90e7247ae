#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod file_tree;
pub mod git;
pub mod server;
pub mod shutdown;
mod utils;

// Engine types used by every layer
pub use diff::{parse_diff, ChangeStatus, ChangeType, DiffChange, DiffChunk, FileDiff};
pub use file_tree::{
    build_tree_from_paths, insert_children_into_tree, merge_status_into_tree, FileNode,
    FileStatus, NodeType,
};
