//! Git repository access using git2-rs
//!
//! Supplies the diff engine with its inputs. Nothing here interprets diff
//! text; it only produces it, along with path listings and status entries:
//! - `manager` - Core GitManager struct and repository opening
//! - `diff_text` - Unified diff text for working tree, index, commits, ranges
//! - `listing` - Tracked/untracked/ignored listings, lazy directory listing
//! - `status` - Status entries with staged flag and rename sources
//! - `error` - GitError

mod diff_text;
mod error;
mod listing;
mod manager;
mod status;

pub use diff_text::DiffTextOptions;
pub use error::GitError;
pub use manager::GitManager;
