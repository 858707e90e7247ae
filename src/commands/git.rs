// Repository access commands

use crate::file_tree::FileStatus;
use crate::git::{GitError, GitManager};
use crate::utils::ResultExt;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Git manager state: one opened repository per path
pub struct GitState {
    managers: Mutex<HashMap<String, GitManager>>,
}

impl GitState {
    pub fn new() -> Self {
        Self {
            managers: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_create(&self, repo_path: &str) -> Result<(), String> {
        let mut managers = self.managers.lock().with_context("Lock error")?;

        if !managers.contains_key(repo_path) {
            let manager = GitManager::new(repo_path).with_context("Failed to open repository")?;
            managers.insert(repo_path.to_string(), manager);
        }

        Ok(())
    }

    pub fn with_manager<F, R>(&self, repo_path: &str, f: F) -> Result<R, String>
    where
        F: FnOnce(&GitManager) -> Result<R, GitError>,
    {
        self.get_or_create(repo_path)?;
        let managers = self.managers.lock().with_context("Lock error")?;
        let manager = managers
            .get(repo_path)
            .ok_or_else(|| "Repository not found".to_string())?;
        f(manager).with_context("Git operation failed")
    }
}

impl Default for GitState {
    fn default() -> Self {
        Self::new()
    }
}

/// Get working copy status (staged and unstaged entries)
pub fn git_get_status(repo_path: String, state: &GitState) -> Result<Vec<FileStatus>, String> {
    state.with_manager(&repo_path, |manager| manager.get_status())
}

/// List untracked, non-ignored files
pub fn git_list_untracked(repo_path: String, state: &GitState) -> Result<Vec<String>, String> {
    state.with_manager(&repo_path, |manager| manager.list_untracked_files())
}

/// One status per path for tree annotation; the staged entry wins over the
/// working-tree entry when a path has both.
pub fn primary_statuses(statuses: Vec<FileStatus>) -> Vec<FileStatus> {
    let mut seen = HashSet::new();
    let mut ordered = statuses;
    ordered.sort_by_key(|s| !s.staged);
    ordered
        .into_iter()
        .filter(|s| seen.insert(s.path.clone()))
        .collect()
}
