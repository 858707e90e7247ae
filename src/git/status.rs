//! Status and file tracking operations for GitManager
//!
//! Contains methods for getting repository status

use git2::{Status, StatusEntry, StatusOptions};

use super::{GitError, GitManager};
use crate::diff::ChangeStatus;
use crate::file_tree::FileStatus;

impl GitManager {
    /// Get git status.
    ///
    /// A path changed both in the index and in the working tree yields two
    /// entries, one with `staged = true`. Untracked files are included with
    /// `ChangeStatus::Untracked`; ignored files are not.
    pub fn get_status(&self) -> Result<Vec<FileStatus>, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .renames_head_to_index(true)
            .renames_index_to_workdir(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        let mut result = Vec::new();
        for entry in statuses.iter() {
            let status = entry.status();

            if let Some(staged) = index_status(status) {
                result.push(staged_entry(&entry, staged));
            }
            if let Some(unstaged) = worktree_status(status) {
                result.push(unstaged_entry(&entry, unstaged));
            }
        }

        log::debug!("[GitManager] Status has {} entr(ies)", result.len());
        Ok(result)
    }
}

/// Change recorded in the index, if any
fn index_status(status: Status) -> Option<ChangeStatus> {
    if status.contains(Status::INDEX_RENAMED) {
        Some(ChangeStatus::Renamed)
    } else if status.contains(Status::INDEX_NEW) {
        Some(ChangeStatus::Added)
    } else if status.contains(Status::INDEX_DELETED) {
        Some(ChangeStatus::Deleted)
    } else if status.intersects(Status::INDEX_MODIFIED | Status::INDEX_TYPECHANGE) {
        Some(ChangeStatus::Modified)
    } else {
        None
    }
}

/// Change in the working tree relative to the index, if any
fn worktree_status(status: Status) -> Option<ChangeStatus> {
    if status.contains(Status::WT_RENAMED) {
        Some(ChangeStatus::Renamed)
    } else if status.contains(Status::WT_NEW) {
        Some(ChangeStatus::Untracked)
    } else if status.contains(Status::WT_DELETED) {
        Some(ChangeStatus::Deleted)
    } else if status.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE | Status::CONFLICTED)
    {
        Some(ChangeStatus::Modified)
    } else {
        None
    }
}

fn path_string(path: Option<&std::path::Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().replace('\\', "/"))
}

fn staged_entry(entry: &StatusEntry<'_>, status: ChangeStatus) -> FileStatus {
    let delta = entry.head_to_index();
    let path = delta
        .as_ref()
        .and_then(|d| path_string(d.new_file().path()))
        .or_else(|| entry.path().map(str::to_string))
        .unwrap_or_default();
    let old_path = match status {
        ChangeStatus::Renamed => delta.and_then(|d| path_string(d.old_file().path())),
        _ => None,
    };

    FileStatus {
        path,
        status,
        staged: true,
        old_path,
    }
}

fn unstaged_entry(entry: &StatusEntry<'_>, status: ChangeStatus) -> FileStatus {
    let delta = entry.index_to_workdir();
    let path = delta
        .as_ref()
        .and_then(|d| path_string(d.new_file().path()))
        .or_else(|| entry.path().map(str::to_string))
        .unwrap_or_default();
    let old_path = match status {
        ChangeStatus::Renamed => delta.and_then(|d| path_string(d.old_file().path())),
        _ => None,
    };

    FileStatus {
        path,
        status,
        staged: false,
        old_path,
    }
}
