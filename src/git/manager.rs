//! Core GitManager implementation
//!
//! Contains the GitManager struct and its basic operations

use git2::{Repository, Tree};
use std::path::{Component, Path, PathBuf};

use super::GitError;

/// Git manager for repository operations
pub struct GitManager {
    pub(crate) repo: Repository,
}

impl GitManager {
    /// Open the repository containing `path` (searching parent directories)
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        let repo = Repository::discover(path)?;
        log::debug!("[GitManager] Opened repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Get the repository path (the `.git` directory)
    pub fn repo_path(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Root of the working copy; bare repositories have none
    pub fn workdir(&self) -> Result<&Path, GitError> {
        self.repo
            .workdir()
            .ok_or_else(|| GitError::NotFound("repository has no working directory".to_string()))
    }

    /// Tree of HEAD, or `None` on an unborn branch
    pub(crate) fn head_tree(&self) -> Result<Option<Tree<'_>>, GitError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a repository-relative path inside the working copy.
    ///
    /// Rejects absolute paths and any `..` component.
    pub(crate) fn resolve_workdir_path(&self, relative: &str) -> Result<PathBuf, GitError> {
        let rel = Path::new(relative);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.is_empty() || escapes {
            return Err(GitError::InvalidPath(relative.to_string()));
        }
        Ok(self.workdir()?.join(rel))
    }
}
