// Diff commands: repository diff text through the parser

use super::config::ConfigState;
use super::git::GitState;
use crate::diff::{detect_binary, parse_diff, ChangeStatus, FileDiff};
use crate::git::{GitError, GitManager};

/// Parse raw unified diff text supplied by the client
pub fn parse_diff_text(text: String) -> Vec<FileDiff> {
    parse_diff(&text)
}

/// Staged and unstaged changes against HEAD
pub fn get_working_diff(
    repo_path: String,
    include_untracked: Option<bool>,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Vec<FileDiff>, String> {
    let diff_config = config_state.diff_config()?;
    let include_untracked = include_untracked.unwrap_or(diff_config.include_untracked);
    let opts = diff_config.text_options();

    git_state.with_manager(&repo_path, |manager| {
        let mut files = parse_diff(&manager.working_diff_text(opts)?);
        if include_untracked {
            files.extend(untracked_records(manager)?);
        }
        fill_binary_sizes(manager, &mut files, SizeSource::WorkingCopy);
        Ok(files)
    })
}

/// Changes recorded in the index
pub fn get_staged_diff(
    repo_path: String,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Vec<FileDiff>, String> {
    let opts = config_state.diff_config()?.text_options();
    repo_diff(&repo_path, git_state, SizeSource::WorkingCopy, |manager| {
        manager.staged_diff_text(opts)
    })
}

/// Working-tree changes not yet staged
pub fn get_unstaged_diff(
    repo_path: String,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Vec<FileDiff>, String> {
    let opts = config_state.diff_config()?.text_options();
    repo_diff(&repo_path, git_state, SizeSource::WorkingCopy, |manager| {
        manager.unstaged_diff_text(opts)
    })
}

/// Changes introduced by a single commit
pub fn get_commit_diff(
    repo_path: String,
    commit_id: String,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Vec<FileDiff>, String> {
    let opts = config_state.diff_config()?.text_options();
    repo_diff(&repo_path, git_state, SizeSource::Revision(&commit_id), |manager| {
        manager.commit_diff_text(&commit_id, opts)
    })
}

/// Changes between two revisions
pub fn get_range_diff(
    repo_path: String,
    from: String,
    to: String,
    git_state: &GitState,
    config_state: &ConfigState,
) -> Result<Vec<FileDiff>, String> {
    let opts = config_state.diff_config()?.text_options();
    repo_diff(&repo_path, git_state, SizeSource::Revision(&to), |manager| {
        manager.range_diff_text(&from, &to, opts)
    })
}

/// Where the size of a binary file is read from
#[derive(Clone, Copy)]
enum SizeSource<'a> {
    WorkingCopy,
    /// The tree of a revision, for historical diffs
    Revision(&'a str),
}

fn repo_diff<F>(
    repo_path: &str,
    git_state: &GitState,
    sizes: SizeSource<'_>,
    text: F,
) -> Result<Vec<FileDiff>, String>
where
    F: FnOnce(&GitManager) -> Result<String, GitError>,
{
    git_state.with_manager(repo_path, |manager| {
        let mut files = parse_diff(&text(manager)?);
        fill_binary_sizes(manager, &mut files, sizes);
        Ok(files)
    })
}

/// Untracked files as body-less records, classified by extension and content
fn untracked_records(manager: &GitManager) -> Result<Vec<FileDiff>, GitError> {
    let paths = manager.list_untracked_files()?;
    Ok(paths
        .into_iter()
        .map(|path| {
            let sample = manager.read_sample(&path).ok();
            let mut record = FileDiff::untracked(path);
            record.is_binary = detect_binary(&record.path, sample.as_deref()).is_binary;
            record
        })
        .collect())
}

/// Binary files carry no chunks, so the client shows the file size instead
fn fill_binary_sizes(manager: &GitManager, files: &mut [FileDiff], sizes: SizeSource<'_>) {
    for file in files
        .iter_mut()
        .filter(|f| f.is_binary && f.status != ChangeStatus::Deleted)
    {
        let size = match sizes {
            SizeSource::WorkingCopy => manager.file_size(&file.path),
            SizeSource::Revision(rev) => manager.blob_size_at(rev, &file.path),
        };
        match size {
            Ok(size) => file.file_size = Some(size),
            Err(e) => log::trace!("[GitManager] No size for {}: {}", file.path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TempDir, String) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_str().unwrap().to_string();
        let repo = Repository::init(&repo_path).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = {
            let mut index = repo.index().unwrap();
            fs::write(temp_dir.path().join("test.txt"), "one\ntwo\n").unwrap();
            index.add_path(Path::new("test.txt")).unwrap();
            index.write().unwrap();
            index.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        (temp_dir, repo_path)
    }

    #[test]
    fn test_parse_diff_text_command() {
        let text = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n".to_string();
        let files = parse_diff_text(text);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].additions, 1);
    }

    #[test]
    fn test_working_diff_with_untracked() {
        let (temp_dir, repo_path) = setup_test_repo();
        fs::write(temp_dir.path().join("test.txt"), "one\nTWO\n").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "draft\n").unwrap();
        fs::write(temp_dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0, 0]).unwrap();

        let git_state = GitState::new();
        let config_state = ConfigState::default();

        let tracked_only =
            get_working_diff(repo_path.clone(), None, &git_state, &config_state).unwrap();
        assert_eq!(tracked_only.len(), 1);

        let files = get_working_diff(repo_path, Some(true), &git_state, &config_state).unwrap();
        assert_eq!(files.len(), 3);

        let logo = files.iter().find(|f| f.path == "logo.png").unwrap();
        assert_eq!(logo.status, ChangeStatus::Untracked);
        assert!(logo.is_binary);
        assert_eq!(logo.file_size, Some(6));

        let notes = files.iter().find(|f| f.path == "notes.md").unwrap();
        assert!(!notes.is_binary);
        assert!(notes.chunks.is_empty());
        assert_eq!(notes.file_size, None);
    }

    #[test]
    fn test_staged_and_commit_diff_commands() {
        let (temp_dir, repo_path) = setup_test_repo();
        let git_state = GitState::new();
        let config_state = ConfigState::default();

        assert!(get_staged_diff(repo_path.clone(), &git_state, &config_state)
            .unwrap()
            .is_empty());

        fs::write(temp_dir.path().join("test.txt"), "one\n").unwrap();
        assert_eq!(
            get_unstaged_diff(repo_path.clone(), &git_state, &config_state)
                .unwrap()
                .len(),
            1
        );

        let commit = get_commit_diff(repo_path, "HEAD".to_string(), &git_state, &config_state)
            .unwrap();
        assert_eq!(commit.len(), 1);
        assert_eq!(commit[0].status, ChangeStatus::Added);
        assert_eq!(commit[0].additions, 2);
    }

    #[test]
    fn test_bad_commit_is_error_string() {
        let (_temp_dir, repo_path) = setup_test_repo();
        let err = get_commit_diff(
            repo_path,
            "no-such-rev".to_string(),
            &GitState::new(),
            &ConfigState::default(),
        )
        .unwrap_err();
        assert!(err.starts_with("Git operation failed"));
    }

    #[test]
    fn test_commit_diff_reports_size_at_that_revision() {
        let (temp_dir, repo_path) = setup_test_repo();
        let repo = Repository::open(&repo_path).unwrap();
        fs::write(temp_dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0, 0]).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("logo.png")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parent = repo.head().unwrap().peel_to_commit().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Add logo", &tree, &[&parent])
            .unwrap();

        // the working copy moves on after the commit
        fs::write(temp_dir.path().join("logo.png"), [0u8; 40]).unwrap();

        let git_state = GitState::new();
        let config_state = ConfigState::default();

        let commit = get_commit_diff(repo_path.clone(), "HEAD".to_string(), &git_state, &config_state)
            .unwrap();
        let logo = commit.iter().find(|f| f.path == "logo.png").unwrap();
        assert!(logo.is_binary);
        assert_eq!(logo.file_size, Some(6));

        let range = get_range_diff(
            repo_path.clone(),
            "HEAD~1".to_string(),
            "HEAD".to_string(),
            &git_state,
            &config_state,
        )
        .unwrap();
        assert_eq!(range[0].file_size, Some(6));

        let working = get_working_diff(repo_path, None, &git_state, &config_state).unwrap();
        assert_eq!(working[0].file_size, Some(40));
    }
}
