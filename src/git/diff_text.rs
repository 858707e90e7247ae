//! Unified diff text generation for GitManager
//!
//! Produces `diff --git` text in the same dialect as the git binary, which is
//! what `diff::parse_diff` consumes.

use git2::{Diff, DiffFindOptions, DiffFormat, DiffOptions, Oid};

use super::{GitError, GitManager};

/// Knobs for diff text generation
#[derive(Debug, Clone, Copy)]
pub struct DiffTextOptions {
    /// Unchanged lines shown around each change
    pub context_lines: u32,
    /// Pair deleted/added files into renames
    pub detect_renames: bool,
}

impl Default for DiffTextOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            detect_renames: true,
        }
    }
}

impl GitManager {
    /// Staged and unstaged changes against HEAD (untracked files excluded)
    pub fn working_diff_text(&self, opts: DiffTextOptions) -> Result<String, GitError> {
        let head_tree = self.head_tree()?;
        let mut diff = self
            .repo
            .diff_tree_to_workdir_with_index(head_tree.as_ref(), Some(&mut diff_options(opts)))?;
        finish_diff(&mut diff, opts)
    }

    /// Index against HEAD
    pub fn staged_diff_text(&self, opts: DiffTextOptions) -> Result<String, GitError> {
        let head_tree = self.head_tree()?;
        let mut diff =
            self.repo
                .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut diff_options(opts)))?;
        finish_diff(&mut diff, opts)
    }

    /// Working tree against the index
    pub fn unstaged_diff_text(&self, opts: DiffTextOptions) -> Result<String, GitError> {
        let mut diff = self
            .repo
            .diff_index_to_workdir(None, Some(&mut diff_options(opts)))?;
        finish_diff(&mut diff, opts)
    }

    /// A commit against its first parent (root commits against the empty tree)
    pub fn commit_diff_text(&self, commit_id: &str, opts: DiffTextOptions) -> Result<String, GitError> {
        let commit = match Oid::from_str(commit_id) {
            Ok(oid) => self.repo.find_commit(oid)?,
            Err(_) => self.repo.revparse_single(commit_id)?.peel_to_commit()?,
        };
        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        let mut diff = self.repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&tree),
            Some(&mut diff_options(opts)),
        )?;
        finish_diff(&mut diff, opts)
    }

    /// Between two revisions (anything `git rev-parse` accepts)
    pub fn range_diff_text(
        &self,
        from: &str,
        to: &str,
        opts: DiffTextOptions,
    ) -> Result<String, GitError> {
        let from_tree = self.repo.revparse_single(from)?.peel_to_tree()?;
        let to_tree = self.repo.revparse_single(to)?.peel_to_tree()?;

        let mut diff = self.repo.diff_tree_to_tree(
            Some(&from_tree),
            Some(&to_tree),
            Some(&mut diff_options(opts)),
        )?;
        finish_diff(&mut diff, opts)
    }
}

fn diff_options(opts: DiffTextOptions) -> DiffOptions {
    let mut diff_opts = DiffOptions::new();
    diff_opts
        .context_lines(opts.context_lines)
        .include_untracked(false)
        .ignore_submodules(true);
    diff_opts
}

fn finish_diff(diff: &mut Diff<'_>, opts: DiffTextOptions) -> Result<String, GitError> {
    if opts.detect_renames {
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;
    }
    diff_to_text(diff)
}

/// Render a diff as patch text.
///
/// git2 hands out body lines without their `+`/`-`/space marker, so the
/// origin character is written back in front of them.
fn diff_to_text(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut out = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            out.push(line.origin());
        }
        out.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;
    log::debug!("[GitManager] Rendered {} byte(s) of diff text", out.len());
    Ok(out)
}
