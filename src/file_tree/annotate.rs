// File-level annotation passes (untracked status, binary flag)

use std::collections::HashSet;
use std::sync::Arc;

use super::types::FileNode;
use crate::diff::{is_binary_extension, ChangeStatus};

/// Apply `update` to every file node of the loaded tree.
///
/// `update` returns `None` when a file needs no change; unchanged files and
/// directories with no changed descendant are returned by the same `Arc`.
pub(crate) fn map_files<F>(node: &Arc<FileNode>, update: &F) -> Arc<FileNode>
where
    F: Fn(&FileNode) -> Option<FileNode>,
{
    if node.is_file() {
        return match update(node) {
            Some(updated) => Arc::new(updated),
            None => Arc::clone(node),
        };
    }

    let Some(children) = node.children.as_ref() else {
        return Arc::clone(node);
    };

    let mapped: Vec<Arc<FileNode>> = children.iter().map(|c| map_files(c, update)).collect();
    if mapped.iter().zip(children).all(|(new, old)| Arc::ptr_eq(new, old)) {
        Arc::clone(node)
    } else {
        Arc::new(node.with_children(Some(mapped)))
    }
}

/// Set `status = untracked` on file nodes whose path is in `paths`
pub fn mark_untracked_files(tree: &Arc<FileNode>, paths: &HashSet<String>) -> Arc<FileNode> {
    if paths.is_empty() {
        return Arc::clone(tree);
    }

    map_files(tree, &|file: &FileNode| {
        if file.status == Some(ChangeStatus::Untracked) || !paths.contains(&file.path) {
            return None;
        }
        Some(file.clone().with_status(Some(ChangeStatus::Untracked)))
    })
}

/// Set `is_binary = true` on file nodes with a known binary extension.
/// Directories are never marked.
pub fn mark_binary_files(tree: &Arc<FileNode>) -> Arc<FileNode> {
    map_files(tree, &|file: &FileNode| {
        if file.is_binary == Some(true) || !is_binary_extension(&file.name) {
            return None;
        }
        let mut updated = file.clone();
        updated.is_binary = Some(true);
        Some(updated)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_tree::build_tree_from_paths;

    fn find(tree: &Arc<FileNode>, path: &str) -> Arc<FileNode> {
        tree.find(path).unwrap()
    }

    #[test]
    fn test_mark_untracked() {
        let tree = build_tree_from_paths(["src/new.rs", "src/old.rs", "lib/x.rs"]);
        let paths: HashSet<String> = ["src/new.rs".to_string()].into_iter().collect();
        let marked = mark_untracked_files(&tree, &paths);

        assert_eq!(find(&marked, "src/new.rs").status, Some(ChangeStatus::Untracked));
        assert_eq!(find(&marked, "src/old.rs").status, None);
        assert_eq!(find(&marked, "src").status, None);
        assert!(Arc::ptr_eq(&find(&marked, "lib"), &find(&tree, "lib")));
        assert!(Arc::ptr_eq(&find(&marked, "src/old.rs"), &find(&tree, "src/old.rs")));
    }

    #[test]
    fn test_mark_untracked_empty_set_fast_path() {
        let tree = build_tree_from_paths(["a", "b/c"]);
        let marked = mark_untracked_files(&tree, &HashSet::new());
        assert!(Arc::ptr_eq(&tree, &marked));
    }

    #[test]
    fn test_mark_untracked_ignores_directories() {
        let tree = build_tree_from_paths(["dir/file"]);
        let paths: HashSet<String> = ["dir".to_string()].into_iter().collect();
        let marked = mark_untracked_files(&tree, &paths);
        assert!(Arc::ptr_eq(&tree, &marked));
    }

    #[test]
    fn test_mark_binary() {
        let tree = build_tree_from_paths(["assets/logo.PNG", "assets/style.css", "bin.zip"]);
        let marked = mark_binary_files(&tree);

        assert_eq!(find(&marked, "assets/logo.PNG").is_binary, Some(true));
        assert_eq!(find(&marked, "assets/style.css").is_binary, None);
        assert_eq!(find(&marked, "bin.zip").is_binary, Some(true));
        assert_eq!(find(&marked, "assets").is_binary, None);
        // input untouched
        assert_eq!(find(&tree, "bin.zip").is_binary, None);
    }

    #[test]
    fn test_mark_binary_never_marks_directories() {
        let tree = build_tree_from_paths(["images.png/readme.txt"]);
        let marked = mark_binary_files(&tree);
        assert!(Arc::ptr_eq(&tree, &marked));
    }

    #[test]
    fn test_mark_binary_is_idempotent() {
        let once = mark_binary_files(&build_tree_from_paths(["a.png", "b.txt"]));
        let twice = mark_binary_files(&once);
        assert!(Arc::ptr_eq(&once, &twice));
    }
}
