// Status annotation with bubbling to ancestor directories

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{FileNode, FileStatus};
use crate::diff::ChangeStatus;

/// Status given to a directory that has no status of its own but contains
/// at least one changed descendant
pub const BUBBLED_DIRECTORY_STATUS: ChangeStatus = ChangeStatus::Modified;

/// Annotate a tree with change status.
///
/// A file takes its entry in `statuses` when there is one and otherwise keeps
/// the status it already had (e.g. from [`mark_untracked_files`]). A
/// directory takes its own entry when present, otherwise
/// [`BUBBLED_DIRECTORY_STATUS`] when any loaded descendant carries status.
/// Nodes whose annotation does not change are returned by the same `Arc`.
///
/// [`mark_untracked_files`]: super::mark_untracked_files
pub fn merge_status_into_tree(tree: &Arc<FileNode>, statuses: &[FileStatus]) -> Arc<FileNode> {
    let lookup: HashMap<&str, ChangeStatus> = statuses
        .iter()
        .map(|s| (s.path.as_str(), s.status))
        .collect();

    let (merged, carries) = merge_node(tree, &lookup);
    log::debug!(
        "[FileTree] Merged {} status entr(ies), tree has changes: {}",
        lookup.len(),
        carries
    );
    merged
}

/// Returns the annotated node and whether it (or any descendant) carries status
fn merge_node(node: &Arc<FileNode>, lookup: &HashMap<&str, ChangeStatus>) -> (Arc<FileNode>, bool) {
    let own = lookup.get(node.path.as_str()).copied();

    if node.is_file() {
        let status = own.or(node.status);
        let updated = if node.status == status {
            Arc::clone(node)
        } else {
            Arc::new(FileNode::clone(node).with_status(status))
        };
        return (updated, status.is_some());
    }

    let mut any_child_carries = false;
    let mut children_changed = false;
    let children = node.children.as_ref().map(|children| {
        children
            .iter()
            .map(|child| {
                let (merged, carries) = merge_node(child, lookup);
                any_child_carries |= carries;
                children_changed |= !Arc::ptr_eq(&merged, child);
                merged
            })
            .collect::<Vec<_>>()
    });

    let status = match own {
        Some(status) => Some(status),
        None if any_child_carries => Some(BUBBLED_DIRECTORY_STATUS),
        None => None,
    };
    let carries = own.is_some() || any_child_carries;

    if !children_changed && node.status == status {
        return (Arc::clone(node), carries);
    }

    let mut updated = node.with_children(if children_changed {
        children
    } else {
        node.children.clone()
    });
    updated.status = status;
    (Arc::new(updated), carries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_tree::{build_tree_from_paths, mark_untracked_files};
    use std::collections::HashSet;

    fn child(node: &FileNode, name: &str) -> Arc<FileNode> {
        node.children
            .as_ref()
            .and_then(|c| c.iter().find(|n| n.name == name).cloned())
            .unwrap()
    }

    #[test]
    fn test_status_bubbles_to_ancestors() {
        let tree = build_tree_from_paths(["src/utils/helper.ts", "src/main.ts"]);
        let merged = merge_status_into_tree(
            &tree,
            &[FileStatus::new("src/utils/helper.ts", ChangeStatus::Modified)],
        );

        let src = child(&merged, "src");
        let utils = child(&src, "utils");
        let helper = child(&utils, "helper.ts");
        let main = child(&src, "main.ts");

        assert_eq!(helper.status, Some(ChangeStatus::Modified));
        assert_eq!(utils.status, Some(ChangeStatus::Modified));
        assert_eq!(src.status, Some(ChangeStatus::Modified));
        assert_eq!(main.status, None);
    }

    #[test]
    fn test_bubbled_status_is_modified_regardless_of_child() {
        let tree = build_tree_from_paths(["docs/new.md"]);
        let merged =
            merge_status_into_tree(&tree, &[FileStatus::new("docs/new.md", ChangeStatus::Added)]);
        let docs = child(&merged, "docs");
        assert_eq!(docs.status, Some(ChangeStatus::Modified));
        assert_eq!(child(&docs, "new.md").status, Some(ChangeStatus::Added));
    }

    #[test]
    fn test_directory_own_status_wins() {
        let tree = build_tree_from_paths(["vendor/lib/a.c"]);
        let merged = merge_status_into_tree(
            &tree,
            &[
                FileStatus::new("vendor", ChangeStatus::Untracked),
                FileStatus::new("vendor/lib/a.c", ChangeStatus::Modified),
            ],
        );
        assert_eq!(child(&merged, "vendor").status, Some(ChangeStatus::Untracked));
    }

    #[test]
    fn test_untouched_subtrees_are_shared() {
        let tree = build_tree_from_paths(["a/x.rs", "b/y.rs"]);
        let merged = merge_status_into_tree(&tree, &[FileStatus::new("a/x.rs", ChangeStatus::Deleted)]);

        assert!(!Arc::ptr_eq(&merged, &tree));
        assert!(Arc::ptr_eq(&child(&merged, "b"), &child(&tree, "b")));
        assert!(!Arc::ptr_eq(&child(&merged, "a"), &child(&tree, "a")));
        // input untouched
        assert_eq!(child(&child(&tree, "a"), "x.rs").status, None);
    }

    #[test]
    fn test_no_statuses_returns_same_tree() {
        let tree = build_tree_from_paths(["a/x.rs"]);
        let merged = merge_status_into_tree(&tree, &[]);
        assert!(Arc::ptr_eq(&merged, &tree));
    }

    #[test]
    fn test_existing_file_status_is_kept() {
        let tree = build_tree_from_paths(["a/x.rs", "b/y.rs"]);
        let first = merge_status_into_tree(&tree, &[FileStatus::new("a/x.rs", ChangeStatus::Modified)]);
        let second = merge_status_into_tree(&first, &[]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(child(&second, "a").status, Some(ChangeStatus::Modified));

        let third =
            merge_status_into_tree(&second, &[FileStatus::new("a/x.rs", ChangeStatus::Deleted)]);
        assert_eq!(child(&child(&third, "a"), "x.rs").status, Some(ChangeStatus::Deleted));
    }

    #[test]
    fn test_untracked_mark_survives_and_bubbles() {
        let tree = build_tree_from_paths(["a/new.rs", "b.rs"]);
        let untracked: HashSet<String> = ["a/new.rs".to_string()].into_iter().collect();
        let marked = mark_untracked_files(&tree, &untracked);

        let merged = merge_status_into_tree(&marked, &[FileStatus::new("b.rs", ChangeStatus::Modified)]);

        let a = child(&merged, "a");
        assert_eq!(child(&a, "new.rs").status, Some(ChangeStatus::Untracked));
        assert_eq!(a.status, Some(BUBBLED_DIRECTORY_STATUS));
        assert_eq!(child(&merged, "b.rs").status, Some(ChangeStatus::Modified));
    }

    #[test]
    fn test_unloaded_directory_only_uses_own_match() {
        let tree = Arc::new(FileNode::root(vec![Arc::new(FileNode::unloaded_directory(
            "lazy", "lazy",
        ))]));
        let merged =
            merge_status_into_tree(&tree, &[FileStatus::new("lazy/inner.rs", ChangeStatus::Added)]);
        let lazy = child(&merged, "lazy");
        assert_eq!(lazy.status, None);
        assert!(lazy.children.is_none());
        assert!(Arc::ptr_eq(&merged, &tree));
    }
}
