// Lazy-loading support: splice a fetched listing into a partially loaded tree

use std::sync::Arc;

use super::types::{is_path_prefix, FileNode};

/// Replace the children of the directory at `target_dir_path`.
///
/// Only directories on the path to the target are descended into, and only
/// those nodes are rebuilt; every other subtree is returned by the same `Arc`.
/// A trailing `/` on the target is ignored. When no directory has that path
/// the input tree itself is returned.
pub fn insert_children_into_tree(
    tree: &Arc<FileNode>,
    target_dir_path: &str,
    new_children: Vec<Arc<FileNode>>,
) -> Arc<FileNode> {
    let target = target_dir_path.trim_end_matches('/');

    match replace_children(tree, target, new_children) {
        Some(updated) => updated,
        None => {
            log::debug!(
                "[FileTree] Directory '{}' not found, tree left unchanged",
                target
            );
            Arc::clone(tree)
        }
    }
}

/// `None` when the target is not in this subtree
fn replace_children(
    node: &Arc<FileNode>,
    target: &str,
    new_children: Vec<Arc<FileNode>>,
) -> Option<Arc<FileNode>> {
    if !node.is_dir() {
        return None;
    }
    if node.path == target {
        return Some(Arc::new(node.with_children(Some(new_children))));
    }

    let children = node.children.as_ref()?;
    let (idx, replaced) = children.iter().enumerate().find_map(|(idx, child)| {
        if !child.is_dir() || !(child.path == target || is_path_prefix(&child.path, target)) {
            return None;
        }
        replace_children(child, target, new_children.clone()).map(|r| (idx, r))
    })?;

    let mut updated = children.clone();
    updated[idx] = replaced;
    Some(Arc::new(node.with_children(Some(updated))))
}
