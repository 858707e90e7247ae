//! Hierarchical file tree
//!
//! Immutable tree values built from flat path listings and annotated in
//! successive pure passes:
//! - `builder` - paths to sorted tree, ordering rules
//! - `merge` - change status with bubbling to ancestors
//! - `mutate` - lazy expansion (splicing fetched children)
//! - `annotate` - untracked/binary marking of file nodes
//! - `types` - `FileNode`, `FileStatus`
//!
//! Every pass takes `&Arc<FileNode>` and returns a new root, sharing each
//! subtree the pass did not change. Callers may compare with `Arc::ptr_eq`
//! to detect what changed.

mod annotate;
mod builder;
mod merge;
mod mutate;
mod types;

pub use annotate::{mark_binary_files, mark_untracked_files};
pub use builder::{build_tree_from_paths, compare_names, compare_nodes, sort_tree};
pub use merge::{merge_status_into_tree, BUBBLED_DIRECTORY_STATUS};
pub use mutate::insert_children_into_tree;
pub use types::{is_path_prefix, join_path, FileNode, FileStatus, NodeType};
