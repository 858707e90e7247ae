// Tree construction from flat path listings, and the directory ordering pass

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use super::types::{join_path, FileNode, NodeType};

/// Directory under construction. Entries are only ever appended; the draft is
/// turned into immutable nodes once every path has been inserted.
#[derive(Default)]
struct DraftDir {
    entries: Vec<DraftEntry>,
    by_name: HashMap<String, usize>,
}

enum DraftEntry {
    File(String),
    Dir(String, DraftDir),
}

impl DraftDir {
    /// Insert the remaining `segments` of one path below this directory.
    ///
    /// The first insertion of a name decides whether it is a file or a
    /// directory; later paths that disagree are dropped.
    fn insert(&mut self, segments: &[&str], full_path: &str) {
        let Some((name, rest)) = segments.split_first() else {
            return;
        };

        match self.by_name.get(*name).copied() {
            Some(idx) => match (&mut self.entries[idx], rest.is_empty()) {
                (DraftEntry::Dir(_, dir), false) => dir.insert(rest, full_path),
                (DraftEntry::Dir(..), true) | (DraftEntry::File(_), true) => {}
                (DraftEntry::File(_), false) => {
                    log::debug!(
                        "[FileTree] Ignoring {}: '{}' is already a file",
                        full_path,
                        name
                    );
                }
            },
            None => {
                let entry = if rest.is_empty() {
                    DraftEntry::File(name.to_string())
                } else {
                    let mut dir = DraftDir::default();
                    dir.insert(rest, full_path);
                    DraftEntry::Dir(name.to_string(), dir)
                };
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn freeze(self, path: &str) -> Vec<Arc<FileNode>> {
        self.entries
            .into_iter()
            .map(|entry| match entry {
                DraftEntry::File(name) => {
                    let child_path = join_path(path, &name);
                    Arc::new(FileNode::file(name, child_path))
                }
                DraftEntry::Dir(name, dir) => {
                    let child_path = join_path(path, &name);
                    let children = dir.freeze(&child_path);
                    Arc::new(FileNode::directory(name, child_path, Some(children)))
                }
            })
            .collect()
    }
}

/// Build a sorted tree from slash-delimited relative paths.
///
/// Empty segments (leading, trailing or doubled slashes) are ignored and
/// duplicate paths collapse into one node. Every directory in the result is
/// loaded (`children` is `Some`).
pub fn build_tree_from_paths<I, S>(paths: I) -> Arc<FileNode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = DraftDir::default();
    let mut count = 0usize;

    for path in paths {
        let path = path.as_ref();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }
        root.insert(&segments, path);
        count += 1;
    }

    log::debug!("[FileTree] Built tree from {} path(s)", count);
    let unsorted = Arc::new(FileNode::root(root.freeze("")));
    sort_tree(&unsorted)
}

/// Name comparison approximating locale-aware collation: case-insensitive
/// first, then lowercase before uppercase at the first differing character.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| {
        for (x, y) in a.chars().zip(b.chars()) {
            if x != y {
                let rank = |c: char| if c.is_uppercase() { 1 } else { 0 };
                return rank(x).cmp(&rank(y)).then(x.cmp(&y));
            }
        }
        a.len().cmp(&b.len())
    })
}

/// Directories before files, then by name
pub fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    let kind = |n: &FileNode| match n.node_type {
        NodeType::Directory => 0,
        NodeType::File => 1,
    };
    kind(a)
        .cmp(&kind(b))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Sort every loaded directory's children, recursively.
///
/// Pure: returns a new tree and leaves the input untouched. Subtrees that are
/// already in order come back as the same `Arc`.
pub fn sort_tree(node: &Arc<FileNode>) -> Arc<FileNode> {
    let Some(children) = node.children.as_ref() else {
        return Arc::clone(node);
    };

    let mut sorted: Vec<Arc<FileNode>> = children.iter().map(sort_tree).collect();
    sorted.sort_by(|a, b| compare_nodes(a, b));

    let unchanged = sorted.len() == children.len()
        && sorted
            .iter()
            .zip(children.iter())
            .all(|(new, old)| Arc::ptr_eq(new, old));

    if unchanged {
        Arc::clone(node)
    } else {
        Arc::new(node.with_children(Some(sorted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(node: &FileNode) -> Vec<&str> {
        node.children
            .as_ref()
            .map(|c| c.iter().map(|n| n.name.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_directories_before_files() {
        let tree = build_tree_from_paths(["src/main.ts", "src/lib.ts", "README.md"]);
        assert_eq!(tree.path, "");
        assert_eq!(tree.name, "");
        assert_eq!(names(&tree), vec!["src", "README.md"]);

        let src = &tree.children.as_ref().unwrap()[0];
        assert!(src.is_dir());
        assert_eq!(src.path, "src");
        assert_eq!(names(src), vec!["lib.ts", "main.ts"]);
        assert_eq!(src.children.as_ref().unwrap()[0].path, "src/lib.ts");

        let readme = &tree.children.as_ref().unwrap()[1];
        assert!(readme.is_file());
        assert!(readme.children.is_none());
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let tree = build_tree_from_paths(["/a//b.txt/", "", "///"]);
        assert_eq!(names(&tree), vec!["a"]);
        let a = &tree.children.as_ref().unwrap()[0];
        assert_eq!(a.children.as_ref().unwrap()[0].path, "a/b.txt");
    }

    #[test]
    fn test_empty_input_gives_loaded_empty_root() {
        let tree = build_tree_from_paths(Vec::<String>::new());
        assert_eq!(tree.children, Some(vec![]));
    }

    #[test]
    fn test_duplicate_paths_collapse() {
        let tree = build_tree_from_paths(["a/b", "a/b", "a/c"]);
        let a = &tree.children.as_ref().unwrap()[0];
        assert_eq!(names(a), vec!["b", "c"]);
    }

    #[test]
    fn test_first_write_wins_file_then_dir() {
        let tree = build_tree_from_paths(["x", "x/y"]);
        let x = &tree.children.as_ref().unwrap()[0];
        assert!(x.is_file());
        assert_eq!(tree.file_count(), 1);
    }

    #[test]
    fn test_first_write_wins_dir_then_file() {
        let tree = build_tree_from_paths(["x/y", "x"]);
        let x = &tree.children.as_ref().unwrap()[0];
        assert!(x.is_dir());
        assert_eq!(names(x), vec!["y"]);
    }

    #[test]
    fn test_case_insensitive_order() {
        let tree = build_tree_from_paths(["b.txt", "A.txt", "a.txt", "C.txt"]);
        assert_eq!(names(&tree), vec!["a.txt", "A.txt", "b.txt", "C.txt"]);
    }

    #[test]
    fn test_nested_directories_sorted() {
        let tree = build_tree_from_paths(["z/file", "z/sub/inner", "a/file"]);
        assert_eq!(names(&tree), vec!["a", "z"]);
        let z = &tree.children.as_ref().unwrap()[1];
        assert_eq!(names(z), vec!["sub", "file"]);
    }

    #[test]
    fn test_sort_is_idempotent_and_shares_structure() {
        let tree = build_tree_from_paths(["b/2", "b/1", "a", "c/d/e"]);
        let again = sort_tree(&tree);
        assert!(Arc::ptr_eq(&tree, &again));
        assert_eq!(*tree, *again);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let unsorted = Arc::new(FileNode::root(vec![
            Arc::new(FileNode::file("b", "b")),
            Arc::new(FileNode::file("a", "a")),
        ]));
        let sorted = sort_tree(&unsorted);
        assert_eq!(names(&unsorted), vec!["b", "a"]);
        assert_eq!(names(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("abc", "abc"), Ordering::Equal);
        assert_eq!(compare_names("ab", "abc"), Ordering::Less);
    }
}
