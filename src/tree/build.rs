use std::collections::BTreeMap;
use tracing::debug;

/// A file or folder in the project knowledge map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Components below the chosen folder, joined with `/`
    pub path: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder(BTreeMap<String, TreeNode>),
}

impl TreeNode {
    fn file(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind: NodeKind::File,
        }
    }

    fn folder(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind: NodeKind::Folder(BTreeMap::new()),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder(_))
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match &self.kind {
            NodeKind::Folder(children) => Some(children),
            NodeKind::File => None,
        }
    }

    pub fn has_children(&self) -> bool {
        self.children().is_some_and(|c| !c.is_empty())
    }
}

/// Top level of the tree: the contents of the chosen folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    pub roots: BTreeMap<String, TreeNode>,
}

impl FileTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Look up a node by its `/`-joined path
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut level = &self.roots;
        let mut found = None;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let node = level.get(part)?;
            found = Some(node);
            match &node.kind {
                NodeKind::Folder(children) => level = children,
                NodeKind::File => level = &EMPTY,
            }
        }
        found
    }

    /// Total number of file nodes
    pub fn file_count(&self) -> usize {
        fn count(level: &BTreeMap<String, TreeNode>) -> usize {
            level
                .values()
                .map(|node| match &node.kind {
                    NodeKind::File => 1,
                    NodeKind::Folder(children) => count(children),
                })
                .sum()
        }
        count(&self.roots)
    }
}

static EMPTY: BTreeMap<String, TreeNode> = BTreeMap::new();

/// Build the nested tree from flat relative paths.
///
/// Each path starts with the chosen folder's own name, which is dropped.
/// Paths with a single component are skipped entirely.
pub fn build_tree<'a, I>(paths: I) -> FileTree
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tree = FileTree::default();

    for raw in paths {
        let parts: Vec<&str> = raw.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() <= 1 {
            continue;
        }
        insert_path(&mut tree.roots, &parts[1..], raw);
    }

    tree
}

fn insert_path(roots: &mut BTreeMap<String, TreeNode>, parts: &[&str], raw: &str) {
    let mut level = roots;

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;
        let node = level.entry(part.to_string()).or_insert_with(|| {
            let path = parts[..=i].join("/");
            if is_last {
                TreeNode::file(part, path)
            } else {
                TreeNode::folder(part, path)
            }
        });

        match &mut node.kind {
            NodeKind::Folder(children) => level = children,
            NodeKind::File => {
                if !is_last {
                    debug!(path = raw, at = part, "Path descends through a file; ignoring rest");
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(level: &BTreeMap<String, TreeNode>) -> Vec<&str> {
        level.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_nested_paths() {
        let tree = build_tree(["root/a.txt", "root/b/c.txt", "root/b/d.txt"]);

        assert_eq!(names(&tree.roots), vec!["a.txt", "b"]);

        let a = &tree.roots["a.txt"];
        assert!(!a.is_folder());
        assert_eq!(a.path, "a.txt");
        assert!(a.children().is_none());

        let b = &tree.roots["b"];
        assert!(b.is_folder());
        assert_eq!(b.path, "b");
        let children = b.children().unwrap();
        assert_eq!(names(children), vec!["c.txt", "d.txt"]);
        assert_eq!(children["c.txt"].path, "b/c.txt");
        assert_eq!(tree.file_count(), 3);
    }

    #[test]
    fn test_single_component_paths_are_skipped() {
        let tree = build_tree(["e.txt", "root/f.txt", ""]);
        assert_eq!(names(&tree.roots), vec!["f.txt"]);
    }

    #[test]
    fn test_empty_components_are_ignored() {
        let tree = build_tree(["root//src///main.rs"]);
        let src = &tree.roots["src"];
        assert_eq!(src.children().unwrap()["main.rs"].path, "src/main.rs");
    }

    #[test]
    fn test_insertion_is_idempotent() {
        let tree = build_tree(["root/src/lib.rs", "root/src/lib.rs", "root/src/ui/mod.rs"]);
        let src = tree.roots["src"].children().unwrap();
        assert_eq!(names(src), vec!["lib.rs", "ui"]);
        assert_eq!(tree.file_count(), 2);
    }

    #[test]
    fn test_path_through_file_is_ignored() {
        let tree = build_tree(["root/notes", "root/notes/today.md"]);
        let notes = &tree.roots["notes"];
        assert!(!notes.is_folder());
        assert!(tree.roots.get("today.md").is_none());
    }

    #[test]
    fn test_find_by_path() {
        let tree = build_tree(["root/a/b/c.rs", "root/x.rs"]);
        assert_eq!(tree.find("a/b/c.rs").map(|n| n.name.as_str()), Some("c.rs"));
        assert!(tree.find("a/b").unwrap().is_folder());
        assert!(tree.find("x.rs/y").is_none());
        assert!(tree.find("missing").is_none());
    }
}
