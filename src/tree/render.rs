use super::build::{FileTree, TreeNode};
use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Which folders the user has collapsed. Folders start expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    collapsed: HashSet<String>,
}

impl Expansion {
    pub fn is_expanded(&self, path: &str) -> bool {
        !self.collapsed.contains(path)
    }

    /// Flip a folder; returns the new expanded state
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.collapsed.remove(path) {
            true
        } else {
            self.collapsed.insert(path.to_string());
            false
        }
    }

    pub fn clear(&mut self) {
        self.collapsed.clear();
    }
}

/// One visible line of the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub is_folder: bool,
    /// Only meaningful for folders with children
    pub expanded: bool,
    pub has_children: bool,
}

/// What activating a row should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    ToggleFolder(String),
    OpenFile { path: String, name: String },
    /// Empty folders have nothing to toggle
    None,
}

impl TreeRow {
    pub fn action(&self) -> RowAction {
        if !self.is_folder {
            RowAction::OpenFile {
                path: self.path.clone(),
                name: self.name.clone(),
            }
        } else if self.has_children {
            RowAction::ToggleFolder(self.path.clone())
        } else {
            RowAction::None
        }
    }
}

thread_local! {
    // Root-locale collation at secondary strength ignores case but not accents
    static NAME_COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!("Name collator unavailable, using plain ordering: {}", err);
                None
            }
        }
    };
}

fn compare_names(a: &str, b: &str) -> Ordering {
    NAME_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    })
}

/// Folders first, then case-insensitive locale-aware name order
pub fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.name.cmp(&b.name))
}

/// Children of one level in display order
pub fn sorted_children(level: &BTreeMap<String, TreeNode>) -> Vec<&TreeNode> {
    let mut nodes: Vec<&TreeNode> = level.values().collect();
    nodes.sort_by(|a, b| compare_nodes(a, b));
    nodes
}

/// Flatten the tree into visible rows. Collapsed folders hide their subtree.
pub fn render_rows(tree: &FileTree, expansion: &Expansion) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    push_level(&tree.roots, 0, expansion, &mut rows);
    rows
}

fn push_level(
    level: &BTreeMap<String, TreeNode>,
    depth: usize,
    expansion: &Expansion,
    rows: &mut Vec<TreeRow>,
) {
    for node in sorted_children(level) {
        let has_children = node.has_children();
        let expanded = has_children && expansion.is_expanded(&node.path);

        rows.push(TreeRow {
            name: node.name.clone(),
            path: node.path.clone(),
            depth,
            is_folder: node.is_folder(),
            expanded,
            has_children,
        });

        if expanded {
            if let Some(children) = node.children() {
                push_level(children, depth + 1, expansion, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    fn row_names(rows: &[TreeRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_folders_sort_before_files() {
        let tree = build_tree(["root/z.txt", "root/a/inner.txt", "root/m.txt"]);
        let rows = render_rows(&tree, &Expansion::default());
        let top: Vec<&str> = rows
            .iter()
            .filter(|r| r.depth == 0)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(top, vec!["a", "m.txt", "z.txt"]);
    }

    #[test]
    fn test_case_insensitive_order() {
        let tree = build_tree(["root/beta.rs", "root/Alpha.rs", "root/gamma.rs", "root/Zeta/x"]);
        let rows = render_rows(&tree, &Expansion::default());
        assert_eq!(
            row_names(&rows),
            vec!["Zeta", "x", "Alpha.rs", "beta.rs", "gamma.rs"]
        );
    }

    #[test]
    fn test_accents_and_punctuation_use_collation_order() {
        let tree = build_tree([
            "root/index.js",
            "root/index_old.js",
            "root/Readme.md",
            "root/_private.rs",
            "root/file2.rs",
            "root/file_2.rs",
            "root/éclair.rs",
            "root/zeta.rs",
        ]);
        let rows = render_rows(&tree, &Expansion::default());
        assert_eq!(
            row_names(&rows),
            vec![
                "_private.rs",
                "éclair.rs",
                "file_2.rs",
                "file2.rs",
                "index_old.js",
                "index.js",
                "Readme.md",
                "zeta.rs",
            ]
        );
    }

    #[test]
    fn test_case_only_difference_breaks_tie_on_exact_name() {
        let tree = build_tree(["root/readme.md", "root/README.md", "root/Readme.md"]);
        let rows = render_rows(&tree, &Expansion::default());
        assert_eq!(row_names(&rows), vec!["README.md", "Readme.md", "readme.md"]);
    }

    #[test]
    fn test_expanded_by_default_with_depth() {
        let tree = build_tree(["root/src/ui/mod.rs", "root/src/main.rs"]);
        let rows = render_rows(&tree, &Expansion::default());

        assert_eq!(row_names(&rows), vec!["src", "ui", "mod.rs", "main.rs"]);
        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
        assert!(rows[0].expanded);
    }

    #[test]
    fn test_collapse_hides_subtree() {
        let tree = build_tree(["root/src/ui/mod.rs", "root/src/main.rs", "root/README.md"]);
        let mut expansion = Expansion::default();

        assert!(!expansion.toggle("src"));
        let rows = render_rows(&tree, &expansion);
        assert_eq!(row_names(&rows), vec!["src", "README.md"]);
        assert!(!rows[0].expanded);

        assert!(expansion.toggle("src"));
        let rows = render_rows(&tree, &expansion);
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_row_actions() {
        let tree = build_tree(["root/src/main.rs"]);
        let rows = render_rows(&tree, &Expansion::default());

        assert_eq!(rows[0].action(), RowAction::ToggleFolder("src".to_string()));
        assert_eq!(
            rows[1].action(),
            RowAction::OpenFile {
                path: "src/main.rs".to_string(),
                name: "main.rs".to_string()
            }
        );
    }

    #[test]
    fn test_empty_tree_renders_nothing() {
        assert!(render_rows(&FileTree::default(), &Expansion::default()).is_empty());
    }
}
