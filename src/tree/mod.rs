//! Project knowledge map: flat upload paths to a collapsible tree

mod build;
mod render;

pub use build::{build_tree, FileTree, NodeKind, TreeNode};
pub use render::{compare_nodes, render_rows, sorted_children, Expansion, RowAction, TreeRow};
