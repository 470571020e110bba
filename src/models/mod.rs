//! 数据模型层

pub mod file_tree;

pub use file_tree::{
    compare_nodes, file_name, flatten_for_view, is_strictly_within, is_within, join_path,
    normalize_path, parent_path, rebase_path, sorted_children, FileTreeRow, NodeKind, TreeError,
    TreeNode,
};
