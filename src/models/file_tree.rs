//! 文件树数据模型
//!
//! A snapshot of one workspace directory. Every node is keyed by its
//! '/'-joined path; a snapshot is never patched, the store swaps in a new one
//! on each reload.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Dir,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("path appears more than once: {0}")]
    DuplicatePath(String),
    #[error("child {child} is not directly under {parent}")]
    MisplacedChild { parent: String, child: String },
    #[error("file has children: {0}")]
    FileWithChildren(String),
}

impl TreeNode {
    pub fn file(parent: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: join_path(parent, &name),
            name,
            is_dir: false,
            children: Vec::new(),
        }
    }

    pub fn dir(parent: &str, name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let name = name.into();
        Self {
            path: join_path(parent, &name),
            name,
            is_dir: true,
            children,
        }
    }

    /// Root node of a snapshot; the name is the last segment of `path`.
    pub fn root(path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path).to_string(),
            path,
            is_dir: true,
            children,
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.is_dir {
            NodeKind::Dir
        } else {
            NodeKind::File
        }
    }

    /// Looks a node up by path, descending only into the branch that can
    /// contain it.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut current = self;
        if !is_within(path, &current.path) {
            return None;
        }
        loop {
            if current.path == path {
                return Some(current);
            }
            current = current
                .children
                .iter()
                .find(|child| is_within(path, &child.path))?;
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Every node in the snapshot, parents before children.
    pub fn descendants(&self) -> Vec<&TreeNode> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result.push(node);
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    pub fn dir_paths(&self) -> Vec<String> {
        self.descendants()
            .into_iter()
            .filter(|node| node.is_dir)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Checks path uniqueness and that each child sits at `parent/name`.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.path.as_str()) {
                return Err(TreeError::DuplicatePath(node.path.clone()));
            }
            if !node.is_dir && !node.children.is_empty() {
                return Err(TreeError::FileWithChildren(node.path.clone()));
            }
            for child in &node.children {
                if child.path != join_path(&node.path, &child.name) {
                    return Err(TreeError::MisplacedChild {
                        parent: node.path.clone(),
                        child: child.path.clone(),
                    });
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

/// Directories first, then case-sensitive by name.
pub fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name))
}

/// Display order of a node's children. Recomputed on every call so it always
/// reflects the snapshot it is given.
pub fn sorted_children(node: &TreeNode) -> Vec<&TreeNode> {
    let mut children: Vec<&TreeNode> = node.children.iter().collect();
    children.sort_by(|a, b| compare_nodes(a, b));
    children
}

/// Canonical form of a path coming from outside the core: '/' separators and
/// no trailing separator (a bare "/" stays as is).
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let trimmed = unified.trim_end_matches('/');
    if trimmed.is_empty() && unified.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None if trimmed.is_empty() => path,
        None => trimmed,
    }
}

pub fn parent_path(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) if trimmed.len() > 1 => Some("/"),
        Some(0) | None => None,
        Some(idx) => Some(&trimmed[..idx]),
    }
}

/// `true` when `path` is `ancestor` itself or lies underneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor || is_strictly_within(path, ancestor)
}

pub fn is_strictly_within(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) if ancestor.ends_with('/') => !rest.is_empty(),
        Some(rest) => rest.starts_with('/') && rest.len() > 1,
        None => false,
    }
}

/// Maps `path` from under `from` to the same place under `to`.
pub fn rebase_path(path: &str, from: &str, to: &str) -> Option<String> {
    if path == from {
        return Some(to.to_string());
    }
    if !is_strictly_within(path, from) {
        return None;
    }
    let rest = path[from.len()..].trim_start_matches('/');
    Some(join_path(to, rest))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    pub path: String,
    pub depth: u16,
    pub name: String,
    pub is_dir: bool,
    pub is_expanded: bool,
}

/// Visible rows in display order: the root first, then the children of every
/// expanded directory.
pub fn flatten_for_view(root: &TreeNode, expanded: &FxHashSet<String>) -> Vec<FileTreeRow> {
    let mut result = Vec::new();
    let mut stack: Vec<(&TreeNode, u16)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        let is_expanded = node.is_dir && expanded.contains(&node.path);
        result.push(FileTreeRow {
            path: node.path.clone(),
            depth,
            name: node.name.clone(),
            is_dir: node.is_dir,
            is_expanded,
        });

        if is_expanded {
            for child in sorted_children(node).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    result
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
