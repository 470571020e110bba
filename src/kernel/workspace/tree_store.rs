//! TreeNode Store: the current snapshot plus expansion and selection.
//!
//! Reloads are tagged with a sequence number when issued. A result is applied
//! only while its number is still the latest one issued, so a slow response
//! can never replace a newer snapshot.

use crate::models::{
    flatten_for_view, is_within, rebase_path, FileTreeRow, TreeError, TreeNode,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reload {
    Applied(Arc<TreeNode>),
    /// A newer reload was issued (or the root changed) before this one landed.
    Stale,
}

#[derive(Debug, Default)]
pub struct TreeStore {
    tree: Option<Arc<TreeNode>>,
    expanded: FxHashSet<String>,
    selected: Option<String>,
    issued: u64,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_reload(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Swaps in `tree` if `seq` is still the latest reload. Expansion entries
    /// for directories missing from the new snapshot are dropped.
    pub fn apply(&mut self, seq: u64, tree: TreeNode) -> Result<Reload, TreeError> {
        if !self.is_latest(seq) {
            tracing::debug!(seq, latest = self.issued, "discarding stale tree");
            return Ok(Reload::Stale);
        }
        tree.validate()?;

        let dirs: FxHashSet<String> = tree.dir_paths().into_iter().collect();
        self.expanded.retain(|path| dirs.contains(path));

        let tree = Arc::new(tree);
        self.tree = Some(Arc::clone(&tree));
        tracing::debug!(seq, root = %tree.path, "tree applied");
        Ok(Reload::Applied(tree))
    }

    /// Drops the snapshot, expansion and selection. In-flight reloads become
    /// stale.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.tree = None;
        self.expanded.clear();
        self.selected = None;
    }

    pub fn tree(&self) -> Option<&Arc<TreeNode>> {
        self.tree.as_ref()
    }

    /// Missing paths are reported as absent rather than as an error.
    pub fn node(&self, path: &str) -> Option<&TreeNode> {
        self.tree.as_ref()?.find(path)
    }

    /// Flips expansion of a directory. Returns the new state, or `None` when
    /// `path` is not a directory in the current snapshot.
    pub fn toggle_expand(&mut self, path: &str) -> Option<bool> {
        if !self.node(path)?.is_dir {
            return None;
        }
        if self.expanded.remove(path) {
            Some(false)
        } else {
            self.expanded.insert(path.to_string());
            Some(true)
        }
    }

    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    pub fn expand_all(&mut self) {
        self.expanded = match &self.tree {
            Some(tree) => tree.dir_paths().into_iter().collect(),
            None => FxHashSet::default(),
        };
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expanded(&self) -> &FxHashSet<String> {
        &self.expanded
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_selected(&mut self, path: Option<String>) {
        self.selected = path;
    }

    /// Moves selection and expansion entries from under `from` to under `to`.
    pub fn rename_paths(&mut self, from: &str, to: &str) {
        if let Some(selected) = &self.selected {
            if let Some(moved) = rebase_path(selected, from, to) {
                self.selected = Some(moved);
            }
        }
        self.expanded = self
            .expanded
            .drain()
            .map(|path| rebase_path(&path, from, to).unwrap_or(path))
            .collect();
    }

    /// Forgets selection and expansion entries at or under `path`.
    pub fn remove_paths(&mut self, path: &str) {
        if self
            .selected
            .as_deref()
            .is_some_and(|selected| is_within(selected, path))
        {
            self.selected = None;
        }
        self.expanded.retain(|expanded| !is_within(expanded, path));
    }

    pub fn rows(&self) -> Vec<FileTreeRow> {
        match &self.tree {
            Some(tree) => flatten_for_view(tree, &self.expanded),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/tree_store.rs"]
mod tests;
