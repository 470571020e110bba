//! Document Set: open files, their content and dirty state, in tab order.

use crate::kernel::error::WorkspaceError;
use crate::models::{is_within, rebase_path};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Restored from a previous session, content never fetched.
    Unloaded,
    Loading,
    Loaded,
    Failed(WorkspaceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub content: String,
    pub is_dirty: bool,
    pub load: LoadState,
    /// Bumped on every edit; save and fetch completions compare against it.
    pub revision: u64,
}

impl Document {
    fn new(path: String) -> Self {
        Self {
            path,
            content: String::new(),
            is_dirty: false,
            load: LoadState::Unloaded,
            revision: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.load, LoadState::Loaded)
    }
}

#[derive(Debug, Default)]
pub struct DocumentSet {
    docs: FxHashMap<String, Document>,
    order: Vec<String>,
    active: Option<String>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `path`, appending a tab when it is not open yet.
    pub fn open(&mut self, path: &str) -> &Document {
        if !self.docs.contains_key(path) {
            self.insert(path);
        }
        self.active = Some(path.to_string());
        &self.docs[path]
    }

    /// Appends a tab without activating it or fetching content.
    pub fn restore(&mut self, path: &str) {
        if !self.docs.contains_key(path) {
            self.insert(path);
        }
    }

    fn insert(&mut self, path: &str) {
        self.order.push(path.to_string());
        self.docs
            .insert(path.to_string(), Document::new(path.to_string()));
    }

    pub fn set_active(&mut self, path: Option<String>) {
        self.active = path.filter(|p| self.docs.contains_key(p));
    }

    /// Marks a fetch as started. Returns the revision it must match on
    /// completion, or `None` when the document is unknown or holds unsaved
    /// edits that a fetch would overwrite.
    pub fn mark_loading(&mut self, path: &str) -> Option<u64> {
        let doc = self.docs.get_mut(path).filter(|doc| !doc.is_dirty)?;
        doc.load = LoadState::Loading;
        Some(doc.revision)
    }

    /// Applies a fetch result. Discarded when the document was closed; an
    /// edit made while the fetch was pending keeps its content.
    pub fn finish_load(
        &mut self,
        path: &str,
        revision: u64,
        result: Result<String, WorkspaceError>,
    ) -> bool {
        let Some(doc) = self.docs.get_mut(path) else {
            tracing::debug!(path, "document closed before load finished");
            return false;
        };
        if doc.revision != revision {
            tracing::debug!(path, "document edited while loading, keeping edits");
            doc.load = LoadState::Loaded;
            return false;
        }
        match result {
            Ok(content) => {
                doc.content = content;
                doc.is_dirty = false;
                doc.load = LoadState::Loaded;
            }
            Err(err) => {
                doc.content.clear();
                doc.is_dirty = false;
                doc.load = LoadState::Failed(err);
            }
        }
        true
    }

    pub fn edit(&mut self, path: &str, content: String) -> Result<(), WorkspaceError> {
        let doc = self.docs.get_mut(path).ok_or_else(|| WorkspaceError::NotOpen {
            path: path.to_string(),
        })?;
        doc.content = content;
        doc.is_dirty = true;
        doc.revision += 1;
        Ok(())
    }

    /// Clears the dirty flag if nothing was edited since `revision` was read.
    pub fn finish_save(&mut self, path: &str, revision: u64) -> bool {
        match self.docs.get_mut(path) {
            Some(doc) if doc.revision == revision => {
                doc.is_dirty = false;
                true
            }
            _ => false,
        }
    }

    /// Removes a tab regardless of its dirty state. When it was active, the
    /// tab to its left becomes active, else the next one.
    pub fn close(&mut self, path: &str) -> bool {
        let Some(index) = self.order.iter().position(|p| p == path) else {
            return false;
        };
        self.order.remove(index);
        self.docs.remove(path);

        if self.active.as_deref() == Some(path) {
            let next = if index > 0 {
                self.order.get(index - 1)
            } else {
                self.order.first()
            };
            self.active = next.cloned();
        }
        true
    }

    /// Closes every document at or under `path`.
    pub fn close_within(&mut self, path: &str) -> Vec<String> {
        let closing: Vec<String> = self
            .order
            .iter()
            .filter(|p| is_within(p, path))
            .cloned()
            .collect();
        for p in &closing {
            self.close(p);
        }
        closing
    }

    /// Re-keys documents at or under `from` to the same place under `to`,
    /// keeping tab order, content and dirty state. Tabs already sitting at or
    /// under `to` whose files are gone are closed first.
    pub fn rename_within(&mut self, from: &str, to: &str) -> usize {
        let displaced: Vec<String> = self
            .order
            .iter()
            .filter(|p| is_within(p, to) && !is_within(p, from))
            .cloned()
            .collect();
        for p in &displaced {
            tracing::debug!(path = %p, "closing tab replaced by rename");
            self.close(p);
        }

        let mut moved = 0;
        for entry in self.order.iter_mut() {
            let Some(new_path) = rebase_path(entry, from, to) else {
                continue;
            };
            if let Some(mut doc) = self.docs.remove(entry.as_str()) {
                doc.path = new_path.clone();
                self.docs.insert(new_path.clone(), doc);
            }
            *entry = new_path;
            moved += 1;
        }
        if let Some(active) = &self.active {
            if let Some(new_path) = rebase_path(active, from, to) {
                self.active = Some(new_path);
            }
        }
        moved
    }

    pub fn clear(&mut self) {
        self.docs.clear();
        self.order.clear();
        self.active = None;
    }

    pub fn get(&self, path: &str) -> Option<&Document> {
        self.docs.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.docs.contains_key(path)
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/documents.rs"]
mod tests;
