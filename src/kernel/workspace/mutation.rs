//! Mutation pipeline: save, create, rename and delete.
//!
//! The filesystem call always runs first. Tree, documents and selection are
//! only touched after it succeeded, and only if the root did not change while
//! it was pending. Every successful mutation ends with a full reload.

use super::{Workspace, WorkspaceState};
use crate::kernel::error::{FsOp, WorkspaceError};
use crate::models::{
    file_name, is_strictly_within, is_within, join_path, normalize_path, parent_path, NodeKind,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

fn validate_name(name: &str) -> Result<(), WorkspaceError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(WorkspaceError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl WorkspaceState {
    /// Kind of `path` in the current snapshot; absent paths are stale.
    fn require_node(&self, path: &str) -> Result<NodeKind, WorkspaceError> {
        if self.root.is_none() {
            return Err(WorkspaceError::NoRoot);
        }
        self.tree
            .node(path)
            .map(|node| node.kind())
            .ok_or_else(|| WorkspaceError::StaleReference {
                path: path.to_string(),
            })
    }

    fn require_not_root(&self, path: &str) -> Result<(), WorkspaceError> {
        if self.root.as_deref() == Some(path) {
            return Err(WorkspaceError::InvalidRoot {
                path: path.to_string(),
                reason: "the workspace root cannot be renamed or deleted".to_string(),
            });
        }
        Ok(())
    }

    /// `to` must be a fresh name inside the root, in a directory present in
    /// the snapshot, and not inside `from` itself.
    fn require_destination(&self, from: &str, to: &str) -> Result<(), WorkspaceError> {
        let invalid = || WorkspaceError::InvalidName {
            name: to.to_string(),
        };
        let inside_root = self
            .root
            .as_deref()
            .is_some_and(|root| is_strictly_within(to, root));
        if !inside_root || is_within(to, from) {
            return Err(invalid());
        }
        validate_name(file_name(to)).map_err(|_| invalid())?;

        let parent = parent_path(to).ok_or_else(invalid)?;
        if !self.require_node(parent)?.is_dir() {
            return Err(WorkspaceError::StaleReference {
                path: parent.to_string(),
            });
        }
        Ok(())
    }
}

impl Workspace {
    /// Writes the document's current content. The dirty flag is cleared only
    /// if no edit landed while the write was pending.
    pub async fn save(&self, path: &str) -> Result<(), WorkspaceError> {
        let path = normalize_path(path);
        let (content, revision, epoch) = {
            let st = self.lock();
            let doc = st
                .documents
                .get(&path)
                .ok_or_else(|| WorkspaceError::NotOpen { path: path.clone() })?;
            if !doc.is_dirty && !doc.is_loaded() {
                tracing::debug!(path = %path, "nothing to save for unloaded document");
                return Ok(());
            }
            (doc.content.clone(), doc.revision, st.epoch)
        };

        self.fs
            .write_file(&path, &content)
            .await
            .map_err(|e| WorkspaceError::io(FsOp::WriteFile, &path, e))?;

        let mut st = self.lock();
        if st.epoch == epoch && !st.documents.finish_save(&path, revision) {
            tracing::debug!(path = %path, "edited during save, staying dirty");
        }
        tracing::info!(path = %path, bytes = content.len(), "saved");
        Ok(())
    }

    /// Creates `name` under `parent` and returns the new path. The parent is
    /// expanded so the entry is visible after the reload.
    pub async fn create(
        &self,
        parent: &str,
        name: &str,
        kind: EntryKind,
    ) -> Result<String, WorkspaceError> {
        validate_name(name)?;
        let parent = normalize_path(parent);
        let epoch = {
            let st = self.lock();
            if !st.require_node(&parent)?.is_dir() {
                return Err(WorkspaceError::StaleReference { path: parent });
            }
            st.epoch
        };
        let path = join_path(&parent, name);

        let created = match kind {
            EntryKind::File => self.fs.create_file(&path).await,
            EntryKind::Directory => self.fs.create_dir(&path).await,
        };
        created.map_err(|e| {
            let op = match kind {
                EntryKind::File => FsOp::CreateFile,
                EntryKind::Directory => FsOp::CreateDirectory,
            };
            WorkspaceError::io(op, &path, e)
        })?;
        tracing::info!(path = %path, ?kind, "created");

        {
            let mut st = self.lock();
            if st.epoch != epoch {
                return Ok(path);
            }
            st.tree.expand(&parent);
        }
        self.reload().await?;
        Ok(path)
    }

    /// Renames an entry and moves every open document, the selection and
    /// expanded directories at or under it to the new location.
    pub async fn rename(&self, from: &str, to: &str) -> Result<(), WorkspaceError> {
        let from = normalize_path(from);
        let to = normalize_path(to);
        let epoch = {
            let st = self.lock();
            st.require_node(&from)?;
            st.require_not_root(&from)?;
            st.require_destination(&from, &to)?;
            st.epoch
        };

        self.fs
            .rename(&from, &to)
            .await
            .map_err(|e| WorkspaceError::io_rename(&from, &to, e))?;

        let session = {
            let mut st = self.lock();
            if st.epoch != epoch {
                return Ok(());
            }
            let moved = st.documents.rename_within(&from, &to);
            st.tree.rename_paths(&from, &to);
            tracing::info!(from = %from, to = %to, moved, "renamed");
            st.session()
        };
        self.persist_session(&session);
        self.reload().await.map(|_| ())
    }

    /// Deletes an entry (recursively for directories) and closes every open
    /// document at or under it.
    pub async fn delete(&self, path: &str) -> Result<(), WorkspaceError> {
        let path = normalize_path(path);
        let epoch = {
            let st = self.lock();
            st.require_node(&path)?;
            st.require_not_root(&path)?;
            st.epoch
        };

        self.fs
            .delete(&path)
            .await
            .map_err(|e| WorkspaceError::io(FsOp::Delete, &path, e))?;

        let session = {
            let mut st = self.lock();
            if st.epoch != epoch {
                return Ok(());
            }
            let closed = st.documents.close_within(&path);
            st.tree.remove_paths(&path);
            tracing::info!(path = %path, closed = closed.len(), "deleted");
            st.session()
        };
        self.persist_session(&session);
        self.reload().await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/mutation.rs"]
mod tests;
