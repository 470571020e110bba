//! 本地文件系统 Provider
//!
//! 实现 FileSystem trait，通过 tokio 操作本地文件系统

use super::super::paths::home_dir;
use crate::kernel::services::ports::file::{FileError, FileSystem, FsFuture, Result};
use crate::kernel::services::ports::WorkspaceConfig;
use crate::models::{join_path, normalize_path, NodeKind, TreeNode};
use std::path::{Path, PathBuf};

pub struct LocalFileSystem {
    config: WorkspaceConfig,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::with_config(WorkspaceConfig::default())
    }

    pub fn with_config(config: WorkspaceConfig) -> Self {
        Self { config }
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFileSystem {
    fn root_folder(&self) -> FsFuture<'_, String> {
        Box::pin(async move {
            let home = home_dir().unwrap_or_else(|| PathBuf::from("/"));
            let root = home.join(&self.config.default_root_name);
            let display = path_to_string(&root);
            tokio::fs::create_dir_all(&root)
                .await
                .map_err(|e| FileError::from_io(e, &display))?;
            Ok(display)
        })
    }

    fn stat<'a>(&'a self, path: &'a str) -> FsFuture<'a, NodeKind> {
        Box::pin(async move {
            let meta = tokio::fs::metadata(path)
                .await
                .map_err(|e| FileError::from_io(e, path))?;
            Ok(if meta.is_dir() {
                NodeKind::Dir
            } else {
                NodeKind::File
            })
        })
    }

    fn file_tree<'a>(&'a self, path: &'a str) -> FsFuture<'a, TreeNode> {
        let root = path.to_string();
        let ignored = self.config.clone();
        Box::pin(async move {
            let display = root.clone();
            tokio::task::spawn_blocking(move || build_tree(&root, &ignored))
                .await
                .map_err(|e| FileError::Other {
                    path: display,
                    message: e.to_string(),
                })?
        })
    }

    fn read_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, String> {
        Box::pin(async move {
            let meta = tokio::fs::metadata(path)
                .await
                .map_err(|e| FileError::from_io(e, path))?;
            if !meta.is_file() {
                return Err(FileError::NotAFile(path.to_string()));
            }
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| FileError::from_io(e, path))
        })
    }

    fn write_file<'a>(&'a self, path: &'a str, content: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            tokio::fs::write(path, content)
                .await
                .map_err(|e| FileError::from_io(e, path))
        })
    }

    fn create_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            tokio::fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(path)
                .await
                .map(|_| ())
                .map_err(|e| FileError::from_io(e, path))
        })
    }

    fn create_dir<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| FileError::from_io(e, path))
        })
    }

    fn rename<'a>(&'a self, from: &'a str, to: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            if tokio::fs::symlink_metadata(to).await.is_ok() {
                return Err(FileError::AlreadyExists(to.to_string()));
            }
            tokio::fs::rename(from, to)
                .await
                .map_err(|e| FileError::from_io(e, from))
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            let meta = tokio::fs::symlink_metadata(path)
                .await
                .map_err(|e| FileError::from_io(e, path))?;
            let result = if meta.is_dir() {
                tokio::fs::remove_dir_all(path).await
            } else {
                tokio::fs::remove_file(path).await
            };
            result.map_err(|e| FileError::from_io(e, path))
        })
    }
}

fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

fn build_tree(root: &str, config: &WorkspaceConfig) -> Result<TreeNode> {
    let meta = std::fs::metadata(root).map_err(|e| FileError::from_io(e, root))?;
    if !meta.is_dir() {
        return Err(FileError::NotADirectory(root.to_string()));
    }
    Ok(TreeNode::root(root, read_children(root, config)))
}

fn read_children(dir: &str, config: &WorkspaceConfig) -> Vec<TreeNode> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %dir, error = %e, "skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut children = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if config.should_ignore(&name) {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            let grandchildren = read_children(&join_path(dir, &name), config);
            children.push(TreeNode::dir(dir, name, grandchildren));
        } else {
            children.push(TreeNode::file(dir, name));
        }
    }
    children
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
