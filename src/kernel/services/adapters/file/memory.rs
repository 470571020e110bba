//! 内存文件系统
//!
//! Keeps the whole hierarchy in a map keyed by '/'-joined path. Used for
//! headless sessions and as the backing store of the workspace tests.

use crate::kernel::services::ports::file::{FileError, FileSystem, FsFuture, Result};
use crate::models::{
    file_name, is_strictly_within, is_within, normalize_path, parent_path, rebase_path, NodeKind,
    TreeNode,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Dir,
    File(String),
}

impl Entry {
    fn kind(&self) -> NodeKind {
        match self {
            Entry::Dir => NodeKind::Dir,
            Entry::File(_) => NodeKind::File,
        }
    }
}

pub struct MemoryFileSystem {
    root: String,
    entries: Mutex<BTreeMap<String, Entry>>,
    read_only: AtomicBool,
}

impl MemoryFileSystem {
    pub fn new(root: &str) -> Self {
        let root = normalize_path(root);
        let mut entries = BTreeMap::new();
        entries.insert(root.clone(), Entry::Dir);
        Self {
            root,
            entries: Mutex::new(entries),
            read_only: AtomicBool::new(false),
        }
    }

    /// Adds a directory together with any missing parents.
    pub fn with_dir(self, path: &str) -> Self {
        self.insert_dir_all(&normalize_path(path));
        self
    }

    /// Adds a file, creating missing parent directories.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        let path = normalize_path(path);
        if let Some(parent) = parent_path(&path) {
            self.insert_dir_all(parent);
        }
        self.lock().insert(path, Entry::File(content.to_string()));
        self
    }

    /// While set, every mutating call fails with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    pub fn content(&self, path: &str) -> Option<String> {
        match self.lock().get(path) {
            Some(Entry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert_dir_all(&self, path: &str) {
        let mut entries = self.lock();
        let mut current = Some(path);
        while let Some(dir) = current {
            entries.entry(dir.to_string()).or_insert(Entry::Dir);
            current = parent_path(dir);
        }
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(FileError::PermissionDenied(path.to_string()));
        }
        Ok(())
    }

    fn require_parent_dir(entries: &BTreeMap<String, Entry>, path: &str) -> Result<()> {
        let Some(parent) = parent_path(path) else {
            return Ok(());
        };
        match entries.get(parent) {
            Some(Entry::Dir) => Ok(()),
            Some(Entry::File(_)) => Err(FileError::NotADirectory(parent.to_string())),
            None => Err(FileError::NotFound(parent.to_string())),
        }
    }

    fn build_tree(entries: &BTreeMap<String, Entry>, path: &str) -> TreeNode {
        TreeNode::root(path, Self::children_of(entries, path))
    }

    fn children_of(entries: &BTreeMap<String, Entry>, dir: &str) -> Vec<TreeNode> {
        entries
            .iter()
            .filter(|(path, _)| parent_path(path) == Some(dir))
            .map(|(path, entry)| {
                let name = file_name(path);
                match entry {
                    Entry::Dir => TreeNode::dir(dir, name, Self::children_of(entries, path)),
                    Entry::File(_) => TreeNode::file(dir, name),
                }
            })
            .collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn root_folder(&self) -> FsFuture<'_, String> {
        Box::pin(async move {
            self.insert_dir_all(&self.root);
            Ok(self.root.clone())
        })
    }

    fn stat<'a>(&'a self, path: &'a str) -> FsFuture<'a, NodeKind> {
        Box::pin(async move {
            self.lock()
                .get(path)
                .map(Entry::kind)
                .ok_or_else(|| FileError::NotFound(path.to_string()))
        })
    }

    fn file_tree<'a>(&'a self, path: &'a str) -> FsFuture<'a, TreeNode> {
        Box::pin(async move {
            let entries = self.lock();
            match entries.get(path) {
                Some(Entry::Dir) => Ok(Self::build_tree(&entries, path)),
                Some(Entry::File(_)) => Err(FileError::NotADirectory(path.to_string())),
                None => Err(FileError::NotFound(path.to_string())),
            }
        })
    }

    fn read_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, String> {
        Box::pin(async move {
            match self.lock().get(path) {
                Some(Entry::File(content)) => Ok(content.clone()),
                Some(Entry::Dir) => Err(FileError::NotAFile(path.to_string())),
                None => Err(FileError::NotFound(path.to_string())),
            }
        })
    }

    fn write_file<'a>(&'a self, path: &'a str, content: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable(path)?;
            let mut entries = self.lock();
            if let Some(Entry::Dir) = entries.get(path) {
                return Err(FileError::NotAFile(path.to_string()));
            }
            Self::require_parent_dir(&entries, path)?;
            entries.insert(path.to_string(), Entry::File(content.to_string()));
            Ok(())
        })
    }

    fn create_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable(path)?;
            let mut entries = self.lock();
            if entries.contains_key(path) {
                return Err(FileError::AlreadyExists(path.to_string()));
            }
            Self::require_parent_dir(&entries, path)?;
            entries.insert(path.to_string(), Entry::File(String::new()));
            Ok(())
        })
    }

    fn create_dir<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable(path)?;
            {
                let entries = self.lock();
                let mut current = Some(path);
                while let Some(dir) = current {
                    if let Some(Entry::File(_)) = entries.get(dir) {
                        return Err(FileError::AlreadyExists(dir.to_string()));
                    }
                    current = parent_path(dir);
                }
            }
            self.insert_dir_all(path);
            Ok(())
        })
    }

    fn rename<'a>(&'a self, from: &'a str, to: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable(from)?;
            let mut entries = self.lock();
            if !entries.contains_key(from) {
                return Err(FileError::NotFound(from.to_string()));
            }
            if entries.contains_key(to) {
                return Err(FileError::AlreadyExists(to.to_string()));
            }
            if is_strictly_within(to, from) {
                return Err(FileError::Other {
                    path: to.to_string(),
                    message: format!("cannot move {from} into itself"),
                });
            }
            Self::require_parent_dir(&entries, to)?;

            let moved: Vec<String> = entries
                .keys()
                .filter(|path| is_within(path, from))
                .cloned()
                .collect();
            for old in moved {
                if let Some(entry) = entries.remove(&old) {
                    let new = rebase_path(&old, from, to).unwrap_or(old);
                    entries.insert(new, entry);
                }
            }
            Ok(())
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()> {
        Box::pin(async move {
            self.check_writable(path)?;
            let mut entries = self.lock();
            if !entries.contains_key(path) {
                return Err(FileError::NotFound(path.to_string()));
            }
            entries.retain(|key, _| !is_within(key, path));
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/memory.rs"]
mod tests;
