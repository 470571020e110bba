//! File service port.
//!
//! Every call is a suspension point for the workspace core; adapters are free
//! to back them with local disk, an embedded store or RPC.

use super::runtime::BoxFuture;
use crate::models::{NodeKind, TreeNode};
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FileError>;

pub type FsFuture<'a, T> = BoxFuture<'a, Result<T>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("{path}: {message}")]
    Other { path: String, message: String },
}

impl FileError {
    pub fn from_io(err: io::Error, path: &str) -> Self {
        let path = path.to_string();
        match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path),
            io::ErrorKind::AlreadyExists => FileError::AlreadyExists(path),
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path),
            _ => FileError::Other {
                path,
                message: err.to_string(),
            },
        }
    }
}

pub trait FileSystem: Send + Sync {
    /// Root to fall back on when nothing was persisted.
    fn root_folder(&self) -> FsFuture<'_, String>;

    fn stat<'a>(&'a self, path: &'a str) -> FsFuture<'a, NodeKind>;

    /// Full recursive snapshot rooted at `path`.
    fn file_tree<'a>(&'a self, path: &'a str) -> FsFuture<'a, TreeNode>;

    fn read_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, String>;

    fn write_file<'a>(&'a self, path: &'a str, content: &'a str) -> FsFuture<'a, ()>;

    fn create_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()>;

    fn create_dir<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()>;

    fn rename<'a>(&'a self, from: &'a str, to: &'a str) -> FsFuture<'a, ()>;

    /// Removes a file, or a directory with everything under it.
    fn delete<'a>(&'a self, path: &'a str) -> FsFuture<'a, ()>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
