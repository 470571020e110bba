//! Errors surfaced by workspace operations.

use crate::kernel::services::ports::FileError;
use std::fmt;
use thiserror::Error;

/// Filesystem-service call that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FsOp {
    RootFolder,
    Stat,
    GetFileTree,
    ReadFile,
    WriteFile,
    CreateFile,
    CreateDirectory,
    Rename,
    Delete,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsOp::RootFolder => "resolve root folder",
            FsOp::Stat => "stat",
            FsOp::GetFileTree => "read tree",
            FsOp::ReadFile => "read",
            FsOp::WriteFile => "write",
            FsOp::CreateFile => "create file",
            FsOp::CreateDirectory => "create directory",
            FsOp::Rename => "rename",
            FsOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("{op} failed for {path}: {source}")]
    Io {
        op: FsOp,
        path: String,
        to: Option<String>,
        source: FileError,
    },
    #[error("invalid workspace root {path}: {reason}")]
    InvalidRoot { path: String, reason: String },
    #[error("no longer in the workspace tree: {path}")]
    StaleReference { path: String },
    #[error("document is not open: {path}")]
    NotOpen { path: String },
    #[error("invalid entry name: {name:?}")]
    InvalidName { name: String },
    #[error("no workspace root is set")]
    NoRoot,
    #[error("malformed tree under {path}")]
    MalformedTree { path: String },
}

impl WorkspaceError {
    pub fn io(op: FsOp, path: &str, source: FileError) -> Self {
        WorkspaceError::Io {
            op,
            path: path.to_string(),
            to: None,
            source,
        }
    }

    pub fn io_rename(from: &str, to: &str, source: FileError) -> Self {
        WorkspaceError::Io {
            op: FsOp::Rename,
            path: from.to_string(),
            to: Some(to.to_string()),
            source,
        }
    }

    /// Operation kind for `Io` failures.
    pub fn op(&self) -> Option<FsOp> {
        match self {
            WorkspaceError::Io { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// The path the failing operation targeted, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            WorkspaceError::Io { path, .. }
            | WorkspaceError::InvalidRoot { path, .. }
            | WorkspaceError::StaleReference { path }
            | WorkspaceError::NotOpen { path }
            | WorkspaceError::MalformedTree { path } => Some(path),
            WorkspaceError::InvalidName { .. } | WorkspaceError::NoRoot => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/error.rs"]
mod tests;
