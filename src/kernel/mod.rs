//! Headless workspace core: tree, documents and the mutations that keep them
//! in step with the backing filesystem.

pub mod error;
pub mod services;
pub mod workspace;

pub use error::{FsOp, WorkspaceError};
pub use workspace::{Document, EntryKind, LoadState, Reload, Workspace};
