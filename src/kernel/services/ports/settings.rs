//! Persistence port: a flat string key-value store that remembers the
//! workspace session between runs.

use std::io;
use thiserror::Error;

pub const ROOT_KEY: &str = "workspace.root";
pub const OPEN_FILES_KEY: &str = "workspace.open_files";
pub const SELECTED_FILE_KEY: &str = "workspace.selected_file";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid state payload: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub fn encode_path_list(paths: &[String]) -> String {
    serde_json::to_string(paths).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a list written by [`encode_path_list`]. A corrupt value is treated
/// as an empty list.
pub fn decode_path_list(value: &str) -> Vec<String> {
    match serde_json::from_str(value) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable open file list");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
