//! 配置服务：加载工作区配置
//!
//! Reads `config.json` from the app data dir. Missing keys take their default
//! values; an unreadable file falls back to defaults entirely.

use crate::kernel::services::ports::config::WorkspaceConfig;
use std::path::Path;

pub struct ConfigService {
    workspace: WorkspaceConfig,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            workspace: WorkspaceConfig::default(),
        }
    }

    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable");
                }
                return Self::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(workspace) => Self { workspace },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::new()
            }
        }
    }

    pub fn workspace(&self) -> &WorkspaceConfig {
        &self.workspace
    }

    pub fn set_restore_session(&mut self, restore: bool) {
        self.workspace.restore_session = restore;
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/config.rs"]
mod tests;
