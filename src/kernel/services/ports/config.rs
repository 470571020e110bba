use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Folder created under the home directory when no root was persisted.
    pub default_root_name: String,
    /// Entry names skipped when the tree is built.
    pub ignored_names: Vec<String>,
    pub restore_session: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_root_name: "nodian".to_string(),
            ignored_names: [
                ".DS_Store",
                ".Spotlight-V100",
                ".Trashes",
                ".fseventsd",
                ".TemporaryItems",
                "Thumbs.db",
                "desktop.ini",
                ".git",
                "node_modules",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            restore_session: true,
        }
    }
}

impl WorkspaceConfig {
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignored_names.iter().any(|ignored| ignored == name)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
