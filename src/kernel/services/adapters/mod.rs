//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod config;
pub mod file;
pub mod paths;
pub mod settings;

pub use config::ConfigService;
pub use file::{LocalFileSystem, MemoryFileSystem};
pub use paths::{ensure_log_dir, get_config_path, get_log_dir, get_state_path, home_dir};
pub use settings::{JsonFileStore, MemoryStore};
