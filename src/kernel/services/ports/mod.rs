//! Service ports: traits + data contracts.

pub mod config;
pub mod file;
pub mod runtime;
pub mod settings;

pub use config::WorkspaceConfig;
pub use file::{FileError, FileSystem, FsFuture, Result as FileResult};
pub use runtime::BoxFuture;
pub use settings::{
    decode_path_list, encode_path_list, KeyValueStore, StoreError, OPEN_FILES_KEY, ROOT_KEY,
    SELECTED_FILE_KEY,
};
