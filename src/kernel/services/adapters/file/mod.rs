//! 文件服务模块
//!
//! FileSystem 的具体实现：本地磁盘与内存

pub mod local;
pub mod memory;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
