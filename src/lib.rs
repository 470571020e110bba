//! nodian - 工作区文件树与多文档编辑核心
//!
//! 模块结构：
//! - models: 数据模型（TreeNode, 路径工具, 视图行）
//! - kernel: 工作区核心（Workspace, 错误类型）
//! - kernel::services: 端口与适配器（文件系统, 会话存储, 配置）

pub mod kernel;
pub mod models;
