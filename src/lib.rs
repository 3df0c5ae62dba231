//! # Wiki Archive Library
//!
//! 把镜像工具抓取下来的 wiki 站点整理成可离线浏览的归档：合并共享资源
//! 目录，把文件系统不友好的文件名改掉，修正 HTML 中随之失效的链接，
//! 并对聚合样式表做少量替换。
//!
//! ## 模块组织
//!
//! - `core` - 完整预处理流程
//! - `layout` - 归档目录整理
//! - `rename` - 重命名规划与执行
//! - `parsers` - HTML 清理与链接重写、样式表处理
//! - `utils` - URL 编解码
//! - `env` - 环境变量
//! - `error` - 错误类型

pub mod core;
pub mod env;
pub mod error;
pub mod layout;
pub mod parsers;
pub mod rename;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::core::{preprocess_archive, ArchiveOptions, RunSummary};
pub use error::{ArchiveError, ArchiveResult};
pub use parsers::*;
pub use rename::{find_files_to_be_renamed, rename_files, RenameCategory, RenameEntry, RenameMap};
