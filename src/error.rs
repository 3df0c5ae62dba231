//! 统一错误处理
//!
//! 预处理流程中所有致命错误的类型。可恢复的情况（缺失的重命名源文件、
//! HTML 解析警告）只记录日志，不会出现在这里。

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 预处理错误类型
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// 配置错误
    #[error("configuration error: {0}")]
    Config(String),

    /// 文件系统错误，附带出错的路径
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 归档目录布局不符合预期
    #[error("unexpected mirror layout: {0}")]
    Layout(String),

    /// load.php 返回了无法识别的模块组合
    #[error("loader file {0} does not match any known files")]
    UnknownLoader(String),

    /// 重命名目标已存在且内容不同
    #[error("refusing to rename {} to {}: destination exists with different content", from.display(), to.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    /// HTML 文档无法读取为 DOM
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// 未知的字符编码
    #[error("unknown encoding \"{0}\"")]
    UnknownEncoding(String),
}

impl ArchiveError {
    /// 为 I/O 错误附加路径
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// 预处理结果类型
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// 为 `io::Result` 附加路径上下文
pub trait IoResultExt<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> ArchiveResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> ArchiveResult<T> {
        self.map_err(|source| ArchiveError::io(path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_loader_display() {
        let error = ArchiveError::UnknownLoader("load.php?modules=foo".to_string());
        assert_eq!(
            format!("{}", error),
            "loader file load.php?modules=foo does not match any known files"
        );
    }

    #[test]
    fn test_io_error_carries_path() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let error = result.at_path("common/ext.css").unwrap_err();
        assert_eq!(format!("{}", error), "common/ext.css: gone");
    }

    #[test]
    fn test_collision_display() {
        let error = ArchiveError::RenameCollision {
            from: PathBuf::from("a/foo.css?x=2"),
            to: PathBuf::from("a/foo.css"),
        };
        assert!(format!("{}", error).contains("a/foo.css?x=2"));
    }
}
