//! 环境变量
//!
//! 命令行之外的运行参数只有日志相关的两项，通过 `EnvVar` 读取并校验。

use std::env;
use std::fmt;

use tracing::Level;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::DEFAULT.ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 日志级别
pub struct LogLevel;
impl EnvVar<Level> for LogLevel {
    const NAME: &'static str = "WIKI_ARCHIVE_LOG_LEVEL";
    const DEFAULT: Option<Level> = Some(Level::INFO);
    const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

    fn parse(value: &str) -> EnvResult<Level> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(EnvError {
                variable: Self::NAME.to_string(),
                message: format!(
                    "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                    value
                ),
            }),
        }
    }
}

/// 禁用颜色输出
pub struct NoColor;
impl EnvVar<bool> for NoColor {
    const NAME: &'static str = "NO_COLOR";
    const DEFAULT: Option<bool> = Some(false);
    const DESCRIPTION: &'static str = "Disable colored output when set to any value";

    fn parse(value: &str) -> EnvResult<bool> {
        // NO_COLOR 遵循标准：任何非空值都表示禁用颜色
        Ok(!value.is_empty())
    }
}

/// 环境变量说明
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("Environment variables:\n");
    docs.push_str(&format!(
        "  {}: {} (default: info)\n",
        LogLevel::NAME,
        LogLevel::DESCRIPTION
    ));
    docs.push_str(&format!("  {}: {}\n", NoColor::NAME, NoColor::DESCRIPTION));
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse("debug").unwrap(), Level::DEBUG);
        assert_eq!(LogLevel::parse("WARN").unwrap(), Level::WARN);
        assert_eq!(LogLevel::parse(" error ").unwrap(), Level::ERROR);

        assert!(LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_no_color_parsing() {
        assert!(NoColor::parse("1").unwrap());
        assert!(!NoColor::parse("").unwrap());
    }

    #[test]
    fn test_error_display() {
        let error = LogLevel::parse("loud").unwrap_err();
        assert!(error.to_string().starts_with("Environment variable 'WIKI_ARCHIVE_LOG_LEVEL'"));
    }

    #[test]
    fn test_env_docs_mention_variables() {
        let docs = generate_env_docs();
        assert!(docs.contains("WIKI_ARCHIVE_LOG_LEVEL"));
        assert!(docs.contains("NO_COLOR"));
    }
}
