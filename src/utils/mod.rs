//! # 工具模块
//!
//! - `url` - 百分号编解码、绝对 URL 识别

pub mod url;

// Re-export commonly used items for convenience
pub use url::{
    is_url_and_has_protocol, percent_decode, percent_encode, Url, EXTERNAL_SCHEMES,
    PATH_ENCODE_SET,
};
