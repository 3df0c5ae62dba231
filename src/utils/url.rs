use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub use url::Url;

/// 路径编码集：除字母、数字以及 `_ . - ~ /` 之外全部转义
pub const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// 指向归档之外的协议
///
/// 页面名本身可以带冒号（`Special:...`、`Template:...`），只认这些协议。
pub const EXTERNAL_SCHEMES: &[&str] = &[
    "http",
    "https",
    "ftp",
    "ftps",
    "mailto",
    "data",
    "javascript",
];

/// 是否指向归档之外（已知协议的绝对 URL 或协议相对 URL）
pub fn is_url_and_has_protocol(input: &str) -> bool {
    let input = input.trim();
    if input.starts_with("//") {
        return true;
    }

    match Url::parse(input) {
        Ok(url) => EXTERNAL_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

/// 百分号解码，非法的 UTF-8 序列替换为 U+FFFD
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().to_string()
}

/// 按路径编码集做百分号编码
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, PATH_ENCODE_SET).to_string()
}
