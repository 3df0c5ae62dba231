/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 打印版和编辑界面专用的类名
pub const NON_PRINTABLE_CLASSES: &[&str] = &["noprint", "editsection"];

/// 目录容器的 id
pub const TOC_ID: &str = "toc";

/// 离线归档中无法使用的 `<link rel>` 值
pub const UNUSED_LINK_RELS: &[&str] = &["alternate", "search", "edit", "EditURI"];

/// Google Analytics 外部脚本地址片段
pub const ANALYTICS_SCRIPT_SRC: &str = "google-analytics.com/ga.js";

/// Google Analytics 内联脚本特征
pub const ANALYTICS_INLINE_MARKERS: &[&str] = &["google-analytics.com/ga.js", "pageTracker"];

/// 需要重写的链接属性
pub const LINK_ATTRS: &[&str] = &["src", "href"];
