//! # 解析器模块
//!
//! - `html` - HTML 解析、DOM 操作、清理规则、序列化
//! - `css` - 聚合样式表的收尾替换
//! - `link_rewriter` - 按重命名映射修正文档中的链接

pub mod css;
pub mod html;
pub mod link_rewriter;

// Re-export commonly used items for convenience
pub use css::{finish_stylesheets, preprocess_css, preprocess_css_file};
pub use html::{html_to_dom, serialize_document};
pub use link_rewriter::{
    find_html_files, preprocess_html_file, rewrite_links_in_dom, rewrite_links_in_html,
    LinkFixer, DEFAULT_DOMAIN,
};
