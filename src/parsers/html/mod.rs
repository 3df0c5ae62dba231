//! HTML解析和处理模块
//!
//! - `utils`: 拒绝列表等常量
//! - `dom`: 基础DOM操作
//! - `rules`: 声明式的元素清理规则
//! - `serializer`: 序列化功能

pub mod dom;
pub mod rules;
pub mod serializer;
pub mod utils;

pub use dom::{
    find_nodes, get_node_attr, get_node_name, get_node_text, get_parent_node, has_class,
    html_to_dom, parent_chain_is, set_node_attr, take_parse_errors,
};
pub use rules::{actions_for, default_rules, Action, Matcher, Rule};
pub use serializer::serialize_document;
pub use utils::WHITESPACES;
