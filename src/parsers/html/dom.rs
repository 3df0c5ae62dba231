use std::io;

use encoding_rs::Encoding;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::utils::WHITESPACES;

/// 将 HTML 字节转换为 DOM
///
/// 关闭脚本支持解析，`<noscript>` 的内容才会作为元素进入 DOM。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> io::Result<RcDom> {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.to_string()
    } else {
        String::from_utf8_lossy(data).to_string()
    };

    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut s.as_bytes())
}

/// 取出解析过程中收集到的警告
pub fn take_parse_errors(dom: &RcDom) -> Vec<String> {
    dom.errors
        .borrow_mut()
        .drain(..)
        .map(|error| error.to_string())
        .collect()
}

/// 按文档顺序查找所有指定名称的元素
pub fn find_nodes(node: &Handle, node_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if get_node_name(node) == Some(node_name) {
        found_nodes.push(node.clone());
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_name));
    }

    found_nodes
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取父节点
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// 父节点链（由近及远）的元素名是否依次为 `names`
pub fn parent_chain_is(node: &Handle, names: &[&str]) -> bool {
    let mut current = node.clone();
    for name in names {
        match get_parent_node(&current) {
            Some(parent) if get_node_name(&parent) == Some(*name) => current = parent,
            _ => return false,
        }
    }
    true
}

/// `class` 属性中是否含有给定类名之一
pub fn has_class(node: &Handle, classes_to_check: &[&str]) -> bool {
    match get_node_attr(node, "class") {
        Some(value) => value
            .split(WHITESPACES)
            .any(|class| classes_to_check.contains(&class)),
        None => false,
    }
}

/// 直接子文本节点拼接得到的文本
pub fn get_node_text(node: &Handle) -> Option<String> {
    let mut text: Option<String> = None;
    for child_node in node.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child_node.data {
            text.get_or_insert_with(String::new)
                .push_str(&contents.borrow());
        }
    }
    text
}

/// 设置节点属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::{namespace_url, ns, LocalName};

    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    let _ = &attrs_mut[i].value.clear();
                    let _ = &attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                let name = LocalName::from(attr_name);

                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}
