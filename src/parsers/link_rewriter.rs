//! 链接重写模块
//!
//! 文件改名之后，HTML 中所有 `src`/`href` 都要跟着修正，否则归档
//! 内部的链接会断开。每个文档独立解析、清理、重写并原地写回，
//! 文档之间不共享任何可变状态。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use markup5ever_rcdom::{Handle, RcDom};
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ArchiveError, ArchiveResult, IoResultExt};
use crate::layout::COMMON_DIR;
use crate::parsers::html::rules::{actions_for, default_rules, Action, Rule};
use crate::parsers::html::utils::LINK_ATTRS;
use crate::parsers::html::{
    get_node_attr, get_node_name, html_to_dom, serialize_document, set_node_attr,
    take_parse_errors,
};
use crate::rename::RenameMap;
use crate::utils::url::{is_url_and_has_protocol, percent_decode, percent_encode};

/// 默认站点域名
pub const DEFAULT_DOMAIN: &str = "cppreference.com";

/// 链接修正器
///
/// 持有只读的重命名映射和共享资源路径的替换规则。
pub struct LinkFixer<'a> {
    rename_map: &'a RenameMap,
    shared_asset_paths: Vec<(String, String)>,
}

impl<'a> LinkFixer<'a> {
    pub fn new(rename_map: &'a RenameMap, domain: &str) -> Self {
        let common = format!("../{COMMON_DIR}/");
        LinkFixer {
            rename_map,
            shared_asset_paths: vec![
                (format!("../../upload.{domain}/mwiki/"), common.clone()),
                ("../mwiki/".to_string(), common),
            ],
        }
    }

    /// 修正单个链接
    ///
    /// 1. 已知协议的绝对链接原样返回
    /// 2. 百分号解码
    /// 3. 按映射顺序把原始文件名替换为新文件名（子串替换）
    /// 4. 共享资源路径统一为 `../common/`
    /// 5. `.php`/`.css` 之后的查询字符串删除
    /// 6. 重新编码，并还原 `#`
    pub fn fix_relative_link(&self, target: &str) -> String {
        if is_url_and_has_protocol(target) {
            return target.to_string();
        }

        let mut target = percent_decode(target);
        target = self.rename_map.substitute(&target);

        for (from, to) in &self.shared_asset_paths {
            target = target.replace(from.as_str(), to);
        }

        target = query_string_re().replace_all(&target, "$ext").to_string();

        percent_encode(&target).replace("%23", "#")
    }
}

fn query_string_re() -> &'static Regex {
    static QUERY_STRING_RE: OnceLock<Regex> = OnceLock::new();
    QUERY_STRING_RE.get_or_init(|| {
        Regex::new(r"(?P<ext>\.php|\.css)\?.*").expect("query string pattern is valid")
    })
}

/// 对 DOM 应用清理规则并重写链接
pub fn rewrite_links_in_dom(dom: RcDom, rules: &[Rule], fixer: &LinkFixer) -> RcDom {
    walk_and_rewrite_links(&dom.document, rules, fixer);
    dom
}

/// 重写 HTML 字符串中的链接
pub fn rewrite_links_in_html(
    html: &str,
    rename_map: &RenameMap,
    domain: &str,
) -> ArchiveResult<String> {
    let dom = html_to_dom(html.as_bytes(), "utf-8").map_err(|e| ArchiveError::Parse {
        path: PathBuf::new(),
        message: e.to_string(),
    })?;

    let fixer = LinkFixer::new(rename_map, domain);
    let dom = rewrite_links_in_dom(dom, &default_rules(), &fixer);

    let serialized = serialize_document(dom, "utf-8").map_err(|e| ArchiveError::Parse {
        path: PathBuf::new(),
        message: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&serialized).to_string())
}

/// 递归遍历DOM树，删除命中的元素并重写其余元素的链接
fn walk_and_rewrite_links(node: &Handle, rules: &[Rule], fixer: &LinkFixer) {
    let children: Vec<Handle> = node.children.borrow().clone();
    let mut kept_children: Vec<Handle> = Vec::with_capacity(children.len());

    for child_node in children {
        if get_node_name(&child_node).is_some() {
            let actions = actions_for(rules, &child_node);

            if actions.contains(&Action::Remove) {
                child_node.parent.set(None);
                continue;
            }

            if actions.contains(&Action::RewriteLinks) {
                rewrite_link_attrs(&child_node, fixer);
            }
        }

        walk_and_rewrite_links(&child_node, rules, fixer);
        kept_children.push(child_node);
    }

    *node.children.borrow_mut() = kept_children;
}

fn rewrite_link_attrs(node: &Handle, fixer: &LinkFixer) {
    for attr_name in LINK_ATTRS {
        if let Some(value) = get_node_attr(node, attr_name) {
            let fixed = fixer.fix_relative_link(&value);
            if fixed != value {
                set_node_attr(node, attr_name, Some(fixed));
            }
        }
    }
}

/// 处理单个 HTML 文件并原地写回
///
/// 返回解析过程中报告的警告数量；警告不会中止处理。
pub fn preprocess_html_file(
    path: &Path,
    rules: &[Rule],
    fixer: &LinkFixer,
    document_encoding: &str,
) -> ArchiveResult<usize> {
    let data = fs::read(path).at_path(path)?;
    let dom = html_to_dom(&data, document_encoding).map_err(|e| ArchiveError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let parse_errors = take_parse_errors(&dom);
    for error in &parse_errors {
        warn!("HTML WARN: {}: {}", path.display(), error);
    }

    let dom = rewrite_links_in_dom(dom, rules, fixer);
    let output = serialize_document(dom, document_encoding).at_path(path)?;
    fs::write(path, output).at_path(path)?;

    debug!("Preprocessed {}", path.display());
    Ok(parse_errors.len())
}

/// 查找所有需要处理的 HTML 文件
pub fn find_html_files(root: &Path) -> ArchiveResult<Vec<PathBuf>> {
    let mut html_files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ArchiveError::io(path, e.into())
        })?;

        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(".html"))
        {
            html_files.push(entry.into_path());
        }
    }

    Ok(html_files)
}
