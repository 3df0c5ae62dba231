//! 文档清理规则
//!
//! 每条规则是一个 谓词 → 动作 的组合，规则表就是数据。遍历 DOM 时
//! 对每个元素依次检查规则：第一条命中的 `Remove` 规则把元素连同子树
//! 一起删除；`RewriteLinks` 规则对元素上的链接属性做链接修正。
//!
//! # 使用示例
//!
//! ```rust
//! use wiki_archive::parsers::html::rules::{default_rules, Action};
//!
//! let rules = default_rules();
//! assert_eq!(rules.last().map(|rule| rule.action), Some(Action::RewriteLinks));
//! ```

use markup5ever_rcdom::Handle;

use super::dom::{get_node_attr, get_node_name, get_node_text, has_class, parent_chain_is};
use super::utils::{
    ANALYTICS_INLINE_MARKERS, ANALYTICS_SCRIPT_SRC, LINK_ATTRS, NON_PRINTABLE_CLASSES, TOC_ID,
    UNUSED_LINK_RELS,
};

/// 元素谓词
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matcher {
    /// `class` 中含有任一给定类名
    ClassIn(&'static [&'static str]),
    /// `id` 等于给定值
    IdEquals(&'static str),
    /// `/html/head/link` 且 `rel` 为给定值之一
    HeadLinkRelIn(&'static [&'static str]),
    /// `/html/body/script` 且 `src` 含有给定片段
    BodyScriptSrcContains(&'static str),
    /// `/html/body/script` 且内联代码含有任一给定片段
    BodyScriptTextContains(&'static [&'static str]),
    /// 带有任一给定属性
    HasAttr(&'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, node: &Handle) -> bool {
        match *self {
            Matcher::ClassIn(classes) => has_class(node, classes),
            Matcher::IdEquals(id) => get_node_attr(node, "id").as_deref() == Some(id),
            Matcher::HeadLinkRelIn(rels) => {
                get_node_name(node) == Some("link")
                    && parent_chain_is(node, &["head", "html"])
                    && get_node_attr(node, "rel").is_some_and(|rel| rels.contains(&rel.as_str()))
            }
            Matcher::BodyScriptSrcContains(fragment) => {
                is_body_script(node)
                    && get_node_attr(node, "src").is_some_and(|src| src.contains(fragment))
            }
            Matcher::BodyScriptTextContains(markers) => {
                is_body_script(node)
                    && get_node_text(node)
                        .is_some_and(|text| markers.iter().any(|marker| text.contains(marker)))
            }
            Matcher::HasAttr(attrs) => attrs
                .iter()
                .any(|attr| get_node_attr(node, attr).is_some()),
        }
    }
}

fn is_body_script(node: &Handle) -> bool {
    get_node_name(node) == Some("script") && parent_chain_is(node, &["body", "html"])
}

/// 规则动作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// 删除元素及其子树
    Remove,
    /// 修正 `src`/`href` 属性
    RewriteLinks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub matcher: Matcher,
    pub action: Action,
}

impl Rule {
    pub const fn new(matcher: Matcher, action: Action) -> Self {
        Rule { matcher, action }
    }
}

/// 默认规则表
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(Matcher::ClassIn(NON_PRINTABLE_CLASSES), Action::Remove),
        Rule::new(Matcher::IdEquals(TOC_ID), Action::Remove),
        Rule::new(Matcher::HeadLinkRelIn(UNUSED_LINK_RELS), Action::Remove),
        Rule::new(
            Matcher::BodyScriptSrcContains(ANALYTICS_SCRIPT_SRC),
            Action::Remove,
        ),
        Rule::new(
            Matcher::BodyScriptTextContains(ANALYTICS_INLINE_MARKERS),
            Action::Remove,
        ),
        Rule::new(Matcher::HasAttr(LINK_ATTRS), Action::RewriteLinks),
    ]
}

/// 某元素应当执行的动作
///
/// 删除优先：只要有一条 `Remove` 规则命中就不再重写。
pub fn actions_for(rules: &[Rule], node: &Handle) -> Vec<Action> {
    if rules
        .iter()
        .any(|rule| rule.action == Action::Remove && rule.matcher.matches(node))
    {
        return vec![Action::Remove];
    }

    rules
        .iter()
        .filter(|rule| rule.action != Action::Remove && rule.matcher.matches(node))
        .map(|rule| rule.action)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{find_nodes, html_to_dom};

    fn first(html: &str, name: &str) -> (markup5ever_rcdom::RcDom, Handle) {
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();
        let node = find_nodes(&dom.document, name)[0].clone();
        (dom, node)
    }

    #[test]
    fn test_class_in() {
        let (_dom, node) = first("<div class=\"editsection\">[edit]</div>", "div");
        assert!(Matcher::ClassIn(NON_PRINTABLE_CLASSES).matches(&node));

        let (_dom, node) = first("<div class=\"editsections\">[edit]</div>", "div");
        assert!(!Matcher::ClassIn(NON_PRINTABLE_CLASSES).matches(&node));
    }

    #[test]
    fn test_id_equals() {
        let (_dom, node) = first("<table id=\"toc\"></table>", "table");
        assert!(Matcher::IdEquals(TOC_ID).matches(&node));
    }

    #[test]
    fn test_head_link_rel_in() {
        let (_dom, node) = first(
            "<html><head><link rel=\"EditURI\" href=\"api.php\"></head></html>",
            "link",
        );
        assert!(Matcher::HeadLinkRelIn(UNUSED_LINK_RELS).matches(&node));

        let (_dom, node) = first(
            "<html><head><link rel=\"stylesheet\" href=\"a.css\"></head></html>",
            "link",
        );
        assert!(!Matcher::HeadLinkRelIn(UNUSED_LINK_RELS).matches(&node));
    }

    #[test]
    fn test_body_script_matchers() {
        let (_dom, node) = first(
            "<html><body><script src=\"http://www.google-analytics.com/ga.js\"></script></body></html>",
            "script",
        );
        assert!(Matcher::BodyScriptSrcContains(ANALYTICS_SCRIPT_SRC).matches(&node));

        let (_dom, node) = first(
            "<html><body><script>var pageTracker = _gat._getTracker();</script></body></html>",
            "script",
        );
        assert!(Matcher::BodyScriptTextContains(ANALYTICS_INLINE_MARKERS).matches(&node));

        let (_dom, node) = first(
            "<html><head><script>var pageTracker;</script></head></html>",
            "script",
        );
        assert!(!Matcher::BodyScriptTextContains(ANALYTICS_INLINE_MARKERS).matches(&node));
    }

    #[test]
    fn test_remove_wins_over_rewrite() {
        let rules = default_rules();
        let (_dom, node) = first("<a class=\"noprint\" href=\"a.html\">a</a>", "a");
        assert_eq!(actions_for(&rules, &node), vec![Action::Remove]);

        let (_dom, node) = first("<a href=\"a.html\">a</a>", "a");
        assert_eq!(actions_for(&rules, &node), vec![Action::RewriteLinks]);

        let (_dom, node) = first("<p>text</p>", "p");
        assert!(actions_for(&rules, &node).is_empty());
    }
}
