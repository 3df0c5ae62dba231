//! 样式表收尾处理
//!
//! 两个聚合样式表（`common/site_modules.css` 与 `common/ext.css`）需要
//! 做少量纯文本替换：字体路径改为同目录引用，并把离线查看器不支持的
//! `nth-child(1)` 降级为 `first-child`。`site_modules.css` 在替换之前
//! 还要追加一段外部提供的补充样式。
//!
//! 样式表中的查询字符串不会被用到，所以这里不涉及重命名映射。

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ArchiveError, ArchiveResult, IoResultExt};
use crate::layout::{COMMON_DIR, FONT_FILES};

/// 追加补充样式的聚合样式表
pub const SITE_MODULES_CSS: &str = "site_modules.css";

/// 扩展样式聚合样式表
pub const EXT_CSS: &str = "ext.css";

/// 需要收尾处理的聚合样式表
pub const AGGREGATE_STYLESHEETS: &[&str] = &[SITE_MODULES_CSS, EXT_CSS];

/// 离线查看器不支持的选择器及其替代（仅单个子元素时等价）
pub const SELECTOR_DOWNGRADES: &[(&str, &str)] = &[("nth-child(1)", "first-child")];

/// 对样式表文本做全部替换
pub fn preprocess_css(css: &str) -> String {
    let mut text = css.to_string();

    for font in FONT_FILES {
        text = text.replace(&format!("../{font}"), font);
    }

    for (selector, replacement) in SELECTOR_DOWNGRADES {
        text = text.replace(selector, replacement);
    }

    text
}

/// 把补充样式追加到样式表末尾
pub fn append_css(path: &Path, supplement: &str) -> ArchiveResult<()> {
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(path)
        .at_path(path)?;
    file.write_all(supplement.as_bytes()).at_path(path)
}

/// 原地处理单个样式表
pub fn preprocess_css_file(path: &Path) -> ArchiveResult<()> {
    let text = fs::read_to_string(path).at_path(path)?;
    fs::write(path, preprocess_css(&text)).at_path(path)
}

/// 追加补充样式并处理两个聚合样式表
///
/// 返回实际处理的样式表数量。补充样式文件必须存在；镜像中缺少的
/// 聚合样式表只记录警告。
pub fn finish_stylesheets(root: &Path, supplement_path: &Path) -> ArchiveResult<usize> {
    if !supplement_path.is_file() {
        return Err(ArchiveError::Config(format!(
            "supplemental stylesheet {} not found",
            supplement_path.display()
        )));
    }
    let supplement = fs::read_to_string(supplement_path).at_path(supplement_path)?;

    let common = root.join(COMMON_DIR);
    let site_modules = common.join(SITE_MODULES_CSS);
    if site_modules.is_file() {
        append_css(&site_modules, &supplement)?;
    }

    let mut finished = 0;
    for name in AGGREGATE_STYLESHEETS {
        let path = common.join(name);
        if !path.is_file() {
            warn!("Stylesheet {} not found, skipping", path.display());
            continue;
        }
        preprocess_css_file(&path)?;
        finished += 1;
    }

    info!("Finished {} stylesheets", finished);
    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_css_fonts() {
        let css = "@font-face{src:url(\"../DejaVuSansMonoCondensed60.ttf\")}\
                   @font-face{src:url(\"../DejaVuSansMonoCondensed75.ttf\")}";

        let result = preprocess_css(css);

        assert!(!result.contains("../DejaVuSansMonoCondensed60.ttf"));
        assert!(!result.contains("../DejaVuSansMonoCondensed75.ttf"));
        assert!(result.contains("url(\"DejaVuSansMonoCondensed60.ttf\")"));
        assert!(result.contains("url(\"DejaVuSansMonoCondensed75.ttf\")"));
    }

    #[test]
    fn test_preprocess_css_selector_downgrade() {
        let result = preprocess_css("tr td:nth-child(1) { width: 1px }");
        assert_eq!(result, "tr td:first-child { width: 1px }");
    }

    #[test]
    fn test_finish_stylesheets() {
        let dir = tempfile::tempdir().unwrap();
        let common = dir.path().join(COMMON_DIR);
        fs::create_dir_all(&common).unwrap();
        fs::write(common.join(SITE_MODULES_CSS), "a{}\n").unwrap();
        fs::write(common.join(EXT_CSS), "li:nth-child(1){}").unwrap();
        let supplement = dir.path().join("preprocess-css.css");
        fs::write(&supplement, "td:nth-child(1){font:url(../DejaVuSansMonoCondensed60.ttf)}").unwrap();

        let finished = finish_stylesheets(dir.path(), &supplement).unwrap();

        assert_eq!(finished, 2);
        assert_eq!(
            fs::read_to_string(common.join(SITE_MODULES_CSS)).unwrap(),
            "a{}\ntd:first-child{font:url(DejaVuSansMonoCondensed60.ttf)}"
        );
        assert_eq!(
            fs::read_to_string(common.join(EXT_CSS)).unwrap(),
            "li:first-child{}"
        );
    }

    #[test]
    fn test_finish_stylesheets_requires_supplement() {
        let dir = tempfile::tempdir().unwrap();

        let result = finish_stylesheets(dir.path(), &dir.path().join("missing.css"));

        assert!(matches!(result, Err(ArchiveError::Config(_))));
    }
}
