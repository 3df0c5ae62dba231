//! 预处理流程
//!
//! 一次完整运行按固定顺序执行：复制镜像、整理目录、规划重命名、
//! 执行重命名、重写 HTML 链接、处理样式表。除 HTML 重写之外各步骤
//! 都是顺序执行的；重写阶段每个文件独立处理，可以并行。

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use rayon::prelude::*;
use tracing::info;

use crate::error::{ArchiveError, ArchiveResult};
use crate::layout::{copy_tree, rearrange_archive, remove_dir_if_exists};
use crate::parsers::css::finish_stylesheets;
use crate::parsers::html::rules::default_rules;
use crate::parsers::link_rewriter::{
    find_html_files, preprocess_html_file, LinkFixer, DEFAULT_DOMAIN,
};
use crate::rename::{rename_files, RenamePlanner};

/// 默认补充样式表路径
pub const DEFAULT_CSS_SUPPLEMENT: &str = "preprocess-css.css";

/// 默认文档编码
pub const DEFAULT_ENCODING: &str = "utf-8";

/// 预处理选项
#[derive(Clone, Debug)]
pub struct ArchiveOptions {
    /// 原始镜像目录
    pub src: PathBuf,
    /// 输出目录，运行前会被清空
    pub dst: PathBuf,
    pub languages: Vec<String>,
    pub domain: String,
    pub css_supplement: PathBuf,
    /// 链接重写的线程数，`None` 表示使用全部核心
    pub jobs: Option<usize>,
    /// HTML 文档的读写编码
    pub encoding: String,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        ArchiveOptions {
            src: PathBuf::from("reference"),
            dst: PathBuf::from("output/reference"),
            languages: vec!["en".to_string()],
            domain: DEFAULT_DOMAIN.to_string(),
            css_supplement: PathBuf::from(DEFAULT_CSS_SUPPLEMENT),
            jobs: None,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

/// 一次运行的统计
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub renames_planned: usize,
    pub renames_skipped: usize,
    pub documents_processed: usize,
    pub parser_warnings: usize,
    pub stylesheets_finished: usize,
}

/// 执行完整的预处理流程
pub fn preprocess_archive(options: &ArchiveOptions) -> ArchiveResult<RunSummary> {
    validate_options(options)?;

    let root = options.dst.as_path();
    info!("Copying {} to {}", options.src.display(), root.display());
    remove_dir_if_exists(root)?;
    copy_tree(&options.src, root)?;

    rearrange_archive(root, &options.languages, &options.domain)?;

    let mut planner = RenamePlanner::scan(root)?;
    let rename_map = planner.plan()?;
    info!("Planned {} renames", rename_map.len());

    rename_files(&rename_map)?;

    let html_files = find_html_files(root)?;
    info!("Preprocessing {} html files", html_files.len());
    let fixer = LinkFixer::new(&rename_map, &options.domain);
    let parser_warnings = rewrite_documents(&html_files, &fixer, options)?;

    let stylesheets_finished = finish_stylesheets(root, &options.css_supplement)?;

    Ok(RunSummary {
        renames_planned: rename_map.len(),
        renames_skipped: planner.skipped(),
        documents_processed: html_files.len(),
        parser_warnings,
        stylesheets_finished,
    })
}

/// 在线程池中逐个处理 HTML 文件，返回警告总数
fn rewrite_documents(
    html_files: &[PathBuf],
    fixer: &LinkFixer,
    options: &ArchiveOptions,
) -> ArchiveResult<usize> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .build()
        .map_err(|e| ArchiveError::Config(format!("cannot start worker pool: {e}")))?;

    let rules = default_rules();
    let warnings: Vec<usize> = pool.install(|| {
        html_files
            .par_iter()
            .map(|path| preprocess_html_file(path, &rules, fixer, &options.encoding))
            .collect::<ArchiveResult<Vec<usize>>>()
    })?;

    Ok(warnings.into_iter().sum())
}

/// 在修改任何文件之前检查选项
pub fn validate_options(options: &ArchiveOptions) -> ArchiveResult<()> {
    if !options.src.is_dir() {
        return Err(ArchiveError::Config(format!(
            "source directory {} does not exist",
            options.src.display()
        )));
    }

    if same_directory(&options.src, &options.dst) {
        return Err(ArchiveError::Config(
            "source and destination directories must differ".to_string(),
        ));
    }

    if options.dst.starts_with(&options.src) || options.src.starts_with(&options.dst) {
        return Err(ArchiveError::Config(format!(
            "{} and {} must not contain each other",
            options.src.display(),
            options.dst.display()
        )));
    }

    if options.languages.is_empty() {
        return Err(ArchiveError::Config(
            "at least one language is required".to_string(),
        ));
    }

    if options.jobs == Some(0) {
        return Err(ArchiveError::Config("--jobs must be at least 1".to_string()));
    }

    if Encoding::for_label_no_replacement(options.encoding.as_bytes()).is_none() {
        return Err(ArchiveError::UnknownEncoding(options.encoding.clone()));
    }

    if !options.css_supplement.is_file() {
        return Err(ArchiveError::Config(format!(
            "supplemental stylesheet {} not found",
            options.css_supplement.display()
        )));
    }

    Ok(())
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_for(dir: &Path) -> ArchiveOptions {
        ArchiveOptions {
            src: dir.join("reference"),
            dst: dir.join("output"),
            ..ArchiveOptions::default()
        }
    }

    #[test]
    fn test_default_options() {
        let options = ArchiveOptions::default();
        assert_eq!(options.languages, vec!["en".to_string()]);
        assert_eq!(options.domain, "cppreference.com");
        assert_eq!(options.encoding, "utf-8");
        assert_eq!(options.jobs, None);
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = preprocess_archive(&options_for(dir.path()));

        assert!(matches!(result, Err(ArchiveError::Config(_))));
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_same_source_and_destination() {
        let dir = tempfile::tempdir().unwrap();
        let options = ArchiveOptions {
            src: dir.path().to_path_buf(),
            dst: dir.path().to_path_buf(),
            ..ArchiveOptions::default()
        };

        assert!(matches!(validate_options(&options), Err(ArchiveError::Config(_))));
    }

    #[test]
    fn test_nested_destination_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = ArchiveOptions {
            src: dir.path().to_path_buf(),
            dst: dir.path().join("out"),
            ..ArchiveOptions::default()
        };

        assert!(matches!(validate_options(&options), Err(ArchiveError::Config(_))));
    }

    #[test]
    fn test_unknown_encoding() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("reference")).unwrap();
        let options = ArchiveOptions {
            encoding: "no-such-charset".to_string(),
            ..options_for(dir.path())
        };

        assert!(matches!(
            validate_options(&options),
            Err(ArchiveError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("reference")).unwrap();
        let options = ArchiveOptions {
            jobs: Some(0),
            ..options_for(dir.path())
        };

        assert!(matches!(validate_options(&options), Err(ArchiveError::Config(_))));
    }
}
