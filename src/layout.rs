//! 归档目录整理
//!
//! 镜像工具按域名保存站点：
//!
//! ```text
//! {root}/en.cppreference.com/w/       : html
//! {root}/en.cppreference.com/mwiki/   : data
//! {root}/en.cppreference.com/         : data
//! {root}/upload.cppreference.com/mwiki/ : data
//! ```
//!
//! 整理之后：
//!
//! ```text
//! {root}/common/ : 所有语言共享的数据
//! {root}/en/     : en 的 html
//! ```

use std::fs;
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{ArchiveError, ArchiveResult, IoResultExt};

/// 共享资源目录名
pub const COMMON_DIR: &str = "common";

/// 每种语言目录下需要复制到共享目录的字体
pub const FONT_FILES: &[&str] = &[
    "DejaVuSansMonoCondensed60.ttf",
    "DejaVuSansMonoCondensed75.ttf",
];

/// 目录存在时删除整个目录
pub fn remove_dir_if_exists(dir: &Path) -> ArchiveResult<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).at_path(dir)?;
    }
    Ok(())
}

/// 递归复制目录树
///
/// 符号链接按其指向的内容复制。
pub fn copy_tree(src: &Path, dst: &Path) -> ArchiveResult<()> {
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            ArchiveError::io(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| ArchiveError::Layout(e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).at_path(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).at_path(&target)?;
        } else {
            warn!("Not copying special file {}", entry.path().display());
        }
    }

    Ok(())
}

/// 把 `src_dir` 下的每一项移动到 `dst_dir`
pub fn move_dir_contents_to_dir(src_dir: &Path, dst_dir: &Path) -> ArchiveResult<()> {
    for entry in fs::read_dir(src_dir).at_path(src_dir)? {
        let entry = entry.at_path(src_dir)?;
        let target = dst_dir.join(entry.file_name());

        if target.is_dir() && entry.path().is_dir() {
            // 两边都有的目录逐层合并
            move_dir_contents_to_dir(&entry.path(), &target)?;
            fs::remove_dir(entry.path()).at_path(entry.path())?;
        } else {
            fs::rename(entry.path(), &target).at_path(entry.path())?;
        }
    }

    Ok(())
}

/// 将镜像目录整理为 `common/` 加每种语言一个目录
pub fn rearrange_archive(root: &Path, languages: &[String], domain: &str) -> ArchiveResult<()> {
    let data_path = root.join(COMMON_DIR);
    remove_dir_if_exists(&data_path)?;

    let upload_path = root.join(format!("upload.{domain}"));
    let upload_data_path = upload_path.join("mwiki");
    if !upload_data_path.is_dir() {
        return Err(ArchiveError::Layout(format!(
            "shared upload tree {} not found",
            upload_data_path.display()
        )));
    }
    fs::rename(&upload_data_path, &data_path).at_path(&upload_data_path)?;
    fs::remove_dir_all(&upload_path).at_path(&upload_path)?;

    for lang in languages {
        let path = root.join(format!("{lang}.{domain}"));
        let src_html_path = path.join("w");
        let src_data_path = path.join("mwiki");
        let html_path = root.join(lang);

        if src_html_path.is_dir() {
            fs::rename(&src_html_path, &html_path).at_path(&src_html_path)?;
        } else {
            warn!("No html tree for language {} at {}", lang, src_html_path.display());
        }

        if src_data_path.is_dir() {
            // 各语言的皮肤文件相同，可以直接合并
            move_dir_contents_to_dir(&src_data_path, &data_path)?;
        }

        for font in FONT_FILES {
            let font_path = path.join(font);
            if !font_path.is_file() {
                return Err(ArchiveError::Layout(format!(
                    "font {} not found",
                    font_path.display()
                )));
            }
            fs::copy(&font_path, data_path.join(font)).at_path(&font_path)?;
        }

        remove_dir_if_exists(&path)?;
        info!("Rearranged language {}", lang);
    }

    Ok(())
}
