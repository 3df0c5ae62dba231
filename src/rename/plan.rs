//! 重命名计划
//!
//! 扫描工作目录，决定哪些文件必须改名才能在大小写不敏感或限制较多的
//! 文件系统上使用。这里只产生数据，不做任何文件移动。
//!
//! 四类规则按固定顺序应用：
//!
//! 1. 含 `?` 的文件名去掉第一个 `?` 及其后的内容（加载器文件除外）
//! 2. 含 `"` 的文件名把每个引号替换为 `_q_`
//! 3. `load.php?...` 加载器文件映射为固定文件名
//! 4. 仅大小写不同的文件名的固定覆盖
//!
//! 每一类都作用在前面各类改名之后的目录视图上，所以同一个文件可以
//! 先后命中多类规则，得到一串首尾相接的条目。

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ArchiveError, ArchiveResult};

use super::loader::{is_loader_file, LoaderModule};
use super::{RenameCategory, RenameEntry, RenameMap};

/// 仅大小写不同、会在大小写不敏感文件系统上互相覆盖的文件
///
/// 目录相对于归档根目录。
pub const CASE_COLLISION_OVERRIDES: &[(&str, &str, &str)] = &[
    ("en/cpp/numeric/math", "NAN.html", "NAN.2.html"),
    ("en/c/numeric/math", "NAN.html", "NAN.2.html"),
];

/// 引号的替换记号
pub const QUOTE_REPLACEMENT: &str = "_q_";

/// 重命名计划器
///
/// 持有归档目录的计划视图：每个目录下在已接受的改名之后应当存在的文件名。
pub struct RenamePlanner {
    root: PathBuf,
    tree: BTreeMap<PathBuf, BTreeSet<String>>,
    entries: Vec<RenameEntry>,
    skipped: usize,
}

impl RenamePlanner {
    /// 扫描 `root` 下的所有文件
    pub fn scan(root: &Path) -> ArchiveResult<Self> {
        let mut tree: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                ArchiveError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                warn!("Not planning non UTF-8 file name {}", entry.path().display());
                continue;
            };
            let directory = entry.path().parent().unwrap_or(root).to_path_buf();

            tree.entry(directory)
                .or_default()
                .insert(file_name.to_string());
        }

        Ok(Self::from_tree(root, tree))
    }

    /// 基于已知的目录视图构建计划器
    pub fn from_tree(root: &Path, tree: BTreeMap<PathBuf, BTreeSet<String>>) -> Self {
        RenamePlanner {
            root: root.to_path_buf(),
            tree,
            entries: Vec::new(),
            skipped: 0,
        }
    }

    /// 计划中因源文件不存在而被丢弃的候选数量
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// 按固定类别顺序生成重命名映射
    ///
    /// 出现无法识别的加载器文件时返回错误，此时尚未触碰文件系统。
    pub fn plan(&mut self) -> ArchiveResult<RenameMap> {
        self.entries.clear();
        self.skipped = 0;

        let query_files = self.candidates(|name| name.contains('?') && !is_loader_file(name));
        for (directory, name) in query_files {
            let new_name = strip_query_string(&name).to_string();
            self.add_entry(&directory, &name, &new_name, RenameCategory::QueryString);
        }

        let quoted_files = self.candidates(|name| name.contains('"'));
        for (directory, name) in quoted_files {
            let new_name = name.replace('"', QUOTE_REPLACEMENT);
            self.add_entry(&directory, &name, &new_name, RenameCategory::Quote);
        }

        let loader_files = self.candidates(is_loader_file);
        for (directory, name) in loader_files {
            let module = LoaderModule::classify(&name)?;
            self.add_entry(&directory, &name, module.file_name(), RenameCategory::Loader);
        }

        for (relative_dir, name, new_name) in CASE_COLLISION_OVERRIDES {
            let directory = self.root.join(relative_dir);
            self.add_entry(&directory, name, new_name, RenameCategory::CaseCollision);
        }

        self.audit_case_collisions();

        Ok(RenameMap::new(self.entries.clone()))
    }

    fn candidates<F>(&self, predicate: F) -> Vec<(PathBuf, String)>
    where
        F: Fn(&str) -> bool,
    {
        let mut found = Vec::new();
        for (directory, names) in &self.tree {
            for name in names.iter().filter(|name| predicate(name.as_str())) {
                found.push((directory.clone(), name.clone()));
            }
        }
        found
    }

    fn add_entry(
        &mut self,
        directory: &Path,
        original_name: &str,
        new_name: &str,
        category: RenameCategory,
    ) {
        let exists = self
            .tree
            .get(directory)
            .is_some_and(|names| names.contains(original_name));

        if !exists {
            warn!("Not renaming {}", directory.join(original_name).display());
            self.skipped += 1;
            return;
        }

        if let Some(names) = self.tree.get_mut(directory) {
            names.remove(original_name);
            names.insert(new_name.to_string());
        }

        debug!(
            "Planned rename in {}: {} -> {}",
            directory.display(),
            original_name,
            new_name
        );
        self.entries.push(RenameEntry {
            directory: directory.to_path_buf(),
            original_name: original_name.to_string(),
            new_name: new_name.to_string(),
            category,
        });
    }

    /// 报告改名之后仍然仅大小写不同的文件名
    fn audit_case_collisions(&self) {
        for (directory, names) in &self.tree {
            let mut by_lowercase: BTreeMap<String, Vec<&str>> = BTreeMap::new();
            for name in names {
                by_lowercase
                    .entry(name.to_lowercase())
                    .or_default()
                    .push(name);
            }

            for group in by_lowercase.values().filter(|group| group.len() > 1) {
                warn!(
                    "File names in {} collide on case-insensitive filesystems: {}",
                    directory.display(),
                    group.join(", ")
                );
            }
        }
    }
}

/// 删除第一个 `?` 及其后的全部内容
pub fn strip_query_string(file_name: &str) -> &str {
    match file_name.find('?') {
        Some(index) => &file_name[..index],
        None => file_name,
    }
}

/// 扫描 `root` 并生成重命名映射
pub fn find_files_to_be_renamed(root: &Path) -> ArchiveResult<RenameMap> {
    let mut planner = RenamePlanner::scan(root)?;
    planner.plan()
}
