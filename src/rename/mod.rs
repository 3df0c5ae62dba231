//! # 重命名模块
//!
//! 重命名映射在整个流程中只计算一次，随后以只读方式同时交给
//! 重命名执行器和链接重写器，两者因此看到同一个文件名空间。
//!
//! # 模块组织
//!
//! - `loader` - `load.php` 资源包到固定文件名的映射
//! - `plan` - 扫描归档目录并生成重命名映射（不修改文件系统）
//! - `apply` - 按映射顺序执行文件移动

pub mod apply;
pub mod loader;
pub mod plan;

use std::path::{Path, PathBuf};

pub use apply::rename_files;
pub use loader::LoaderModule;
pub use plan::{find_files_to_be_renamed, RenamePlanner, CASE_COLLISION_OVERRIDES};

/// 重命名规则类别，按固定顺序应用
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenameCategory {
    /// 去掉文件名中的查询字符串
    QueryString,
    /// 将双引号替换为 `_q_`
    Quote,
    /// load.php 资源包
    Loader,
    /// 仅大小写不同的文件名的固定覆盖
    CaseCollision,
}

/// 一次计划中的重命名
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameEntry {
    pub directory: PathBuf,
    pub original_name: String,
    pub new_name: String,
    pub category: RenameCategory,
}

impl RenameEntry {
    pub fn source_path(&self) -> PathBuf {
        self.directory.join(&self.original_name)
    }

    pub fn destination_path(&self) -> PathBuf {
        self.directory.join(&self.new_name)
    }
}

/// 有序的重命名映射
///
/// 创建之后不再修改。链接重写时按顺序把每个条目当作子串替换，
/// 所以类别顺序是语义的一部分。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameMap {
    entries: Vec<RenameEntry>,
}

impl RenameMap {
    pub fn new(entries: Vec<RenameEntry>) -> Self {
        RenameMap { entries }
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, category: RenameCategory) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .count()
    }

    /// 查找某个目录下某个原始文件名的条目
    pub fn find(&self, directory: &Path, original_name: &str) -> Option<&RenameEntry> {
        self.entries
            .iter()
            .find(|entry| entry.directory == directory && entry.original_name == original_name)
    }

    /// 依次把每个原始文件名当作子串替换为新文件名
    ///
    /// 不区分路径片段：若某个原始文件名恰好是其他路径片段的子串，
    /// 那个片段同样会被替换。
    pub fn substitute(&self, target: &str) -> String {
        let mut target = target.to_string();
        for entry in &self.entries {
            if target.contains(&entry.original_name) {
                target = target.replace(&entry.original_name, &entry.new_name);
            }
        }
        target
    }
}

impl<'a> IntoIterator for &'a RenameMap {
    type Item = &'a RenameEntry;
    type IntoIter = std::slice::Iter<'a, RenameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
