//! 执行重命名映射

use std::fs;

use tracing::debug;

use crate::error::{ArchiveError, ArchiveResult, IoResultExt};

use super::RenameMap;

/// 按映射顺序逐个移动文件
///
/// 目标已存在时只有在内容完全相同的情况下才会覆盖，否则立即中止，
/// 已经完成的移动不会回滚。
pub fn rename_files(rename_map: &RenameMap) -> ArchiveResult<()> {
    for entry in rename_map {
        let source = entry.source_path();
        let destination = entry.destination_path();

        if destination.exists() {
            let source_data = fs::read(&source).at_path(&source)?;
            let destination_data = fs::read(&destination).at_path(&destination)?;

            if source_data != destination_data {
                return Err(ArchiveError::RenameCollision {
                    from: source,
                    to: destination,
                });
            }

            debug!(
                "{} already exists with identical content",
                destination.display()
            );
        }

        fs::rename(&source, &destination).at_path(&source)?;
    }

    Ok(())
}
