use log::{debug, info};
use std::fs;
use std::path::Path;

use super::lock::StorageLock;
use super::report::PackSummary;
use super::storage::Storage;
use crate::error::{IoResultExt, PackError};
use crate::utils::{copy_file_atomic, files_equal, hash_driver_file, walk_files};

/// 打包
///
/// 第一次调用时以驱动文件的哈希作为基线，把 `source_dir` 完整复制到
/// `storage_dir/<hash>/`，并写入 `storage_dir/base`。之后哈希不同的调用只把
/// 与基线不同（新增或修改）的文件复制到 `storage_dir/<hash>/`。
///
/// 在基线之后被删除的文件不会被记录，解包时会从基线层恢复。
pub fn pack(
    driver: &Path,
    source_dir: &Path,
    storage_dir: &Path,
) -> Result<PackSummary, PackError> {
    let hash = hash_driver_file(driver)?;
    let storage = Storage::new(storage_dir);
    fs::create_dir_all(storage.root()).at(storage.root())?;

    let _lock = StorageLock::exclusive(&storage)?;
    let base = storage.establish_base(&hash)?;
    info!("打包 {:?} -> {:?} (哈希 {}, 基线 {})", source_dir, storage_dir, hash, base);

    let layer_dir = storage.layer_dir(&hash);
    let base_dir = storage.layer_dir(&base);
    fs::create_dir_all(&layer_dir).at(&layer_dir)?;

    let mut summary = PackSummary::new(hash, base);

    for relative_path in walk_files(source_dir)? {
        let source = source_dir.join(&relative_path);
        let dest = layer_dir.join(&relative_path);
        summary.scanned += 1;

        if files_equal(&source, &base_dir.join(&relative_path))? {
            debug!("  = {}", relative_path.display());
            summary.unchanged += 1;
            continue;
        }
        if hash != base && files_equal(&source, &dest)? {
            debug!("  = {} (已在增量层中)", relative_path.display());
            summary.unchanged += 1;
            continue;
        }

        summary.bytes_written += copy_file_atomic(&source, &dest)?;
        summary.written += 1;
        debug!("  + {}", relative_path.display());
    }

    info!("打包完成: {}", summary.summary());
    Ok(summary)
}
