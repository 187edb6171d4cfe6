use log::{debug, info};
use std::fs;
use std::path::Path;

use super::lock::StorageLock;
use super::report::UnpackSummary;
use super::storage::Storage;
use crate::error::{IoResultExt, PackError};
use crate::utils::{copy_tree, hash_driver_file};

/// 解包
///
/// 先把基线层复制到 `output_dir`，再用驱动文件哈希对应的增量层覆盖。
/// 存储目录中没有该哈希的层时返回 [`PackError::UnknownHash`]。
pub fn unpack(
    driver: &Path,
    storage_dir: &Path,
    output_dir: &Path,
) -> Result<UnpackSummary, PackError> {
    let hash = hash_driver_file(driver)?;
    let storage = Storage::new(storage_dir);

    let layer = storage.layer(&hash).ok_or_else(|| PackError::UnknownHash {
        hash,
        storage: storage_dir.to_path_buf(),
    })?;

    let _lock = StorageLock::shared(&storage)?;
    let base = storage.read_base()?;
    info!("解包 {:?} -> {:?} (哈希 {}, 基线 {})", storage_dir, output_dir, hash, base);

    fs::create_dir_all(output_dir).at(output_dir)?;

    let base_dir = storage.layer_dir(&base);
    let base_files = copy_tree(&base_dir, output_dir)?;

    let delta_files = if hash == base {
        debug!("哈希与基线相同，跳过增量层");
        0
    } else {
        copy_tree(&layer.path, output_dir)?
    };

    let summary = UnpackSummary {
        hash,
        base,
        base_files,
        delta_files,
    };
    info!("解包完成: {}", summary.summary());
    Ok(summary)
}
