use std::collections::BTreeMap;
use std::path::Path;

use super::lock::StorageLock;
use super::report::{DriverReport, LayerReport, StorageReport};
use super::storage::Storage;
use crate::error::PackError;
use crate::utils::{hash_driver_file, is_temp_file, scan_directory};

/// 汇总存储目录的内容
///
/// 给出 `driver` 时额外报告其哈希以及是否已经打包。
pub fn inspect_storage(
    storage_dir: &Path,
    driver: Option<&Path>,
) -> Result<StorageReport, PackError> {
    let storage = Storage::new(storage_dir);
    let _lock = StorageLock::shared(&storage)?;

    let base = if storage.base_path().exists() {
        Some(storage.read_base()?)
    } else {
        None
    };

    let mut layers = Vec::new();
    for layer in storage.layers()? {
        let files: BTreeMap<String, _> = scan_directory(&layer.path)?
            .into_iter()
            .filter(|(path, _)| !is_temp_file(path))
            .map(|(path, info)| (path.to_string_lossy().replace('\\', "/"), info))
            .collect();

        layers.push(LayerReport {
            hash: layer.hash,
            is_base: Some(layer.hash) == base,
            file_count: files.len(),
            total_bytes: files.values().map(|info| info.fsize).sum(),
            files,
        });
    }

    let driver = match driver {
        Some(path) => {
            let hash = hash_driver_file(path)?;
            Some(DriverReport {
                hash,
                packed: storage.layer(&hash).is_some(),
            })
        }
        None => None,
    };

    Ok(StorageReport {
        storage: storage_dir.display().to_string(),
        base,
        layers,
        driver,
    })
}
