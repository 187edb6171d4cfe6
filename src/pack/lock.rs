use log::debug;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use super::storage::Storage;
use crate::error::{IoResultExt, PackError};

pub const LOCK_FILE_NAME: &str = ".lock";

/// 存储目录上的建议锁，随 drop 释放
///
/// 打包持有独占锁，解包持有共享锁。
pub struct StorageLock {
    path: PathBuf,
    file: File,
}

impl StorageLock {
    /// 阻塞直到获得独占锁
    pub fn exclusive(storage: &Storage) -> Result<Self, PackError> {
        let lock = Self::open(storage)?;
        lock.file.lock().at(&lock.path)?;
        debug!("已获取独占锁 {:?}", lock.path);
        Ok(lock)
    }

    /// 阻塞直到获得共享锁
    ///
    /// 只读打开锁文件，不会创建它。锁文件不存在或无权打开时（例如只读的安装目录）
    /// 不加锁，返回 `None`。
    pub fn shared(storage: &Storage) -> Result<Option<Self>, PackError> {
        let path = storage.root().join(LOCK_FILE_NAME);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound
                        | io::ErrorKind::PermissionDenied
                        | io::ErrorKind::ReadOnlyFilesystem
                ) =>
            {
                debug!("无法打开锁文件 {:?} ({}), 不加锁继续", path, e);
                return Ok(None);
            }
            Err(e) => return Err(PackError::io(path, e)),
        };
        file.lock_shared().at(&path)?;
        debug!("已获取共享锁 {:?}", path);
        Ok(Some(Self { path, file }))
    }

    fn open(storage: &Storage) -> Result<Self, PackError> {
        let path = storage.root().join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .at(&path)?;
        Ok(Self { path, file })
    }
}
