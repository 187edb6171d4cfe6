use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::DriverHash;

/// 打包 / 解包过程中的错误
#[derive(Debug, Error)]
pub enum PackError {
    /// 存储目录中没有与驱动文件当前内容对应的层
    #[error("存储目录 {storage:?} 中不存在哈希 {hash} 对应的层")]
    UnknownHash { hash: DriverHash, storage: PathBuf },

    /// 读写文件失败，附带出错路径
    #[error("I/O 错误 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PackError {
    pub fn is_unknown_hash(&self) -> bool {
        matches!(self, PackError::UnknownHash { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PackError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn from_walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        PackError::io(path, err.into())
    }
}

/// 为 `io::Result` 附加路径信息
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, PackError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, PackError> {
        self.map_err(|e| PackError::io(path, e))
    }
}
