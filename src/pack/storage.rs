use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, PackError};
use crate::utils::{DriverHash, write_file_atomic};

/// 记录基线哈希的文件名
pub const BASE_FILE_NAME: &str = "base";

/// 存储目录：`base` 文件加上若干以驱动哈希命名的层目录
///
/// 不缓存任何状态，每次查询都直接访问文件系统。
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

/// 一个以驱动哈希命名的层目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub hash: DriverHash,
    pub path: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_path(&self) -> PathBuf {
        self.root.join(BASE_FILE_NAME)
    }

    /// 层目录路径（不保证存在）
    pub fn layer_dir(&self, hash: &DriverHash) -> PathBuf {
        self.root.join(hash.to_hex())
    }

    /// 查找哈希对应的层，目录不存在时返回 `None`
    pub fn layer(&self, hash: &DriverHash) -> Option<Layer> {
        let path = self.layer_dir(hash);
        path.is_dir().then(|| Layer { hash: *hash, path })
    }

    /// 读取基线哈希
    ///
    /// `base` 不存在或内容不是合法哈希时返回 I/O 错误。
    pub fn read_base(&self) -> Result<DriverHash, PackError> {
        let path = self.base_path();
        let content = fs::read_to_string(&path).at(&path)?;
        parse_base(&path, &content)
    }

    /// 读取基线哈希；若 `base` 尚不存在，则以 `hash` 作为基线写入
    pub fn establish_base(&self, hash: &DriverHash) -> Result<DriverHash, PackError> {
        let path = self.base_path();
        match fs::read_to_string(&path) {
            Ok(content) => parse_base(&path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{:?} 不存在，以 {} 作为基线", path, hash);
                write_file_atomic(&path, hash.to_hex().as_bytes())?;
                Ok(*hash)
            }
            Err(e) => Err(PackError::io(path, e)),
        }
    }

    /// 列出所有层，按哈希排序
    ///
    /// 存储根目录中名字不是哈希的条目会被忽略。
    pub fn layers(&self) -> Result<Vec<Layer>, PackError> {
        let mut layers = Vec::new();

        for entry in fs::read_dir(&self.root).at(&self.root)? {
            let entry = entry.at(&self.root)?;
            let path = entry.path();
            let file_type = entry.file_type().at(&path)?;
            let name = entry.file_name();

            match name.to_str().and_then(|n| n.parse::<DriverHash>().ok()) {
                Some(hash) if file_type.is_dir() => layers.push(Layer { hash, path }),
                _ if name == BASE_FILE_NAME || name == super::lock::LOCK_FILE_NAME => {}
                _ => warn!("忽略存储目录中的未知条目: {:?}", path),
            }
        }

        layers.sort_by(|a, b| a.hash.cmp(&b.hash));
        Ok(layers)
    }
}

fn parse_base(path: &Path, content: &str) -> Result<DriverHash, PackError> {
    content.trim().parse().map_err(|e| {
        PackError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("base 文件内容不是合法的哈希: {}", e),
            ),
        )
    })
}
