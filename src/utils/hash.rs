use serde::{Serialize, Serializer};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::error::{IoResultExt, PackError};

pub type HashResult = String;

/// 驱动文件的哈希 (SHA-1, 160 位)，用作层目录名
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverHash([u8; 20]);

impl DriverHash {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// 小写十六进制表示，共 40 个字符
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for DriverHash {
    type Err = hex::FromHexError;

    /// 只接受 40 位小写十六进制字符串
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((index, c)) = s.char_indices().find(|(_, c)| c.is_ascii_uppercase()) {
            return Err(hex::FromHexError::InvalidHexCharacter { c, index });
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for DriverHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DriverHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DriverHash({})", self.to_hex())
    }
}

impl Serialize for DriverHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 规范化驱动文件内容：逐行去掉首尾空白后直接拼接
///
/// 行分隔符 `\n`、`\r\n`、`\r` 一视同仁，因此换行风格和缩进的变化不影响结果。
/// 除 Unicode 空白外，控制字符 `\x1c`..=`\x1f` 也按空白去除。
pub fn normalize_driver_text(text: &str) -> String {
    text.split(['\n', '\r']).map(trim_line).collect()
}

fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

/// 计算规范化文本的驱动哈希
pub fn hash_driver_text(text: &str) -> DriverHash {
    let digest = Sha1::digest(normalize_driver_text(text).as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest);
    DriverHash(bytes)
}

/// 计算驱动文件的哈希
pub fn hash_driver_file(path: &Path) -> Result<DriverHash, PackError> {
    let text = fs::read_to_string(path).at(path)?;
    Ok(hash_driver_text(&text))
}

/// 计算文件的 SHA256 校验和
pub fn compute_file_hash(path: &Path) -> Result<HashResult, PackError> {
    let file = File::open(path).at(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PackError::io(path, e)),
        };
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
