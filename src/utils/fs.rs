use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::hash::{HashResult, compute_file_hash};
use crate::error::{IoResultExt, PackError};

const COMPARE_CHUNK: usize = 64 * 1024;

/// 写入存储目录时临时文件的前缀
pub const TEMP_PREFIX: &str = ".dpk-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub hash: HashResult,
    pub fsize: u64,
}

/// 递归列出目录下所有文件的相对路径（按文件名排序）
///
/// 指向文件的符号链接按普通文件处理，空目录不会出现在结果中。
pub fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, PackError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| PackError::from_walk(dir, e))?;
        let path = entry.path();
        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
        if !is_file {
            continue;
        }

        let relative_path = path
            .strip_prefix(dir)
            .map_err(|_| {
                PackError::io(
                    path,
                    io::Error::new(io::ErrorKind::InvalidInput, "无法获取相对路径"),
                )
            })?
            .to_path_buf();
        files.push(relative_path);
    }

    Ok(files)
}

/// 是否是被中断的写入留下的临时文件
pub fn is_temp_file(relative_path: &Path) -> bool {
    relative_path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(TEMP_PREFIX))
}

/// 列出层目录中的文件，跳过残留的临时文件
pub fn walk_layer_files(dir: &Path) -> Result<Vec<PathBuf>, PackError> {
    let mut files = walk_files(dir)?;
    files.retain(|path| {
        let keep = !is_temp_file(path);
        if !keep {
            debug!("跳过临时文件 {:?}", dir.join(path));
        }
        keep
    });
    Ok(files)
}

/// 获取目录下所有文件的相对路径和 SHA256
pub fn scan_directory(dir: &Path) -> Result<HashMap<PathBuf, FileInfo>, PackError> {
    let mut files = HashMap::new();

    for relative_path in walk_files(dir)? {
        let path = dir.join(&relative_path);
        let hash = compute_file_hash(&path)?;
        let fsize = fs::metadata(&path).at(&path)?.len();
        files.insert(relative_path, FileInfo { hash, fsize });
    }

    Ok(files)
}

/// 逐字节比较 `path` 与 `candidate`
///
/// `candidate` 不存在、不是普通文件或读取失败时视为不同；`path` 的读取错误向上传递。
pub fn files_equal(path: &Path, candidate: &Path) -> Result<bool, PackError> {
    let other = match File::open(candidate) {
        Ok(f) => f,
        Err(e) => {
            debug!("无法打开 {:?}: {}", candidate, e);
            return Ok(false);
        }
    };
    let file = File::open(path).at(path)?;
    let len = file.metadata().at(path)?.len();
    match other.metadata() {
        Ok(meta) if meta.is_file() && meta.len() == len => {}
        _ => return Ok(false),
    }

    let mut reader = BufReader::new(file);
    let mut other_reader = BufReader::new(other);
    let mut buffer = vec![0u8; COMPARE_CHUNK];
    let mut other_buffer = vec![0u8; COMPARE_CHUNK];

    loop {
        let n = read_full(&mut reader, &mut buffer).at(path)?;
        let m = match read_full(&mut other_reader, &mut other_buffer) {
            Ok(m) => m,
            Err(e) => {
                debug!("读取 {:?} 失败: {}", candidate, e);
                return Ok(false);
            }
        };
        if buffer[..n] != other_buffer[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// 读满缓冲区，除非遇到文件结尾
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// 将 `source` 复制到 `dest`：先写入同目录下的临时文件，再重命名到位
///
/// 返回写入的字节数。
pub fn copy_file_atomic(source: &Path, dest: &Path) -> Result<u64, PackError> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).at(parent)?;

    let mut input = File::open(source).at(source)?;
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .at(parent)?;
    let bytes = io::copy(&mut input, temp.as_file_mut()).at(temp.path())?;
    temp.as_file().sync_all().at(temp.path())?;
    temp.persist(dest).map_err(|e| PackError::io(dest, e.error))?;

    Ok(bytes)
}

/// 将字符串内容原子写入 `dest`
pub fn write_file_atomic(dest: &Path, contents: &[u8]) -> Result<(), PackError> {
    use std::io::Write;

    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).at(parent)?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .at(parent)?;
    temp.write_all(contents).at(temp.path())?;
    temp.as_file().sync_all().at(temp.path())?;
    temp.persist(dest).map_err(|e| PackError::io(dest, e.error))?;

    Ok(())
}

/// 递归复制层目录 `source_dir` 下的所有文件到 `dest_dir`，保留相对路径
///
/// 按需创建中间目录，已存在的同名文件会被覆盖，残留的临时文件不会被复制。
/// 返回复制的文件数。
pub fn copy_tree(source_dir: &Path, dest_dir: &Path) -> Result<usize, PackError> {
    let files = walk_layer_files(source_dir)?;

    for relative_path in &files {
        let source = source_dir.join(relative_path);
        let dest = dest_dir.join(relative_path);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::copy(&source, &dest).at(&dest)?;
        debug!("  > {}", relative_path.display());
    }

    Ok(files.len())
}
