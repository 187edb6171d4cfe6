//! # Delta Pack
//!
//! 目录快照增量打包工具库
//!
//! ## 功能
//!
//! - 以驱动文件（如入口脚本）规范化内容的 SHA-1 作为快照版本号
//! - 第一次打包时完整保存源目录作为基线，之后只保存与基线不同的文件
//! - 解包时用基线层叠加增量层，逐字节还原打包时的目录
//!
//! ## 存储目录结构
//!
//! ```text
//! storage/
//!   base              # 基线哈希，40 位十六进制
//!   <hash>/           # 每次打包对应一个层目录
//!     path/to/file
//! ```
//!
//! ## 使用示例
//!
//! ```no_run
//! use delta_pack::{pack, unpack};
//! use std::path::Path;
//!
//! // 打包
//! pack(
//!     Path::new("main.py"),
//!     Path::new("target/MyApp"),
//!     Path::new("packed"),
//! ).unwrap();
//!
//! // 解包
//! unpack(
//!     Path::new("main.py"),
//!     Path::new("packed"),
//!     Path::new("unpacked"),
//! ).unwrap();
//! ```

pub mod cli;
pub mod error;
pub mod pack;
pub mod utils;

// 重新导出常用类型
pub use error::PackError;
pub use pack::{PackSummary, Storage, StorageReport, UnpackSummary};
pub use pack::{inspect_storage, pack, unpack};
pub use utils::{DriverHash, copy_tree, hash_driver_file};
