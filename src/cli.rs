use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// 目录快照增量打包工具
#[derive(Parser)]
#[command(name = "dpk")]
#[command(about = "目录快照增量打包工具", long_about = None)]
pub struct Cli {
    /// 输出更多日志 (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 打包源目录到存储目录
    Pack {
        /// 驱动文件 (如 main.py)
        driver: PathBuf,
        /// 源目录
        source_dir: PathBuf,
        /// 存储目录
        storage_dir: PathBuf,
    },
    /// 从存储目录还原驱动文件当前内容对应的目录
    Unpack {
        /// 驱动文件
        driver: PathBuf,
        /// 存储目录
        storage_dir: PathBuf,
        /// 输出目录
        output_dir: PathBuf,
    },
    /// 显示驱动文件的哈希
    Hash {
        /// 驱动文件
        driver: PathBuf,
    },
    /// 显示存储目录内容
    Show {
        /// 存储目录
        storage_dir: PathBuf,
        /// 同时检查该驱动文件是否已打包
        #[arg(short, long)]
        driver: Option<PathBuf>,
        /// 列出每个层中的文件
        #[arg(short, long)]
        files: bool,
        /// 以 TOML 格式输出
        #[arg(long)]
        toml: bool,
    },
}

impl Cli {
    /// 日志默认级别
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
