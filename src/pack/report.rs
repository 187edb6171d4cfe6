use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::{DriverHash, FileInfo};

/// 一次打包的结果
#[derive(Debug, Clone, Serialize)]
pub struct PackSummary {
    pub hash: DriverHash,
    pub base: DriverHash,
    pub scanned: usize,
    pub written: usize,
    pub unchanged: usize,
    pub bytes_written: u64,
}

impl PackSummary {
    pub fn new(hash: DriverHash, base: DriverHash) -> Self {
        Self {
            hash,
            base,
            scanned: 0,
            written: 0,
            unchanged: 0,
            bytes_written: 0,
        }
    }

    pub fn is_base(&self) -> bool {
        self.hash == self.base
    }

    pub fn summary(&self) -> String {
        format!(
            "扫描: {} 个文件, 写入: {} 个文件 ({} 字节), 未变化: {} 个文件",
            self.scanned, self.written, self.bytes_written, self.unchanged
        )
    }
}

/// 一次解包的结果
#[derive(Debug, Clone, Serialize)]
pub struct UnpackSummary {
    pub hash: DriverHash,
    pub base: DriverHash,
    pub base_files: usize,
    pub delta_files: usize,
}

impl UnpackSummary {
    pub fn summary(&self) -> String {
        format!(
            "基线层: {} 个文件, 增量层: {} 个文件",
            self.base_files, self.delta_files
        )
    }
}

/// 层目录信息
#[derive(Debug, Clone, Serialize)]
pub struct LayerReport {
    pub hash: DriverHash,
    pub is_base: bool,
    pub file_count: usize,
    pub total_bytes: u64,
    pub files: BTreeMap<String, FileInfo>,
}

/// 驱动文件当前内容的打包状态
#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub hash: DriverHash,
    pub packed: bool,
}

/// 存储目录概况
#[derive(Debug, Clone, Serialize)]
pub struct StorageReport {
    pub storage: String,
    pub base: Option<DriverHash>,
    pub layers: Vec<LayerReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverReport>,
}

impl StorageReport {
    pub fn layer(&self, hash: &DriverHash) -> Option<&LayerReport> {
        self.layers.iter().find(|l| &l.hash == hash)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// 以纯文本显示，`with_files` 为真时列出每个文件
    pub fn display(&self, with_files: bool) -> ReportDisplay<'_> {
        ReportDisplay {
            report: self,
            with_files,
        }
    }
}

pub struct ReportDisplay<'a> {
    report: &'a StorageReport,
    with_files: bool,
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "存储目录: {}", report.storage)?;
        match &report.base {
            Some(base) => writeln!(f, "基线: {}", base)?,
            None => writeln!(f, "基线: (无)")?,
        }
        writeln!(f)?;

        writeln!(f, "=== 层 ({}) ===", report.layers.len())?;
        for layer in &report.layers {
            let tag = if layer.is_base { " [基线]" } else { "" };
            writeln!(
                f,
                "  {}{}  {} 个文件, {} 字节",
                layer.hash, tag, layer.file_count, layer.total_bytes
            )?;
            if self.with_files {
                for (path, info) in &layer.files {
                    writeln!(f, "    {}  {:>10}  {}", info.hash, info.fsize, path)?;
                }
            }
        }

        if let Some(driver) = &report.driver {
            writeln!(f)?;
            let state = if driver.packed { "已打包" } else { "未打包" };
            writeln!(f, "驱动文件: {} ({})", driver.hash, state)?;
        }
        Ok(())
    }
}
