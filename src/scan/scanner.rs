//! 报告文件发现模块
//!
//! 负责递归扫描数据目录中的报告文件，并以同名CSV产物的存在与否
//! 判定文件是否已完成处理（幂等重扫的唯一依据）。

use crate::error::{ScanError, ScanResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 报告文件扩展名
const REPORT_EXTENSION: &str = "txt";
/// 结果产物扩展名
const RESULT_EXTENSION: &str = "csv";

/// 递归扫描目录中的报告文件
///
/// 文件系统的遍历顺序与平台相关，为保证扫描结果可复现，
/// 返回前按完整路径做字典序排序。
pub fn discover_report_files(dir: &Path) -> ScanResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ScanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", dir.display()),
        )));
    }

    if !dir.is_dir() {
        return Err(ScanError::InvalidInput(format!(
            "路径不是目录: {}",
            dir.display()
        )));
    }

    let mut report_files = Vec::new();

    // 不可读的子目录/条目跳过而不中断整轮发现
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(extension) = path.extension()
            && let Some(ext_str) = extension.to_str()
            && ext_str.eq_ignore_ascii_case(REPORT_EXTENSION)
        {
            report_files.push(path.to_path_buf());
        }
    }

    report_files.sort();

    Ok(report_files)
}

/// 报告对应的结果产物路径：同目录、同基名的CSV文件
pub fn result_artifact_path(report: &Path) -> PathBuf {
    report.with_extension(RESULT_EXTENSION)
}

/// 结果产物已存在的报告视为已完成，不再重复处理
pub fn is_already_processed(report: &Path) -> bool {
    result_artifact_path(report).exists()
}
