//! 报告文本解码模块
//!
//! 字符编码自动探测由外部协作方承担，本模块只提供核心所需的解码边界：
//! 按UTF-8读取，非法字节序列以替换字符降级，文件不可读归为解码错误。

use crate::error::{ScanResult, decode_error};
use std::path::Path;

/// 读取报告文件并解码为行向量
pub fn read_report_lines(path: &Path) -> ScanResult<Vec<String>> {
    let bytes =
        std::fs::read(path).map_err(|e| decode_error("无法读取报告文件", e))?;

    let text = String::from_utf8_lossy(&bytes);
    Ok(text.lines().map(str::to_owned).collect())
}
