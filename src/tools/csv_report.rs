//! CSV结果产物输出
//!
//! 每个完整处理的报告文件写出一份同基名CSV：固定表头 + 按处理顺序
//! 每个有效单元一行。产物只在文件完整、未被取消时落盘；写入失败时
//! 尽力清除部分产物，使文件在下轮扫描中重试。

use crate::error::{ScanResult, persistence_error};
use crate::report::unit::MeasurementUnit;
use serde::Serialize;
use std::path::Path;

/// CSV结果行（表头取自字段名）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    pub filename: String,
    pub date: String,
    pub time: String,
    pub serial_number: String,
    pub location: String,
    pub shape: String,
    /// 平整度，4位小数
    pub flatness: f64,
}

impl CsvRow {
    /// 从已计算完成的单元构造结果行；平整度未填充时返回None
    pub fn from_unit(filename: &str, unit: &MeasurementUnit) -> Option<Self> {
        let flatness = unit.flatness?;
        Some(Self {
            filename: filename.to_string(),
            date: unit.date.clone(),
            time: unit.time.clone(),
            serial_number: unit.serial_number.clone(),
            location: unit.location.clone(),
            shape: unit.shape.to_string(),
            flatness,
        })
    }
}

/// 将结果行写为CSV产物
///
/// 先在内存中完成序列化，再一次性落盘；落盘失败时尽力删除残留文件。
pub fn write_rows(path: &Path, rows: &[CsvRow]) -> ScanResult<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // 空文件也要有表头，保证产物格式稳定
    if rows.is_empty() {
        writer
            .write_record([
                "filename",
                "date",
                "time",
                "serialNumber",
                "location",
                "shape",
                "flatness",
            ])
            .map_err(|e| persistence_error("CSV表头写入失败", e))?;
    }

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| persistence_error("CSV行序列化失败", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| persistence_error("CSV缓冲回收失败", e))?;

    if let Err(e) = std::fs::write(path, bytes) {
        // 不保留部分产物：产物缺失是"需要重新处理"的唯一依据
        let _ = std::fs::remove_file(path);
        return Err(persistence_error("CSV产物写入失败", e));
    }

    Ok(())
}
