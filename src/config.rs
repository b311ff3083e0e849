//! 扫描配置模块
//!
//! `ScanConfig`是一次扫描周期内不可变的配置快照：调用方整体持有、
//! 整体替换，协调器只在扫描周期或文件边界换入新快照，从不原地修改。
//! 持久化为平面JSON键值文档，缺失字段按默认值补齐。

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 扫描配置快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// 报告数据目录（递归扫描根）
    pub data_directory: String,

    /// 中心区归一化半宽，取值范围(0,1)
    pub central_zone_limit: f64,

    /// 下游3D渲染使用的RBF插值函数名（本核心不解释，仅透传）
    pub rbf_function: String,

    /// 下游渲染使用的色图名
    pub color_map: String,

    /// 下游渲染输出DPI
    #[serde(rename = "plotDPI")]
    pub plot_dpi: u32,

    /// 扫描周期间隔（秒），最小为1
    pub scan_interval_seconds: u64,

    /// 启动后是否自动进入Running状态
    pub auto_start: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            data_directory: ".".to_string(),
            central_zone_limit: 0.5,
            rbf_function: "thin_plate_spline".to_string(),
            color_map: "coolwarm".to_string(),
            plot_dpi: 120,
            scan_interval_seconds: 10,
            auto_start: false,
        }
    }
}

impl ScanConfig {
    /// 从JSON文件加载配置，缺失字段按默认值补齐
    pub fn load(path: &Path) -> ScanResult<Self> {
        let text = std::fs::read_to_string(path).map_err(ScanError::Io)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| ScanError::InvalidInput(format!("配置文件格式不合法: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置为平面JSON文档
    pub fn save(&self, path: &Path) -> ScanResult<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::InvalidInput(format!("配置序列化失败: {e}")))?;
        std::fs::write(path, text).map_err(ScanError::Io)
    }

    /// 校验配置字段范围
    pub fn validate(&self) -> ScanResult<()> {
        if !(self.central_zone_limit > 0.0 && self.central_zone_limit < 1.0) {
            return Err(ScanError::InvalidInput(format!(
                "centralZoneLimit({})必须在(0,1)区间内",
                self.central_zone_limit
            )));
        }

        if self.scan_interval_seconds < 1 {
            return Err(ScanError::InvalidInput(
                "scanIntervalSeconds必须至少为1秒".to_string(),
            ));
        }

        Ok(())
    }
}
