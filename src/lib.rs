//! FlatScan 平整度报告分析工具
//!
//! 对三坐标测量机（CMM）导出的文本报告做批量平整度分析。
//!
//! ## 核心流程
//! - 分块解析报告，恢复每个位置标签下的探测点组（位置标签是点组的
//!   尾随footer，而不是前导header）
//! - 普通最小二乘拟合参考平面，点的z原地重投影为平面距离
//! - 按中心区/边缘区比较，分类为鼓包/凹陷/不平整
//! - 后台协调器循环发现未处理报告，逐单元下发并受下游就绪信号节流
//! - 每个完整处理的报告写出一份同基名CSV结果

pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod scan;
pub mod tools;

// 重新导出核心类型
pub use config::ScanConfig;
pub use core::flatness::{FittedPlane, compute_flatness, fit_plane};
pub use error::{ErrorCategory, ScanError, ScanResult};
pub use report::parser::{ParseAnomaly, ParseOutcome, ReportParser};
pub use report::unit::{BoundingBox, MeasurementUnit, Point3D, SurfaceShape};
pub use scan::coordinator::{
    CoordinatorHandle, LogLevel, ScanCoordinator, ScanEvent, ScanState,
};
pub use scan::sink::{ReadyNotifier, ReadySignal, ResultSink};
