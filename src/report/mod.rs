//! 报告处理模块
//!
//! 包含测量单元数据结构、报告文本解码和分块解析器。

pub mod decode;
pub mod parser;
pub mod unit;

// 重新导出公共接口
pub use decode::read_report_lines;
pub use parser::{ParseAnomaly, ParseOutcome, ReportParser};
pub use unit::{BoundingBox, MeasurementUnit, Point3D, SurfaceShape};
