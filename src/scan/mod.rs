//! 扫描编排模块
//!
//! 包含报告文件发现、下游结果接口和后台扫描协调器。

pub mod coordinator;
pub mod scanner;
pub mod sink;

// 重新导出公共接口
pub use coordinator::{
    CoordinatorHandle, LogLevel, ScanCoordinator, ScanEvent, ScanState,
};
pub use scanner::{discover_report_files, is_already_processed, result_artifact_path};
pub use sink::{ReadyNotifier, ReadySignal, ResultSink};
