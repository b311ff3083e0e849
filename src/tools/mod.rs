//! 工具模块集合
//!
//! 包含CLI、CSV产物输出、控制台格式化等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod csv_report;
pub mod formatter;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, show_completion_info, show_startup_info};
pub use csv_report::{CsvRow, write_rows};
pub use formatter::{ConsoleSink, print_event, unit_summary_table};
