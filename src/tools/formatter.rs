//! 控制台输出格式化模块
//!
//! 负责事件流的带时间戳渲染，以及默认下游`ConsoleSink`的单元概要
//! 输出。3D/等高线渲染属于外部协作方，这里只做文本呈现。

use crate::report::unit::MeasurementUnit;
use crate::scan::coordinator::{LogLevel, ScanEvent};
use crate::scan::sink::{ReadyNotifier, ResultSink};
use comfy_table::Table;
use std::path::Path;

/// 渲染一条扫描事件为带时间戳的控制台行
pub fn print_event(event: &ScanEvent) {
    let timestamp = chrono::Local::now().format("%H:%M:%S");
    match event.level {
        LogLevel::Info => println!("{timestamp} [INFO] {}", event.message),
        LogLevel::Warn => println!("{timestamp} [WARN] {}", event.message),
        LogLevel::Error => eprintln!("{timestamp} [ERROR] {}", event.message),
    }
}

/// 生成单元概要表（verbose模式下逐单元输出）
pub fn unit_summary_table(base_name: &str, unit: &MeasurementUnit) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "报告 / Report",
        "序列号 / Serial",
        "位置 / Location",
        "形貌 / Shape",
        "平整度 / Flatness",
        "点数 / Points",
    ]);
    table.add_row(vec![
        base_name.to_string(),
        unit.serial_number.clone(),
        unit.location.clone(),
        format!("{} ({})", unit.shape.display_name(), unit.shape),
        unit.flatness
            .map(|f| format!("{f:.4}"))
            .unwrap_or_else(|| "-".to_string()),
        unit.points.len().to_string(),
    ]);
    table.to_string()
}

/// 默认下游：把每个单元渲染到控制台并立即回执就绪
pub struct ConsoleSink {
    notifier: ReadyNotifier,
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(notifier: ReadyNotifier, verbose: bool) -> Self {
        Self { notifier, verbose }
    }
}

impl ResultSink for ConsoleSink {
    fn emit(&mut self, _directory: &Path, base_name: &str, unit: &MeasurementUnit) {
        if self.verbose {
            println!("{}", unit_summary_table(base_name, unit));
        } else {
            println!(
                "   [UNIT] {base_name} serial={} location={} shape={} flatness={}",
                unit.serial_number,
                unit.location,
                unit.shape,
                unit.flatness
                    .map(|f| format!("{f:.4}"))
                    .unwrap_or_else(|| "-".to_string()),
            );
        }

        self.notifier.ready();
    }
}
