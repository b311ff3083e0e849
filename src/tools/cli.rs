//! 命令行接口模块
//!
//! 负责命令行参数解析、配置覆盖和程序信息展示。

use crate::config::ScanConfig;
use clap::{Arg, Command};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置（命令行层）
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据目录（覆盖配置文件中的dataDirectory）
    pub directory: Option<PathBuf>,

    /// 配置文件路径（JSON平面文档）
    pub config_path: Option<PathBuf>,

    /// 扫描间隔秒数覆盖
    pub interval: Option<u64>,

    /// 中心区阈值覆盖
    pub central_limit: Option<f64>,

    /// 启动后立即开始扫描
    pub auto_start: bool,

    /// 是否显示详细信息（逐单元概要表）
    pub verbose: bool,
}

impl AppConfig {
    /// 把命令行覆盖项合并进配置快照
    pub fn apply_overrides(&self, config: &mut ScanConfig) {
        if let Some(dir) = &self.directory {
            config.data_directory = dir.to_string_lossy().to_string();
        }
        if let Some(interval) = self.interval {
            config.scan_interval_seconds = interval;
        }
        if let Some(limit) = self.central_limit {
            config.central_zone_limit = limit;
        }
        if self.auto_start {
            config.auto_start = true;
        }
    }
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> AppConfig {
    let matches = Command::new("flatscan")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("FlatScan Team")
        .arg(
            Arg::new("DIRECTORY")
                .help("报告数据目录（递归扫描*.txt）。不指定时使用配置文件/默认值")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON配置文件路径（缺失字段按默认值补齐，退出时回存）")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .help("扫描周期间隔（秒，最小1）")
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("central-limit")
                .long("central-limit")
                .help("中心区归一化半宽，(0,1)区间")
                .value_name("RATIO")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("auto-start")
                .long("auto-start")
                .help("启动后立即开始扫描（等价于输入start命令）")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息（逐单元概要表）")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    AppConfig {
        directory: matches.get_one::<String>("DIRECTORY").map(PathBuf::from),
        config_path: matches.get_one::<String>("config").map(PathBuf::from),
        interval: matches.get_one::<u64>("interval").copied(),
        central_limit: matches.get_one::<f64>("central-limit").copied(),
        auto_start: matches.get_flag("auto-start"),
        verbose: matches.get_flag("verbose"),
    }
}

/// 显示程序启动信息
pub fn show_startup_info(config: &ScanConfig) {
    println!("🚀 FlatScan 平整度扫描工具 v{VERSION} 启动");
    println!("📝 {DESCRIPTION}");
    println!("📁 数据目录 / Data directory: {}", config.data_directory);
    println!(
        "⏱️  扫描间隔 / Scan interval: {}秒, 中心区阈值 / central zone limit: {}",
        config.scan_interval_seconds, config.central_zone_limit
    );
    println!("💡 命令 / Commands: start | stop | dir <path> | status | exit");
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info() {
    println!("✅ 扫描协调器已退出，所有任务处理完成！");
}
