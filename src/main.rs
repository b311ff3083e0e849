//! FlatScan - 主程序入口
//!
//! 纯流程控制器：解析参数、装配配置与协调器，驱动交互命令循环。
//! stdin命令对应协调器的resume/stop/updateConfig/terminate。

use anyhow::Context;
use flatscan_tool::{ScanConfig, ScanCoordinator, ScanState};
use flatscan_tool::scan::sink::ReadySignal;
use flatscan_tool::tools::{self, ConsoleSink};
use std::io::BufRead;
use std::path::PathBuf;
use std::process;

/// 应用程序主逻辑（便于测试和复用）
fn run() -> anyhow::Result<()> {
    // 1. 解析命令行参数
    let app = tools::parse_args();

    // 2. 装配配置快照：文件 → 默认值 → 命令行覆盖
    let mut config = match &app.config_path {
        Some(path) if path.exists() => ScanConfig::load(path)
            .with_context(|| format!("加载配置文件失败: {}", path.display()))?,
        _ => ScanConfig::default(),
    };
    app.apply_overrides(&mut config);
    config.validate().context("配置校验失败")?;

    tools::show_startup_info(&config);

    // 3. 装配下游与事件流，启动后台协调器
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let (notifier, ready_rx) = ReadySignal::channel();
    let sink = Box::new(ConsoleSink::new(notifier, app.verbose));

    let handle = ScanCoordinator::spawn(config.clone(), sink, ready_rx, events_tx)
        .context("启动扫描工作线程失败")?;

    // 事件打印线程：工作线程退出、事件发送端关闭后自然结束
    let printer = std::thread::spawn(move || {
        for event in events_rx {
            tools::print_event(&event);
        }
    });

    if !config.auto_start {
        println!("输入 start 开始扫描 / Type `start` to begin scanning");
    }

    // 4. 交互命令循环（stdin关闭即退出）
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("读取命令失败")?;
        let command = line.trim();

        match command {
            "" => {}
            "start" => handle.resume(),
            "stop" => handle.stop(),
            "status" => {
                let state = handle.state();
                println!("状态 / State: {} ({state:?})", state.display_name());
            }
            "exit" | "quit" => break,
            _ if command.starts_with("dir ") => {
                let path = command["dir ".len()..].trim();
                if path.is_empty() {
                    println!("用法 / Usage: dir <path>");
                } else {
                    config.data_directory = PathBuf::from(path).to_string_lossy().to_string();
                    handle.update_config(config.clone());
                    println!("数据目录将切换为 / Data directory will switch to: {path}");
                }
            }
            _ => {
                println!("未知命令 / Unknown command: {command}");
                println!("可用命令 / Available: start | stop | dir <path> | status | exit");
            }
        }

        if handle.state() == ScanState::Terminated {
            break;
        }
    }

    // 5. 终止并等待工作线程排空，再退出进程
    handle.join();
    let _ = printer.join();

    // 6. 配置回存（带路径时）
    if let Some(path) = &app.config_path
        && let Err(e) = config.save(path)
    {
        eprintln!("[WARNING] 配置回存失败 / Failed to save config: {e}");
    }

    tools::show_completion_info();
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("[ERROR] 错误 / Error: {error:#}");
        process::exit(1);
    }
}
