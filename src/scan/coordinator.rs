//! 后台扫描协调器
//!
//! 单个专用工作线程循环执行"目录发现 → 解码 → 解析 → 平整度计算 →
//! 下发"的流水线，通过命令通道接受外部的resume/stop/terminate/
//! updateConfig指令。状态机只有三个状态：
//!
//! ```text
//! Idle ──resume──▶ Running ──stop──▶ Idle
//!   └───────────terminate──────────▶ Terminated（终态）
//! ```
//!
//! 跨线程共享仅限三样：状态标志（原子量）、配置快照（命令通道整体
//! 传递）、单槽位就绪信号。所有挂起点（空闲轮询、扫描间隔、下游
//! 确认等待）都以有界延迟响应stop/terminate，且不跨等待持有锁。

use crate::config::ScanConfig;
use crate::core::flatness::compute_flatness;
use crate::error::{ErrorCategory, ScanError, ScanResult};
use crate::report::decode::read_report_lines;
use crate::report::parser::ReportParser;
use crate::scan::scanner::{discover_report_files, is_already_processed, result_artifact_path};
use crate::scan::sink::ResultSink;
use crate::tools::csv_report::{self, CsvRow};
use crate::tools::utils;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// 空闲状态下命令轮询间隔
const IDLE_POLL: Duration = Duration::from_secs(1);
/// 扫描间隔的切片粒度（取消延迟上界约1秒）
const INTERVAL_SLICE: Duration = Duration::from_secs(1);
/// 下游就绪等待的轮询粒度
const ACK_POLL: Duration = Duration::from_millis(20);

/// 协调器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// 待命：等待resume命令
    Idle,
    /// 扫描中
    Running,
    /// 已终止（终态，不再扫描）
    Terminated,
}

impl ScanState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Terminated,
            _ => Self::Idle,
        }
    }

    /// 控制台显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "待命",
            Self::Running => "扫描中",
            Self::Terminated => "已终止",
        }
    }
}

/// 事件级别
///
/// 取消提示使用Warn，与失败类的Error区分开。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// 工作线程对外发布的状态/日志事件
#[derive(Debug, Clone)]
pub struct ScanEvent {
    pub level: LogLevel,
    pub message: String,
}

impl ScanEvent {
    fn info(message: String) -> Self {
        Self {
            level: LogLevel::Info,
            message,
        }
    }

    fn warn(message: String) -> Self {
        Self {
            level: LogLevel::Warn,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            level: LogLevel::Error,
            message,
        }
    }
}

/// 外部命令
enum Command {
    Resume,
    Stop,
    Terminate,
    UpdateConfig(Box<ScanConfig>),
}

/// 协调器的外部控制句柄
///
/// 命令均为异步投递：工作线程在下一个协作点应用，取消延迟有界
/// （空闲/间隔约1秒，下游等待约20毫秒）。
pub struct CoordinatorHandle {
    commands: Sender<Command>,
    state: Arc<AtomicU8>,
    worker: Option<JoinHandle<()>>,
}

impl CoordinatorHandle {
    /// Idle → Running；其他状态下无效果
    pub fn resume(&self) {
        let _ = self.commands.send(Command::Resume);
    }

    /// Running → Idle（可恢复，不丢弃进度语义：在处理中的文件被
    /// 放弃，留待下次扫描重试）
    pub fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
    }

    /// 任意状态 → Terminated（终态）
    pub fn terminate(&self) {
        let _ = self.commands.send(Command::Terminate);
    }

    /// 提交新的配置快照，在下一个扫描周期或文件边界生效
    pub fn update_config(&self, config: ScanConfig) {
        let _ = self.commands.send(Command::UpdateConfig(Box::new(config)));
    }

    /// 读取当前状态（允许一个协作周期的陈旧度）
    pub fn state(&self) -> ScanState {
        ScanState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// 终止并等待工作线程退出
    pub fn join(mut self) {
        let _ = self.commands.send(Command::Terminate);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// 扫描协调器构造器
pub struct ScanCoordinator;

impl ScanCoordinator {
    /// 启动后台工作线程并返回控制句柄
    ///
    /// `sink`为下游消费端，`ready`为其配套的就绪信号接收端，
    /// `events`承载工作线程的状态/日志事件流。
    pub fn spawn(
        config: ScanConfig,
        sink: Box<dyn ResultSink>,
        ready: Receiver<()>,
        events: Sender<ScanEvent>,
    ) -> ScanResult<CoordinatorHandle> {
        let (cmd_tx, cmd_rx) = unbounded();
        let state = Arc::new(AtomicU8::new(ScanState::Idle as u8));
        let worker_state = Arc::clone(&state);

        let worker = std::thread::Builder::new()
            .name("flatscan-worker".to_string())
            .spawn(move || {
                Worker {
                    config,
                    pending_config: None,
                    sink,
                    ready,
                    events,
                    commands: cmd_rx,
                    state: worker_state,
                }
                .run();
            })
            .map_err(ScanError::Io)?;

        Ok(CoordinatorHandle {
            commands: cmd_tx,
            state,
            worker: Some(worker),
        })
    }
}

/// 工作线程内部状态
struct Worker {
    /// 当前生效的配置快照
    config: ScanConfig,
    /// 文件处理中收到的配置更新，推迟到下一个边界生效
    pending_config: Option<ScanConfig>,
    sink: Box<dyn ResultSink>,
    ready: Receiver<()>,
    events: Sender<ScanEvent>,
    commands: Receiver<Command>,
    state: Arc<AtomicU8>,
}

impl Worker {
    fn run(mut self) {
        if self.config.auto_start {
            self.set_state(ScanState::Running);
            self.emit(ScanEvent::info(
                "自动开始后台平整度扫描 / Auto-starting background flatness scan".to_string(),
            ));
        }

        loop {
            match self.state() {
                ScanState::Terminated => break,
                ScanState::Idle => self.wait_while_idle(),
                ScanState::Running => self.run_scan_cycle(),
            }
        }

        self.emit(ScanEvent::warn(
            "扫描协调器已终止 / Scan coordinator terminated".to_string(),
        ));
    }

    fn state(&self) -> ScanState {
        ScanState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ScanState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn emit(&self, event: ScanEvent) {
        // 事件接收端退出不影响扫描本身
        let _ = self.events.send(event);
    }

    /// 应用一条命令；配置更新只入栈，等边界统一生效
    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Resume => {
                if self.state() == ScanState::Idle {
                    self.set_state(ScanState::Running);
                    self.emit(ScanEvent::info(
                        "恢复后台平整度扫描 / Resuming background flatness scan".to_string(),
                    ));
                }
            }
            Command::Stop => {
                if self.state() == ScanState::Running {
                    self.set_state(ScanState::Idle);
                    self.emit(ScanEvent::warn(
                        "停止后台平整度扫描 / Stopping background flatness scan".to_string(),
                    ));
                }
            }
            Command::Terminate => {
                self.set_state(ScanState::Terminated);
            }
            Command::UpdateConfig(config) => {
                self.pending_config = Some(*config);
            }
        }
    }

    /// 非阻塞处理积压命令
    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply_command(command);
        }
    }

    /// 周期/文件边界：换入挂起的配置快照（整体替换，从不原地修改）
    fn apply_pending_config(&mut self) {
        if let Some(config) = self.pending_config.take() {
            self.config = config;
            self.emit(ScanEvent::info(format!(
                "配置已更新，数据目录: {} / Config updated, data directory: {}",
                self.config.data_directory, self.config.data_directory
            )));
        }
    }

    /// 空闲：阻塞等命令，约1秒轮询一次，避免忙转
    fn wait_while_idle(&mut self) {
        match self.commands.recv_timeout(IDLE_POLL) {
            Ok(command) => {
                self.apply_command(command);
                self.drain_commands();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // 所有句柄已丢弃，视同terminate
                self.set_state(ScanState::Terminated);
            }
        }
    }

    /// 一轮完整扫描：发现 → 逐文件处理 → 间隔等待
    fn run_scan_cycle(&mut self) {
        self.apply_pending_config();

        let data_dir = std::path::PathBuf::from(&self.config.data_directory);
        let report_files = match discover_report_files(&data_dir) {
            Ok(files) => files,
            Err(e) => {
                self.emit(ScanEvent::error(format!(
                    "目录发现失败 / Discovery failed: {e}"
                )));
                self.wait_scan_interval();
                return;
            }
        };

        let pending: Vec<_> = report_files
            .iter()
            .filter(|path| !is_already_processed(path))
            .collect();

        if !pending.is_empty() {
            self.emit(ScanEvent::info(format!(
                "发现{}个待处理报告 / Found {} unprocessed report(s)",
                pending.len(),
                pending.len()
            )));
        }

        for path in report_files {
            self.drain_commands();
            if self.state() != ScanState::Running {
                return;
            }
            self.apply_pending_config();

            // 幂等重扫：已有结果产物的文件不再处理
            if is_already_processed(&path) {
                continue;
            }

            self.process_report_file(&path);

            if self.state() != ScanState::Running {
                return;
            }
        }

        self.wait_scan_interval();
    }

    /// 处理单个报告文件
    ///
    /// 所有失败都在此边界转化为事件：解码失败跳过文件，单元级失败
    /// 只丢该单元，写入失败不留部分产物（留待下轮重试）。扫描被
    /// 取消时放弃整个文件，同样不写产物。
    fn process_report_file(&mut self, path: &Path) {
        let file_name = utils::extract_filename_lossy(path);

        let lines = match read_report_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                self.emit(ScanEvent::error(format!(
                    "{file_name}: [{}] {e} / decode failed, skipping file",
                    ErrorCategory::from_scan_error(&e).display_name()
                )));
                return;
            }
        };

        let outcome = ReportParser.parse(&lines);

        for anomaly in &outcome.anomalies {
            self.emit(ScanEvent::error(format!(
                "{file_name}: 单元校验失败 serial={} location={} / unit validation failed",
                anomaly.serial_number, anomaly.location
            )));
        }

        if outcome.units.is_empty() {
            self.emit(ScanEvent::info(format!(
                "{file_name}: 未发现有效测量单元，跳过 / no measurement units, skipping"
            )));
            return;
        }

        let directory = utils::get_parent_dir(path);
        let base_name = utils::extract_file_stem(path);
        let mut rows: Vec<CsvRow> = Vec::with_capacity(outcome.units.len());

        for mut unit in outcome.units {
            match compute_flatness(&mut unit, self.config.central_zone_limit) {
                Ok(()) => {}
                Err(e) => {
                    self.emit(ScanEvent::error(format!(
                        "{file_name}: [{}] location={} {e} / unit dropped",
                        ErrorCategory::from_scan_error(&e).display_name(),
                        unit.location
                    )));
                    continue;
                }
            }

            if let Some(row) = CsvRow::from_unit(&file_name, &unit) {
                rows.push(row);
            }

            // 清掉可能残留的旧就绪信号，确保本次等待对应本次下发
            while self.ready.try_recv().is_ok() {}

            self.sink.emit(directory, base_name, &unit);

            // 单槽位背压：下游未就绪前最多一个在途单元
            if !self.await_sink_ready() {
                self.emit(ScanEvent::warn(format!(
                    "{file_name}: 扫描被中断，放弃此文件待下轮重试 / cancelled mid-file, will retry"
                )));
                return;
            }
        }

        let artifact = result_artifact_path(path);
        match csv_report::write_rows(&artifact, &rows) {
            Ok(()) => {
                self.emit(ScanEvent::info(format!(
                    "{file_name}: 完成{}个单元，结果已写入{} / completed",
                    rows.len(),
                    utils::extract_filename_lossy(&artifact)
                )));
            }
            Err(e) => {
                self.emit(ScanEvent::error(format!(
                    "{file_name}: [{}] {e} / artifact not written, will retry",
                    ErrorCategory::from_scan_error(&e).display_name()
                )));
            }
        }
    }

    /// 等待下游就绪信号；stop/terminate到达时返回false
    fn await_sink_ready(&mut self) -> bool {
        loop {
            match self.ready.recv_timeout(ACK_POLL) {
                Ok(()) => return true,
                Err(RecvTimeoutError::Timeout) => {
                    self.drain_commands();
                    if self.state() != ScanState::Running {
                        return false;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // 下游已消失，无法再收到确认
                    self.emit(ScanEvent::error(
                        "下游已断开，停止扫描 / Result sink disconnected, stopping".to_string(),
                    ));
                    self.set_state(ScanState::Idle);
                    return false;
                }
            }
        }
    }

    /// 扫描间隔等待，按1秒切片检查stop/terminate
    fn wait_scan_interval(&mut self) {
        let interval = Duration::from_secs(self.config.scan_interval_seconds.max(1));
        let deadline = Instant::now() + interval;

        loop {
            let now = Instant::now();
            if now >= deadline {
                return;
            }

            let slice = INTERVAL_SLICE.min(deadline - now);
            match self.commands.recv_timeout(slice) {
                Ok(command) => {
                    self.apply_command(command);
                    self.drain_commands();
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.set_state(ScanState::Terminated);
                }
            }

            if self.state() != ScanState::Running {
                return;
            }
        }
    }
}
