//! 下游结果接口
//!
//! `ResultSink`由外部渲染/持久化端实现。协调器每下发一个单元后
//! 阻塞等待下游的就绪信号，从而把在途单元数限制为最多一个——
//! 渲染慢时协调器不会无界领先。

use crate::report::unit::MeasurementUnit;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::Path;

/// 计算结果的下游消费端
///
/// `emit`可能触发昂贵的渲染；实现方在可以接收下一个单元时通过
/// 配套的[`ReadyNotifier`]发出就绪信号。
pub trait ResultSink: Send {
    /// 消费一个计算完成的测量单元
    ///
    /// `directory`/`base_name`标识单元的来源报告，供下游为渲染
    /// 产物选择输出位置。
    fn emit(&mut self, directory: &Path, base_name: &str, unit: &MeasurementUnit);
}

/// 就绪信号通道构造器
///
/// 有界容量1：信号本身是单槽位确认，重复通知自然合并。
pub struct ReadySignal;

impl ReadySignal {
    /// 创建就绪信号对：通知端交给下游，接收端交给协调器
    pub fn channel() -> (ReadyNotifier, Receiver<()>) {
        let (tx, rx) = bounded(1);
        (ReadyNotifier { tx }, rx)
    }
}

/// 下游持有的就绪通知端
#[derive(Debug, Clone)]
pub struct ReadyNotifier {
    tx: Sender<()>,
}

impl ReadyNotifier {
    /// 通知协调器可以下发下一个单元
    ///
    /// 信号已在途或协调器已退出时静默返回。
    pub fn ready(&self) {
        let _ = self.tx.try_send(());
    }
}
