//! 报告解析模块
//!
//! 将解码后的行流恢复为有序的测量单元序列。报告由`:BEGIN`/`:END`
//! 分隔的块组成，块内三类行：
//!
//! - 位置点行：`点 N: X 坐标 <f> ... Y 坐标 <f> ... Z 坐标 <f>`，
//!   追加到当前累积中的单元；
//! - 位置标签行：单个不含冒号、不含空白的token，**收尾**当前累积
//!   单元——点组归属其后面的标签行，而不是前面的（这是报告格式的
//!   既定行为，必须保持）；
//! - 元数据行（两种中英文版式），匹配后把序列号/日期/时间回填到
//!   本块内**已收尾**的全部单元，不影响仍在累积中的单元。
//!
//! 块结束时只保留位置含"BGA"（不区分大小写）的单元，无效单元作为
//! 诊断事件丢弃而不中断整个文件。

use crate::report::unit::{MeasurementUnit, Point3D};
use regex::Regex;
use std::sync::OnceLock;

/// 块起始标记（去除首尾空白后精确匹配，区分大小写）
const BLOCK_BEGIN: &str = ":BEGIN";
/// 块结束标记
const BLOCK_END: &str = ":END";
/// 保留单元的位置标签子串（匹配时不区分大小写）
const LOCATION_KEYWORD: &str = "BGA";

/// 位置点行模式：三个带标签的十进制坐标
fn position_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"点\s*\d+\s*[:：].*?X\s*坐标\s*([-+]?\d+(?:\.\d+)?).*?Y\s*坐标\s*([-+]?\d+(?:\.\d+)?).*?Z\s*坐标\s*([-+]?\d+(?:\.\d+)?)",
        )
        .expect("内置位置行模式不合法")
    })
}

/// 元数据行版式A（中文）：序列号 + 测量日期 + 测量时间
fn metadata_pattern_cn() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"序列号\s*[:：]\s*(\S+)\s+测量日期\s*[:：]\s*(\d{4}-\d{2}-\d{2})\s+测量时间\s*[:：]\s*(\d{2}:\d{2}:\d{2})",
        )
        .expect("内置元数据行模式A不合法")
    })
}

/// 元数据行版式B（英文）：Serial Number + Date + Time
fn metadata_pattern_en() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"Serial\s+Number\s*[:：]?\s*(\S+)\s+Date\s*[:：]?\s*(\d{4}-\d{2}-\d{2})\s+Time\s*[:：]?\s*(\d{2}:\d{2}:\d{2})",
        )
        .expect("内置元数据行模式B不合法")
    })
}

/// 位置标签行判定：单token、无空白、无冒号
fn is_location_line(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && !trimmed.contains(':')
        && !trimmed.contains(char::is_whitespace)
}

/// 解析诊断：一个位置组未通过单元校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnomaly {
    pub serial_number: String,
    pub location: String,
}

/// 单个文件的解析结果
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// 通过校验的测量单元，按位置组收尾顺序排列
    pub units: Vec<MeasurementUnit>,
    /// 被丢弃单元的诊断记录
    pub anomalies: Vec<ParseAnomaly>,
}

/// 一个`:BEGIN`块的解析状态
struct BlockState {
    /// 本块内已收尾的单元（等待块结束过滤/校验）
    finalized: Vec<MeasurementUnit>,
    /// 当前累积中的单元（尚无位置标签）
    accumulating: MeasurementUnit,
}

impl BlockState {
    fn new() -> Self {
        Self {
            finalized: Vec::new(),
            accumulating: MeasurementUnit::new(),
        }
    }
}

/// 报告解析器
///
/// 对输入行流是纯函数：不做任何I/O，解码由上游完成。
pub struct ReportParser;

impl ReportParser {
    /// 解析一个文件的全部行，恢复其中的测量单元
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let mut block: Option<BlockState> = None;

        for line in lines {
            let trimmed = line.as_ref().trim();

            if trimmed == BLOCK_BEGIN {
                // 新块开始；尚未闭合的旧块按悬空块整体丢弃
                block = Some(BlockState::new());
                continue;
            }

            if trimmed == BLOCK_END {
                if let Some(state) = block.take() {
                    Self::close_block(state, &mut outcome);
                }
                continue;
            }

            let Some(state) = block.as_mut() else {
                // 块外的行一概忽略
                continue;
            };

            if let Some(caps) = position_pattern().captures(trimmed) {
                // 三个捕获组均为已验证的十进制字面量
                let coords: Vec<f64> = (1..=3)
                    .filter_map(|i| caps.get(i))
                    .filter_map(|m| m.as_str().parse::<f64>().ok())
                    .collect();
                if let [x, y, z] = coords[..] {
                    state.accumulating.push_point(Point3D::new(x, y, z));
                }
                continue;
            }

            if let Some(caps) = metadata_pattern_cn()
                .captures(trimmed)
                .or_else(|| metadata_pattern_en().captures(trimmed))
            {
                let serial = caps[1].to_string();
                let date = caps[2].to_string();
                let time = caps[3].to_string();

                // 回填本块内所有已收尾的单元；累积中的单元不受影响
                for unit in &mut state.finalized {
                    unit.serial_number = serial.clone();
                    unit.date = date.clone();
                    unit.time = time.clone();
                }
                continue;
            }

            if is_location_line(trimmed) {
                // footer语义：标签收尾此前累积的点组，并开启新的累积单元
                let mut unit =
                    std::mem::replace(&mut state.accumulating, MeasurementUnit::new());
                unit.location = trimmed.to_string();
                state.finalized.push(unit);
            }
        }

        // 无匹配:END的悬空块整体丢弃
        outcome
    }

    /// 块结束：过滤BGA位置、校验单元、产出诊断
    fn close_block(state: BlockState, outcome: &mut ParseOutcome) {
        for unit in state.finalized {
            if !unit
                .location
                .to_ascii_uppercase()
                .contains(LOCATION_KEYWORD)
            {
                continue;
            }

            if unit.is_valid() {
                outcome.units.push(unit);
            } else {
                outcome.anomalies.push(ParseAnomaly {
                    serial_number: unit.serial_number,
                    location: unit.location,
                });
            }
        }
        // 没有尾随位置标签行的累积单元随块丢弃，从不收尾
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self
    }
}
