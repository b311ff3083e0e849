//! 统一错误处理框架
//!
//! 扫描、解析与平整度计算共用的核心错误类型定义。

use std::fmt;
use std::io;

/// 平整度扫描相关的统一错误类型
#[derive(Debug)]
pub enum ScanError {
    /// 输入验证错误（配置越界、点数不足等）
    InvalidInput(String),

    /// 文件I/O错误
    Io(io::Error),

    /// 报告解码错误（文件不可读或内容无法识别）
    Decode(String),

    /// 数值计算错误（奇异拟合、空边缘区）
    Numerical(String),

    /// 结果持久化错误（CSV产物写入失败）
    Persistence(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidInput(msg) => write!(f, "输入验证失败: {msg}"),
            ScanError::Io(err) => write!(f, "文件I/O错误: {err}"),
            ScanError::Decode(msg) => write!(f, "报告解码失败: {msg}"),
            ScanError::Numerical(msg) => write!(f, "数值计算异常: {msg}"),
            ScanError::Persistence(msg) => write!(f, "结果写入失败: {msg}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        ScanError::Io(err)
    }
}

/// 平整度扫描操作的标准Result类型
pub type ScanResult<T> = Result<T, ScanError>;

/// 创建解码错误的helper函数
#[inline]
pub fn decode_error<E: fmt::Display>(context: &str, err: E) -> ScanError {
    ScanError::Decode(format!("{context}: {err}"))
}

/// 创建持久化错误的helper函数
#[inline]
pub fn persistence_error<E: fmt::Display>(context: &str, err: E) -> ScanError {
    ScanError::Persistence(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于扫描循环中的错误统计和日志归类

/// 错误类别枚举（用于扫描统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 解码相关错误（编码无法识别、文件损坏等）
    Decode,
    /// 数值相关错误（奇异拟合、退化分区等）
    Numerical,
    /// 持久化相关错误（CSV写入失败等）
    Persistence,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从ScanError提取错误类别
    pub fn from_scan_error(e: &ScanError) -> Self {
        match e {
            ScanError::Decode(_) => Self::Decode,
            ScanError::Numerical(_) => Self::Numerical,
            ScanError::Persistence(_) => Self::Persistence,
            ScanError::Io(_) => Self::Io,
            ScanError::InvalidInput(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Decode => "解码错误",
            Self::Numerical => "计算错误",
            Self::Persistence => "写入错误",
            Self::Io => "I/O错误",
            Self::Other => "其他错误",
        }
    }
}
