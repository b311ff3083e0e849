//! 核心算法模块
//!
//! 包含平面拟合与平整度分类的核心数据结构和算法实现。

pub mod flatness;

// 重新导出公共接口
pub use flatness::{FittedPlane, compute_flatness, fit_plane};
