//! 测量单元数据结构
//!
//! 一个测量单元（"bga"）对应报告中一个位置标签下的探测点组，
//! 由解析器逐行填充，再由平整度引擎补充拟合结果。

/// 单个探测点坐标
///
/// `z`在平面重投影阶段被原地覆盖为到拟合平面的带符号距离，
/// 调用方在该步骤之后不得再依赖原始z值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// XY包围盒，随探测点追加滚动更新min/max
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// 空包围盒（折叠运算的单位元）
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// 将一个点折叠进包围盒
    pub fn fold(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// 表面形貌分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceShape {
    /// 无法判定（中心区无点）
    Unknown,
    /// 中心鼓包：中心区最低点仍高于边缘均值
    CentralBulge,
    /// 中心凹陷：中心区最高点仍低于边缘均值
    CentralDepression,
    /// 不平整：中心区横跨边缘均值
    Uneven,
}

impl SurfaceShape {
    /// CSV单元格中的固定表示
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::CentralBulge => "central_bulge",
            Self::CentralDepression => "central_depression",
            Self::Uneven => "uneven",
        }
    }

    /// 控制台显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "未知",
            Self::CentralBulge => "中心鼓包",
            Self::CentralDepression => "中心凹陷",
            Self::Uneven => "不平整",
        }
    }
}

impl std::fmt::Display for SurfaceShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 参与平面拟合所需的最少点数
pub const MIN_POINTS_FOR_FIT: usize = 3;

/// 一个位置标签的测量单元
///
/// 生命周期：位置标签行创建 → 解析器逐点填充 → 平整度引擎补充
/// `flatness`/`shape` → 下游消费一次 → 随文件处理结束丢弃。
#[derive(Debug, Clone)]
pub struct MeasurementUnit {
    /// 零件序列号（块内元数据行回填）
    pub serial_number: String,

    /// 位置标签（尾随footer行回填）
    pub location: String,

    /// 测量日期，YYYY-MM-DD
    pub date: String,

    /// 测量时间，HH:MM:SS
    pub time: String,

    /// 探测点XY包围盒，始终与已累积的points一致
    pub bounding_box: BoundingBox,

    /// 有序探测点序列
    pub points: Vec<Point3D>,

    /// 平整度（max z' − min z'，4位小数），计算前为None
    pub flatness: Option<f64>,

    /// 形貌分类，计算前为Unknown
    pub shape: SurfaceShape,
}

impl MeasurementUnit {
    /// 创建空的累积中单元
    pub fn new() -> Self {
        Self {
            serial_number: String::new(),
            location: String::new(),
            date: String::new(),
            time: String::new(),
            bounding_box: BoundingBox::empty(),
            points: Vec::new(),
            flatness: None,
            shape: SurfaceShape::Unknown,
        }
    }

    /// 追加一个探测点并折叠进包围盒
    pub fn push_point(&mut self, point: Point3D) {
        self.bounding_box.fold(point.x, point.y);
        self.points.push(point);
    }

    /// 单元有效性：点数>2且序列号/位置非空
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POINTS_FOR_FIT
            && !self.serial_number.is_empty()
            && !self.location.is_empty()
    }
}

impl Default for MeasurementUnit {
    fn default() -> Self {
        Self::new()
    }
}
