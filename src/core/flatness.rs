//! 平整度计算核心引擎
//!
//! 对单个测量单元执行三步计算：
//!
//! 1. 普通最小二乘拟合参考平面 `z ≈ a'·x + b'·y + c'`（法方程解），
//!    归一化为平面法式 `a·x + b·y + c·z + d = 0`（约定c为正）；
//! 2. 将每个点的z原地重投影为到拟合平面的带符号垂直距离；
//! 3. 按归一化包围盒坐标划分中心区/边缘区，比较中心区极值与
//!    边缘区均值得出形貌分类，平整度取全部距离的极差（4位小数）。
//!
//! 法方程矩阵不可逆（如所有点共线）与"中心区有点而边缘区无点"
//! 均作为数值错误上报，由调用方按单元粒度处理，绝不静默兜底。

use crate::error::{ScanError, ScanResult};
use crate::report::unit::{MIN_POINTS_FOR_FIT, MeasurementUnit, Point3D, SurfaceShape};

/// 平整度结果保留的小数位数对应的缩放因子
const FLATNESS_ROUND_SCALE: f64 = 10_000.0;

/// 拟合平面参数：`a·x + b·y + c·z + d = 0`，`c`恒为正
#[derive(Debug, Clone, Copy)]
pub struct FittedPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// 归一化常数 `k = sqrt(a² + b² + c²)`
    pub k: f64,
}

impl FittedPlane {
    /// 点到平面的带符号垂直距离
    #[inline]
    pub fn signed_distance(&self, point: &Point3D) -> f64 {
        (self.a * point.x + self.b * point.y + self.c * point.z + self.d) / self.k
    }
}

/// 3×3行列式（按第一行展开）
#[inline]
fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// 最小二乘平面拟合（法方程 + Cramer求解）
///
/// 求解使 `Σ(a'·x + b'·y + c' − z)²` 最小的线性模型，法方程为
///
/// ```text
/// | Σxx Σxy Σx |   | a' |   | Σxz |
/// | Σxy Σyy Σy | · | b' | = | Σyz |
/// | Σx  Σy  n  |   | c' |   | Σz  |
/// ```
///
/// 行列式接近零（所有点共线等退化输入）时返回奇异拟合错误。
pub fn fit_plane(points: &[Point3D]) -> ScanResult<FittedPlane> {
    if points.len() < MIN_POINTS_FOR_FIT {
        return Err(ScanError::InvalidInput(format!(
            "平面拟合至少需要{MIN_POINTS_FOR_FIT}个点，实际只有{}个",
            points.len()
        )));
    }

    let n = points.len() as f64;
    let (mut sxx, mut sxy, mut syy) = (0.0f64, 0.0f64, 0.0f64);
    let (mut sx, mut sy, mut sz) = (0.0f64, 0.0f64, 0.0f64);
    let (mut sxz, mut syz) = (0.0f64, 0.0f64);

    for p in points {
        sxx += p.x * p.x;
        sxy += p.x * p.y;
        syy += p.y * p.y;
        sx += p.x;
        sy += p.y;
        sz += p.z;
        sxz += p.x * p.z;
        syz += p.y * p.z;
    }

    let m = [[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, n]];
    let det = det3(m);

    // 相对奇异性判据：行列式量级与矩阵迹的立方比较
    let trace = sxx + syy + n;
    if det.abs() <= 1e-12_f64.max(1e-12 * trace * trace * trace) {
        return Err(ScanError::Numerical(
            "奇异拟合：法方程矩阵不可逆（探测点可能共线）".to_string(),
        ));
    }

    let rhs = [sxz, syz, sz];
    let ap = det3([
        [rhs[0], sxy, sx],
        [rhs[1], syy, sy],
        [rhs[2], sy, n],
    ]) / det;
    let bp = det3([
        [sxx, rhs[0], sx],
        [sxy, rhs[1], sy],
        [sx, rhs[2], n],
    ]) / det;
    let cp = det3([
        [sxx, sxy, rhs[0]],
        [sxy, syy, rhs[1]],
        [sx, sy, rhs[2]],
    ]) / det;

    // z = a'x + b'y + c'  →  −a'x − b'y + z − c' = 0，符号约定c为正
    let (a, b, c, d) = (-ap, -bp, 1.0, -cp);
    let k = (a * a + b * b + c * c).sqrt();

    Ok(FittedPlane { a, b, c, d, k })
}

/// 中心/边缘分区的累积统计
#[derive(Debug)]
struct ZoneStats {
    central_min: f64,
    central_max: f64,
    central_count: usize,
    marginal_sum: f64,
    marginal_count: usize,
}

impl ZoneStats {
    fn new() -> Self {
        Self {
            central_min: f64::INFINITY,
            central_max: f64::NEG_INFINITY,
            central_count: 0,
            marginal_sum: 0.0,
            marginal_count: 0,
        }
    }

    fn add_central(&mut self, z: f64) {
        self.central_min = self.central_min.min(z);
        self.central_max = self.central_max.max(z);
        self.central_count += 1;
    }

    fn add_marginal(&mut self, z: f64) {
        self.marginal_sum += z;
        self.marginal_count += 1;
    }
}

/// 计算单元的平整度与形貌分类（原地填充）
///
/// 成功后`unit.points`的z已被覆盖为平面距离，`unit.flatness`与
/// `unit.shape`被填充。失败（奇异拟合/空边缘区）时单元应被丢弃。
///
/// 中心区判定：两轴的归一化包围盒坐标
/// `|2·(x − minX)/(maxX − minX) − 1|` 均不超过`central_zone_limit`。
/// 包围盒在某轴上宽度为零时归一化坐标为NaN，比较恒为假，该点落入
/// 边缘区；这类退化单元最终得到Unknown分类。
pub fn compute_flatness(
    unit: &mut MeasurementUnit,
    central_zone_limit: f64,
) -> ScanResult<()> {
    let plane = fit_plane(&unit.points)?;

    // 原地重投影：z ← 到拟合平面的带符号距离
    for p in &mut unit.points {
        p.z = plane.signed_distance(p);
    }

    let bb = unit.bounding_box;
    let mut zones = ZoneStats::new();

    for p in &unit.points {
        let nx = 2.0 * (p.x - bb.min_x) / bb.width() - 1.0;
        let ny = 2.0 * (p.y - bb.min_y) / bb.height() - 1.0;

        if nx.abs() <= central_zone_limit && ny.abs() <= central_zone_limit {
            zones.add_central(p.z);
        } else {
            zones.add_marginal(p.z);
        }
    }

    unit.shape = if zones.central_count == 0 {
        SurfaceShape::Unknown
    } else if zones.marginal_count == 0 {
        return Err(ScanError::Numerical(format!(
            "空边缘区：{}个点全部落入中心区，无法计算边缘均值",
            zones.central_count
        )));
    } else {
        let marginal_avg = zones.marginal_sum / zones.marginal_count as f64;
        if zones.central_min > marginal_avg {
            SurfaceShape::CentralBulge
        } else if zones.central_max < marginal_avg {
            SurfaceShape::CentralDepression
        } else {
            SurfaceShape::Uneven
        }
    };

    let (min_z, max_z) = unit.points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), p| (lo.min(p.z), hi.max(p.z)),
    );
    unit.flatness = Some(((max_z - min_z) * FLATNESS_ROUND_SCALE).round() / FLATNESS_ROUND_SCALE);

    Ok(())
}
