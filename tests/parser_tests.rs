//! 报告解析器集成测试
//!
//! 覆盖分块扫描、footer位置标签归组、元数据回填与单元校验诊断。

use flatscan_tool::ReportParser;

fn lines(raw: &str) -> Vec<String> {
    raw.lines().map(str::to_owned).collect()
}

const METADATA_CN: &str = "序列号: SN001 测量日期: 2025-01-01 测量时间: 10:00:00";

// ============================================================================
// footer位置标签归组
// ============================================================================

/// 点组归属其后面的位置标签行：N个点 + L1 + M个点 + L2 → 恰好两个单元
#[test]
fn test_points_belong_to_trailing_location_label() {
    let report = lines(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.10
点 2: X 坐标 4.0 Y 坐标 0.0 Z 坐标 0.12
点 3: X 坐标 0.0 Y 坐标 4.0 Z 坐标 0.08
BGA-A
点 4: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.20
点 5: X 坐标 4.0 Y 坐标 0.0 Z 坐标 0.22
点 6: X 坐标 0.0 Y 坐标 4.0 Z 坐标 0.18
点 7: X 坐标 4.0 Y 坐标 4.0 Z 坐标 0.21
BGA-B
序列号: SN001 测量日期: 2025-01-01 测量时间: 10:00:00
:END",
    );

    let outcome = ReportParser.parse(&report);

    assert_eq!(outcome.units.len(), 2, "应恢复两个单元");
    assert!(outcome.anomalies.is_empty());

    assert_eq!(outcome.units[0].location, "BGA-A");
    assert_eq!(outcome.units[0].points.len(), 3, "前3个点归属BGA-A");
    assert_eq!(outcome.units[1].location, "BGA-B");
    assert_eq!(outcome.units[1].points.len(), 4, "后4个点归属BGA-B");

    // 包围盒与累积点一致
    assert_eq!(outcome.units[1].bounding_box.max_x, 4.0);
    assert_eq!(outcome.units[1].bounding_box.max_y, 4.0);
}

/// 末尾没有位置标签的累积点组随块丢弃，从不收尾
#[test]
fn test_trailing_points_without_label_are_discarded() {
    let report = lines(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
BGA-1
序列号: SN001 测量日期: 2025-01-01 测量时间: 10:00:00
点 4: X 坐标 9.0 Y 坐标 9.0 Z 坐标 0.9
点 5: X 坐标 8.0 Y 坐标 8.0 Z 坐标 0.8
:END",
    );

    let outcome = ReportParser.parse(&report);

    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].points.len(), 3, "尾部散点不得混入已收尾单元");
    assert!(outcome.anomalies.is_empty(), "未收尾的累积单元不产生诊断");
}

// ============================================================================
// 元数据回填
// ============================================================================

/// 元数据只回填已收尾的单元，不影响其后收尾的单元
#[test]
fn test_metadata_broadcast_reaches_only_already_finalized_units() {
    let report = lines(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
BGA-1
点 4: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.2
点 5: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.2
点 6: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.2
BGA-2
序列号: SN777 测量日期: 2025-06-30 测量时间: 23:59:59
点 7: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.3
点 8: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.3
点 9: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.3
BGA-3
:END",
    );

    let outcome = ReportParser.parse(&report);

    // 前两个单元拿到元数据
    assert_eq!(outcome.units.len(), 2);
    for unit in &outcome.units {
        assert_eq!(unit.serial_number, "SN777");
        assert_eq!(unit.date, "2025-06-30");
        assert_eq!(unit.time, "23:59:59");
    }

    // 元数据之后才收尾的BGA-3序列号为空，校验失败成为诊断
    assert_eq!(outcome.anomalies.len(), 1);
    assert_eq!(outcome.anomalies[0].location, "BGA-3");
    assert!(outcome.anomalies[0].serial_number.is_empty());
}

/// 英文版式的元数据行同样生效
#[test]
fn test_english_metadata_layout() {
    let report = lines(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
BGA-7
Serial Number: SN-EN-01 Date: 2024-12-31 Time: 07:05:30
:END",
    );

    let outcome = ReportParser.parse(&report);

    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].serial_number, "SN-EN-01");
    assert_eq!(outcome.units[0].date, "2024-12-31");
    assert_eq!(outcome.units[0].time, "07:05:30");
}

// ============================================================================
// 块边界与过滤
// ============================================================================

/// 没有:END的悬空块不产出任何单元
#[test]
fn test_dangling_block_yields_nothing() {
    let report = lines(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
BGA-1
序列号: SN001 测量日期: 2025-01-01 测量时间: 10:00:00",
    );

    let outcome = ReportParser.parse(&report);
    assert!(outcome.units.is_empty());
    assert!(outcome.anomalies.is_empty());
}

/// 块外的行（前导、块间）一概忽略
#[test]
fn test_lines_outside_blocks_are_inert() {
    let report = lines(
        "\
设备自检通过
BGA-GHOST
点 0: X 坐标 9.0 Y 坐标 9.0 Z 坐标 9.0
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
BGA-1
序列号: SN001 测量日期: 2025-01-01 测量时间: 10:00:00
:END
BGA-AFTER
点 9: X 坐标 5.0 Y 坐标 5.0 Z 坐标 5.0",
    );

    let outcome = ReportParser.parse(&report);

    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].location, "BGA-1");
    assert_eq!(outcome.units[0].points.len(), 3);
}

/// 位置不含BGA的单元被静默过滤，大小写不敏感的BGA被保留
#[test]
fn test_location_keyword_filter_is_case_insensitive() {
    let report = lines(&format!(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
PIN-1
点 4: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.2
点 5: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.2
点 6: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.2
bga_u7
{METADATA_CN}
:END"
    ));

    let outcome = ReportParser.parse(&report);

    assert_eq!(outcome.units.len(), 1, "非BGA位置应被静默过滤");
    assert_eq!(outcome.units[0].location, "bga_u7");
    assert!(outcome.anomalies.is_empty(), "过滤不产生诊断");
}

/// 点数不足的BGA单元作为诊断丢弃，不中断文件内其他单元
#[test]
fn test_undersized_unit_becomes_anomaly() {
    let report = lines(&format!(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
BGA-SHORT
点 3: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.2
点 4: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.2
点 5: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.2
BGA-OK
{METADATA_CN}
:END"
    ));

    let outcome = ReportParser.parse(&report);

    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.units[0].location, "BGA-OK");

    assert_eq!(outcome.anomalies.len(), 1);
    assert_eq!(outcome.anomalies[0].location, "BGA-SHORT");
    assert_eq!(outcome.anomalies[0].serial_number, "SN001");
}

/// 单元按位置组收尾顺序输出（即位置标签行在文件中的顺序）
#[test]
fn test_units_emitted_in_finalization_order() {
    let report = lines(&format!(
        "\
:BEGIN
点 1: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.1
点 2: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.1
点 3: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.1
BGA-3
点 4: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.2
点 5: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.2
点 6: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.2
BGA-1
点 7: X 坐标 0.0 Y 坐标 0.0 Z 坐标 0.3
点 8: X 坐标 1.0 Y 坐标 0.0 Z 坐标 0.3
点 9: X 坐标 0.0 Y 坐标 1.0 Z 坐标 0.3
BGA-2
{METADATA_CN}
:END"
    ));

    let outcome = ReportParser.parse(&report);

    let order: Vec<&str> = outcome.units.iter().map(|u| u.location.as_str()).collect();
    assert_eq!(order, ["BGA-3", "BGA-1", "BGA-2"]);
}
