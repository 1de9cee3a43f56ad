use sheet_packer_core::config::{PackerConfig, SortOrder};
use sheet_packer_core::model::SheetRequest;
use sheet_packer_core::ordering::{order_requests, should_pre_rotate};

fn req(id: &str, w: f64, h: f64) -> SheetRequest {
    SheetRequest::new(id.to_string(), w, h)
}

fn ids(cfg: &PackerConfig, sheets: &[SheetRequest]) -> Vec<String> {
    order_requests(sheets, cfg)
        .into_iter()
        .map(|o| o.request.id)
        .collect()
}

#[test]
fn widest_first_then_area() {
    let cfg = PackerConfig::default();
    let sheets = vec![req("a", 10.0, 10.0), req("b", 50.0, 20.0), req("c", 30.0, 30.0)];
    assert_eq!(ids(&cfg, &sheets), vec!["b", "c", "a"]);
}

#[test]
fn near_equal_widths_sort_by_area() {
    let cfg = PackerConfig::default();
    // 30.5 vs 30 is within the 1-unit tolerance, so the larger area goes first.
    let sheets = vec![req("narrow_big", 30.0, 10.0), req("wide_small", 30.5, 2.0)];
    assert_eq!(ids(&cfg, &sheets), vec!["narrow_big", "wide_small"]);

    let strict = PackerConfig {
        width_tolerance: 0.0,
        ..Default::default()
    };
    assert_eq!(ids(&strict, &sheets), vec!["wide_small", "narrow_big"]);
}

#[test]
fn width_classes_are_anchored_on_their_widest_member() {
    let cfg = PackerConfig::default();
    // 49.5 and 49.0 are within 1 of 50; 48.9 is not and starts its own class.
    let sheets = vec![
        req("w50", 50.0, 1.0),
        req("w49_5", 49.5, 2.0),
        req("w49", 49.0, 3.0),
        req("w48_9", 48.9, 100.0),
    ];
    assert_eq!(ids(&cfg, &sheets), vec!["w49", "w49_5", "w50", "w48_9"]);
}

#[test]
fn pre_rotation_thresholds() {
    let cfg = PackerConfig::default(); // container 60 => width threshold 18
    assert!(should_pre_rotate(10.0, 40.0, &cfg));
    assert!(!should_pre_rotate(10.0, 16.0, &cfg), "too short relative to the strip");
    assert!(!should_pre_rotate(30.0, 40.0, &cfg), "not tall enough relative to its width");
    assert!(!should_pre_rotate(10.0, 15.0, &cfg), "exactly 1.5x is not rotated");
}

#[test]
fn pre_rotation_only_when_enabled() {
    let sheets = vec![req("tall", 10.0, 40.0)];

    let off = order_requests(&sheets, &PackerConfig::default());
    assert!(!off[0].pre_rotated);
    assert_eq!((off[0].request.width, off[0].request.height), (10.0, 40.0));

    let on_cfg = PackerConfig {
        pre_rotate: true,
        ..Default::default()
    };
    let on = order_requests(&sheets, &on_cfg);
    assert!(on[0].pre_rotated);
    assert_eq!((on[0].request.width, on[0].request.height), (40.0, 10.0));
    assert_eq!(on[0].source_index, 0);
}

#[test]
fn pre_rotation_happens_before_sorting() {
    let cfg = PackerConfig {
        pre_rotate: true,
        ..Default::default()
    };
    // Once laid down, "tall" (10x40 -> 40x10) is wider than "wide" (30x5).
    let sheets = vec![req("wide", 30.0, 5.0), req("tall", 10.0, 40.0)];
    let ordered = order_requests(&sheets, &cfg);
    assert_eq!(ordered[0].request.id, "tall");
    assert_eq!(ordered[0].source_index, 1);
    assert_eq!(ordered[1].source_index, 0);
}

#[test]
fn unsorted_and_tied_orders_are_stable() {
    let sheets = vec![req("x", 5.0, 4.0), req("y", 2.0, 10.0), req("z", 4.0, 5.0)];
    let none = PackerConfig {
        sort_order: SortOrder::None,
        ..Default::default()
    };
    assert_eq!(ids(&none, &sheets), vec!["x", "y", "z"]);

    // All three have area 20.
    let area = PackerConfig {
        sort_order: SortOrder::AreaDesc,
        ..Default::default()
    };
    assert_eq!(ids(&area, &sheets), vec!["x", "y", "z"]);
}

#[test]
fn other_sort_orders() {
    let sheets = vec![req("b", 5.0, 30.0), req("a", 20.0, 10.0), req("c", 8.0, 12.0)];
    let by = |sort_order: SortOrder| PackerConfig {
        sort_order,
        ..Default::default()
    };
    assert_eq!(ids(&by(SortOrder::HeightDesc), &sheets), vec!["b", "c", "a"]);
    assert_eq!(ids(&by(SortOrder::MaxSideDesc), &sheets), vec!["b", "a", "c"]);
    assert_eq!(ids(&by(SortOrder::IdAsc), &sheets), vec!["a", "b", "c"]);
    assert_eq!(ids(&by(SortOrder::AreaDesc), &sheets), vec!["a", "b", "c"]);
}
