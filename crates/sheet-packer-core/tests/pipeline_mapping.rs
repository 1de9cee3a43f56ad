use sheet_packer_core::config::{PackerConfig, RotationPolicy};
use sheet_packer_core::model::{PackResult, SheetRequest, UnplacedReason};
use sheet_packer_core::pipeline::auto_candidates;
use sheet_packer_core::{pack, pack_sheets};

fn req(id: &str, w: f64, h: f64) -> SheetRequest {
    SheetRequest::new(id.to_string(), w, h)
}

#[test]
fn request_index_refers_to_caller_order() {
    let sheets = vec![
        req("small", 10.0, 10.0),
        req("wide", 55.0, 20.0),
        req("mid", 30.0, 15.0),
    ];
    let out = pack_sheets(&sheets, &PackerConfig::default()).expect("valid config");
    assert_eq!(out.placements.len(), 3);
    for p in &out.placements {
        assert_eq!(sheets[p.request_index].id, p.id);
    }
    // The widest sheet is packed first, at the origin.
    assert_eq!(out.placements[0].id, "wide");
    assert_eq!(out.placements[0].request_index, 1);
    assert_eq!((out.placements[0].x, out.placements[0].y), (0.0, 0.0));
}

#[test]
fn pre_rotated_sheet_is_reported_rotated() {
    let cfg = PackerConfig {
        pre_rotate: true,
        rotation: RotationPolicy::Fixed,
        ..Default::default()
    };
    let out = pack_sheets(&[req("tall", 10.0, 40.0)], &cfg).expect("valid config");
    let p = &out.placements[0];
    assert!(p.rotated);
    assert_eq!((p.width, p.height), (40.0, 10.0));
}

#[test]
fn pre_rotation_undone_by_engine_rotation_is_not_rotated() {
    // With trial rotation a pre-rotated 10x40 may be turned back; either way the
    // reported dimensions must agree with the flag.
    let cfg = PackerConfig {
        pre_rotate: true,
        ..Default::default()
    };
    let sheets = vec![req("wide", 60.0, 30.0), req("tall", 10.0, 40.0)];
    let out = pack_sheets(&sheets, &cfg).expect("valid config");
    for p in &out.placements {
        let s = &sheets[p.request_index];
        if p.rotated {
            assert_eq!((p.width, p.height), (s.height, s.width));
        } else {
            assert_eq!((p.width, p.height), (s.width, s.height));
        }
    }
}

#[test]
fn unplaced_pre_rotated_sheet_keeps_caller_dimensions() {
    let cfg = PackerConfig {
        pre_rotate: true,
        rotation: RotationPolicy::Fixed,
        ..Default::default()
    };
    let out = pack_sheets(&[req("pole", 10.0, 200.0)], &cfg).expect("valid config");
    assert!(out.placements.is_empty());
    let u = &out.unplaced[0];
    assert_eq!(u.request_index, 0);
    assert_eq!((u.width, u.height), (10.0, 200.0));
    assert_eq!(u.reason, UnplacedReason::TooWide { width: 200.0 });
}

#[test]
fn empty_input_short_circuits() {
    let out = pack_sheets::<String>(&[], &PackerConfig::default()).expect("valid config");
    assert_eq!(out, PackResult::default());
}

#[test]
fn invalid_config_fails_before_packing() {
    let cfg = PackerConfig {
        container_width: -5.0,
        ..Default::default()
    };
    assert!(pack_sheets::<String>(&[], &cfg).is_err());
}

#[test]
fn auto_portfolio_order() {
    let c = auto_candidates(&PackerConfig::default());
    let seen: Vec<(RotationPolicy, bool)> = c.iter().map(|c| (c.rotation, c.pre_rotate)).collect();
    assert_eq!(
        seen,
        vec![
            (RotationPolicy::PerPlacementTrial, false),
            (RotationPolicy::PerPlacementTrial, true),
            (RotationPolicy::Fixed, true),
            (RotationPolicy::LongSideVertical, false),
        ]
    );
}

#[test]
fn auto_is_never_worse_than_default_trial() {
    let sheets: Vec<SheetRequest> = [
        (48.0, 24.0),
        (30.0, 80.0),
        (12.0, 60.0),
        (60.0, 20.0),
        (25.0, 25.0),
        (18.0, 45.0),
        (40.0, 10.0),
        (8.0, 90.0),
    ]
    .iter()
    .enumerate()
    .map(|(i, &(w, h))| req(&format!("s{i}"), w, h))
    .collect();

    let trial = pack_sheets(&sheets, &PackerConfig::default()).expect("valid config");
    let auto_cfg = PackerConfig {
        rotation: RotationPolicy::Auto,
        ..Default::default()
    };
    let auto = pack_sheets(&sheets, &auto_cfg).expect("valid config");
    assert!(auto.unplaced.len() <= trial.unplaced.len());
    assert!(auto.total_height <= trial.total_height);
}

#[test]
fn auto_with_time_budget_still_returns_a_layout() {
    let cfg = PackerConfig {
        rotation: RotationPolicy::Auto,
        time_budget_ms: Some(1),
        ..Default::default()
    };
    let sheets = vec![req("a", 30.0, 20.0), req("b", 30.0, 20.0)];
    let out = pack_sheets(&sheets, &cfg).expect("valid config");
    assert_eq!(out.placements.len(), 2);
    assert_eq!(out.total_height, 20.0);
}

#[test]
fn pack_keeps_given_order() {
    // `pack` does not sort: the narrow sheet goes first and lands at the origin.
    let out = pack(60.0, 96.0, &[req("narrow", 10.0, 10.0), req("wide", 50.0, 10.0)])
        .expect("valid config");
    assert_eq!(out.placements[0].id, "narrow");
    assert_eq!((out.placements[0].x, out.placements[0].y), (0.0, 0.0));
    assert_eq!((out.placements[1].x, out.placements[1].y), (10.0, 0.0));
}
