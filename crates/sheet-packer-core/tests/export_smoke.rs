use sheet_packer_core::prelude::*;
use sheet_packer_core::{to_json, to_json_hash};

#[test]
fn export_json_and_hash_smoke() {
    let cfg = PackerConfig::builder()
        .with_dimensions(60.0, 96.0)
        .rotation(RotationPolicy::PerPlacementTrial)
        .build();
    let sheets = vec![
        SheetRequest::new("door".to_string(), 48.0, 24.0),
        SheetRequest::new("shelf".to_string(), 12.0, 30.0),
        SheetRequest::new("slab".to_string(), 70.0, 120.0),
    ];
    let out = pack_sheets(&sheets, &cfg).expect("pack");

    // json
    let j = to_json(&out, &cfg);
    let obj = j.as_object().expect("object");
    for key in [
        "placements",
        "sections",
        "sectionBoundaries",
        "totalHeight",
        "unplaced",
        "meta",
    ] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    assert_eq!(obj["placements"].as_array().expect("array").len(), 2);
    assert_eq!(obj["meta"]["app"], "sheet-packer");
    assert_eq!(obj["meta"]["schema_version"], "1");
    assert_eq!(obj["meta"]["rotation"], "per_placement_trial");

    let unplaced = obj["unplaced"].as_array().expect("array");
    assert_eq!(unplaced.len(), 1);
    assert_eq!(unplaced[0]["id"], "slab");
    assert_eq!(unplaced[0]["index"], 2);
    assert_eq!(unplaced[0]["reason"], "too_wide");
    let msg = unplaced[0]["message"].as_str().expect("message");
    assert!(msg.contains("too large"), "{msg}");
    assert!(msg.contains("slab"));

    let sections = obj["sections"].as_array().expect("array");
    let counted: u64 = sections
        .iter()
        .map(|s| s["count"].as_u64().expect("count"))
        .sum();
    assert_eq!(counted, 2);

    // json-hash
    let jh = to_json_hash(&out, &cfg);
    let obj = jh.as_object().expect("object");
    assert!(obj.contains_key("placements"));
    assert!(obj.contains_key("meta"));
    let door = &obj["placements"]["door"];
    assert_eq!(door["frame"]["w"], 48.0);
    assert_eq!(door["sectionRange"]["start"], 0.0);
}

#[test]
fn result_round_trips_through_serde() {
    let out = pack(60.0, 96.0, &[SheetRequest::new("a".to_string(), 10.0, 20.0)]).expect("pack");
    let s = serde_json::to_string(&out).expect("serialize");
    assert!(s.contains("\"section_boundaries\":[20.0]"));
    let back: PackResult = serde_json::from_str(&s).expect("deserialize");
    assert_eq!(back, out);
}

#[test]
fn unplaced_reason_serializes_with_its_blocking_dimension() {
    let out = pack(60.0, 96.0, &[SheetRequest::new("slab".to_string(), 70.0, 120.0)]).expect("pack");
    let v = serde_json::to_value(&out.unplaced[0].reason).expect("serialize");
    assert_eq!(v["kind"], "too_wide");
    assert_eq!(v["width"], 70.0);
    let back: UnplacedReason = serde_json::from_value(v).expect("deserialize");
    assert_eq!(back, UnplacedReason::TooWide { width: 70.0 });
}
