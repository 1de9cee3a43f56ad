use crate::config::{PackerConfig, RotationPolicy};
use crate::model::PackResult;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Layout-level metadata (common fields used by exporters/templates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Schema version of the JSON layout formats; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub container_width: f64,
    pub max_section_height: f64,
    pub rotation: RotationPolicy,
    pub pre_rotate: bool,
}

impl Meta {
    pub fn from_config(cfg: &PackerConfig) -> Self {
        Self {
            schema_version: "1".into(),
            app: "sheet-packer".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            container_width: cfg.container_width,
            max_section_height: cfg.max_section_height,
            rotation: cfg.rotation,
            pre_rotate: cfg.pre_rotate,
        }
    }
}

/// Serialize the layout as `{ placements, sections, sectionBoundaries, totalHeight, unplaced, meta }`.
/// Suitable for generic tooling and simple consumption.
pub fn to_json<K: fmt::Display>(result: &PackResult<K>, cfg: &PackerConfig) -> Value {
    let placements: Vec<Value> = result
        .placements
        .iter()
        .map(|p| {
            json!({
                "id": p.id.to_string(),
                "index": p.request_index,
                "frame": {"x": p.x, "y": p.y, "w": p.width, "h": p.height},
                "rotated": p.rotated,
                "section": p.section_index,
            })
        })
        .collect();
    let sections: Vec<Value> = result
        .sections()
        .iter()
        .map(|s| {
            json!({
                "index": s.index,
                "start": s.start,
                "end": s.end,
                "count": result.placements_in(s.index).count(),
            })
        })
        .collect();
    json!({
        "placements": placements,
        "sections": sections,
        "sectionBoundaries": &result.section_boundaries,
        "totalHeight": result.total_height,
        "unplaced": unplaced_json(result, cfg),
        "meta": Meta::from_config(cfg),
    })
}

/// Flatten placements keyed by sheet id.
/// Shape: `{ placements: { id: { frame, rotated, section, sectionRange } }, unplaced, meta }`.
/// Duplicate ids keep the last placement.
pub fn to_json_hash<K: fmt::Display>(result: &PackResult<K>, cfg: &PackerConfig) -> Value {
    let sections = result.sections();
    let mut placements = serde_json::Map::new();
    for p in &result.placements {
        let range = sections
            .get(p.section_index)
            .map(|s| json!({"start": s.start, "end": s.end}))
            .unwrap_or(Value::Null);
        placements.insert(
            p.id.to_string(),
            json!({
                "frame": {"x": p.x, "y": p.y, "w": p.width, "h": p.height},
                "rotated": p.rotated,
                "section": p.section_index,
                "sectionRange": range,
            }),
        );
    }
    json!({
        "placements": placements,
        "unplaced": unplaced_json(result, cfg),
        "meta": Meta::from_config(cfg),
    })
}

fn unplaced_json<K: fmt::Display>(result: &PackResult<K>, cfg: &PackerConfig) -> Vec<Value> {
    result
        .unplaced
        .iter()
        .map(|u| {
            let message = u.message(cfg.container_width, cfg.max_section_height);
            json!({
                "id": u.id.to_string(),
                "index": u.request_index,
                "w": u.width,
                "h": u.height,
                "reason": u.reason.kind(),
                "message": message,
            })
        })
        .collect()
}
