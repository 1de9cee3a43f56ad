use crate::config::{PackerConfig, RotationPolicy};
use crate::error::Result;
use crate::model::{PackResult, SheetRequest};
use crate::ordering::order_requests;
use crate::packer::pack_with_config;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[instrument(skip_all, fields(count = sheets.len()))]
/// Orders `sheets` per `cfg`, packs them, and reports every placement against the caller's list.
///
/// Notes:
/// - `request_index` in the result refers to `sheets`, not to the sorted order.
/// - `rotated` is relative to the caller's dimensions (pre-rotation and engine rotation combined).
/// - When `rotation` is `Auto`, a small portfolio is tried and the best result is chosen
///   (fewest unplaced, then lowest total height, then fewest sections).
/// - `time_budget_ms` can limit Auto evaluation time; `parallel` may evaluate in parallel when enabled.
pub fn pack_sheets<K>(sheets: &[SheetRequest<K>], cfg: &PackerConfig) -> Result<PackResult<K>>
where
    K: Clone + Ord + Send + Sync,
{
    cfg.validate()?;
    cfg.check_request_count(sheets.len())?;

    if sheets.is_empty() {
        return Ok(PackResult::default());
    }

    if matches!(cfg.rotation, RotationPolicy::Auto) {
        return pack_auto(sheets, cfg);
    }
    pack_ordered(sheets, cfg)
}

fn pack_ordered<K: Clone + Ord>(
    sheets: &[SheetRequest<K>],
    cfg: &PackerConfig,
) -> Result<PackResult<K>> {
    let ordered = order_requests(sheets, cfg);
    let requests: Vec<SheetRequest<K>> = ordered.iter().map(|o| o.request.clone()).collect();
    let mut result = pack_with_config(&requests, cfg)?;

    for p in &mut result.placements {
        let o = &ordered[p.request_index];
        p.request_index = o.source_index;
        p.rotated ^= o.pre_rotated;
    }
    for u in &mut result.unplaced {
        let o = &ordered[u.request_index];
        u.request_index = o.source_index;
        if o.pre_rotated {
            std::mem::swap(&mut u.width, &mut u.height);
        }
    }
    Ok(result)
}

/// Candidate configurations evaluated in Auto mode, in preference order.
pub fn auto_candidates(base: &PackerConfig) -> Vec<PackerConfig> {
    let with = |rotation: RotationPolicy, pre_rotate: bool| {
        let mut c = base.clone();
        c.rotation = rotation;
        c.pre_rotate = pre_rotate;
        c
    };
    vec![
        with(RotationPolicy::PerPlacementTrial, false),
        with(RotationPolicy::PerPlacementTrial, true),
        with(RotationPolicy::Fixed, true),
        with(RotationPolicy::LongSideVertical, false),
    ]
}

/// Fewest unplaced, then lowest total height, then fewest sections.
fn compare_results<K>(a: &PackResult<K>, b: &PackResult<K>) -> Ordering {
    a.unplaced
        .len()
        .cmp(&b.unplaced.len())
        .then_with(|| a.total_height.total_cmp(&b.total_height))
        .then_with(|| a.section_count().cmp(&b.section_count()))
}

fn pack_auto<K>(sheets: &[SheetRequest<K>], base: &PackerConfig) -> Result<PackResult<K>>
where
    K: Clone + Ord + Send + Sync,
{
    let candidates = auto_candidates(base);

    // Parallel path (optional)
    #[cfg(feature = "parallel")]
    {
        if base.parallel {
            let results: Vec<PackResult<K>> = candidates
                .par_iter()
                .map(|cand| pack_ordered(sheets, cand))
                .collect::<Result<_>>()?;
            // min_by keeps the first of equal elements, so ties go to the earlier candidate.
            if let Some(best) = results.into_iter().min_by(compare_results) {
                return Ok(best);
            }
        }
    }

    // Sequential path with optional time budget
    let budget_ms = base.time_budget_ms.unwrap_or(0);
    let start = Instant::now();
    let mut best: Option<PackResult<K>> = None;
    for (i, cand) in candidates.iter().enumerate() {
        if best.is_some() && budget_ms > 0 && start.elapsed().as_millis() as u64 > budget_ms {
            debug!(evaluated = i, "auto time budget exhausted");
            break;
        }
        let out = pack_ordered(sheets, cand)?;
        debug!(
            candidate = i,
            rotation = ?cand.rotation,
            pre_rotate = cand.pre_rotate,
            total_height = out.total_height,
            unplaced = out.unplaced.len(),
            "auto candidate evaluated"
        );
        match &best {
            Some(b) if compare_results(&out, b) != Ordering::Less => {}
            _ => best = Some(out),
        }
    }
    Ok(best.unwrap_or_default())
}
