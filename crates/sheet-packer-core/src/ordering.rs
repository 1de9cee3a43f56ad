//! Input ordering applied before packing: optional tall-sheet pre-rotation, then a sort.
//!
//! Pure functions; the packer itself never reorders.

use crate::config::{PackerConfig, SortOrder};
use crate::model::SheetRequest;
use std::cmp::Ordering;

/// A request as handed to the packer, remembering where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedRequest<K = String> {
    /// Index in the caller's original list.
    pub source_index: usize,
    /// True if width and height were swapped by the pre-rotation step.
    pub pre_rotated: bool,
    pub request: SheetRequest<K>,
}

/// Tall sheets are laid on their side when `height > aspect * width` and
/// `height > width_fraction * container_width`.
pub fn should_pre_rotate(width: f64, height: f64, cfg: &PackerConfig) -> bool {
    height > cfg.pre_rotate_aspect * width
        && height > cfg.pre_rotate_width_fraction * cfg.container_width
}

/// Applies pre-rotation (when `cfg.pre_rotate`) and sorts per `cfg.sort_order`.
/// Sorting is stable, so equal keys keep their input order.
pub fn order_requests<K: Clone + Ord>(
    sheets: &[SheetRequest<K>],
    cfg: &PackerConfig,
) -> Vec<OrderedRequest<K>> {
    let mut out: Vec<OrderedRequest<K>> = sheets
        .iter()
        .enumerate()
        .map(|(source_index, s)| {
            let pre_rotated = cfg.pre_rotate && should_pre_rotate(s.width, s.height, cfg);
            let request = if pre_rotated {
                SheetRequest::new(s.id.clone(), s.height, s.width)
            } else {
                s.clone()
            };
            OrderedRequest {
                source_index,
                pre_rotated,
                request,
            }
        })
        .collect();

    match cfg.sort_order {
        SortOrder::None => {}
        SortOrder::WidthThenArea => sort_width_then_area(&mut out, cfg.width_tolerance),
        SortOrder::AreaDesc => {
            out.sort_by(|a, b| desc(a.request.area(), b.request.area()));
        }
        SortOrder::HeightDesc => {
            out.sort_by(|a, b| desc(a.request.height, b.request.height));
        }
        SortOrder::MaxSideDesc => out.sort_by(|a, b| {
            desc(
                a.request.width.max(a.request.height),
                b.request.width.max(b.request.height),
            )
        }),
        SortOrder::IdAsc => out.sort_by(|a, b| a.request.id.cmp(&b.request.id)),
    }
    out
}

#[inline]
fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Widest first; a run of widths that stay within `tolerance` of the run's widest member
/// is treated as one width class and ordered by area, largest first.
///
/// Grouping first keeps the comparison a total order, which a pairwise
/// "within tolerance means equal" comparator is not.
fn sort_width_then_area<K>(items: &mut [OrderedRequest<K>], tolerance: f64) {
    items.sort_by(|a, b| desc(a.request.width, b.request.width));
    let mut start = 0;
    while start < items.len() {
        let lead = items[start].request.width;
        let mut end = start + 1;
        while end < items.len() && lead - items[end].request.width <= tolerance {
            end += 1;
        }
        items[start..end].sort_by(|a, b| desc(a.request.area(), b.request.area()));
        start = end;
    }
}
