use crate::config::{PackerConfig, RotationPolicy};
use crate::error::Result;
use crate::model::{PackResult, Placement, SheetRequest, Unplaced, UnplacedReason};
use tracing::{debug, instrument, warn};

pub mod scorer;
pub mod section;
pub mod skyline;

use scorer::{Orientation, Scorer, orientations};
use section::SectionManager;
use skyline::Skyline;

/// A packer commits sheets one at a time, in the order they are handed in.
///
/// Implementations must ensure no overlaps and keep every placement inside the strip width
/// and inside one section. `pack` returns the reason when the sheet cannot be placed at all.
pub trait Packer<K> {
    /// True if `request` fits in the current section without opening a new one.
    fn can_pack(&self, request: &SheetRequest<K>) -> bool;
    fn pack(
        &mut self,
        request_index: usize,
        request: &SheetRequest<K>,
    ) -> std::result::Result<Placement<K>, UnplacedReason>;
}

/// Skyline packer over a fixed-width strip cut into sections of bounded height.
///
/// Built fresh for every run; owns its skyline and section state.
pub struct SectionPacker {
    container_width: f64,
    policy: RotationPolicy,
    scorer: Scorer,
    skyline: Skyline,
    sections: SectionManager,
}

impl SectionPacker {
    pub fn new(cfg: &PackerConfig) -> Self {
        Self {
            container_width: cfg.container_width,
            policy: cfg.rotation,
            scorer: Scorer::new(cfg.weights, cfg.max_section_height),
            skyline: Skyline::new(cfg.container_width, 0.0),
            sections: SectionManager::new(cfg.max_section_height),
        }
    }

    pub fn skyline(&self) -> &Skyline {
        &self.skyline
    }

    pub fn sections(&self) -> &SectionManager {
        &self.sections
    }

    /// Why a `w x h` sheet cannot fit even an empty section, if it cannot.
    fn unfit_reason(&self, w: f64, h: f64, orients: &[Orientation]) -> Option<UnplacedReason> {
        let max_h = self.sections.max_height();
        let mut narrowest = f64::INFINITY;
        let mut shortest_fitting: Option<f64> = None;
        for &o in orients {
            let (cw, ch) = o.dims(w, h);
            narrowest = narrowest.min(cw);
            if cw <= self.container_width {
                if ch <= max_h {
                    return None;
                }
                shortest_fitting = Some(shortest_fitting.map_or(ch, |s| s.min(ch)));
            }
        }
        Some(match shortest_fitting {
            Some(height) => UnplacedReason::TooTall { height },
            None => UnplacedReason::TooWide { width: narrowest },
        })
    }

    /// Reason reported when even a fresh section yields no candidate.
    fn stuck_reason(&self, w: f64, h: f64, orients: &[Orientation]) -> UnplacedReason {
        let height = orients
            .iter()
            .map(|o| o.dims(w, h))
            .filter(|&(cw, _)| cw <= self.container_width)
            .map(|(_, ch)| ch)
            .fold(f64::INFINITY, f64::min);
        UnplacedReason::TooTall { height }
    }

    /// Closes the section and returns `(boundaries, total_height)`.
    pub fn finish(self) -> (Vec<f64>, f64) {
        self.sections.finish()
    }
}

impl<K: Clone> Packer<K> for SectionPacker {
    fn can_pack(&self, request: &SheetRequest<K>) -> bool {
        if !request.is_valid() {
            return false;
        }
        let orients = orientations(self.policy, request.width, request.height);
        self.scorer
            .best_candidate(
                self.skyline.segments(),
                self.sections.start(),
                request.width,
                request.height,
                orients,
            )
            .is_some()
    }

    fn pack(
        &mut self,
        request_index: usize,
        request: &SheetRequest<K>,
    ) -> std::result::Result<Placement<K>, UnplacedReason> {
        if !request.is_valid() {
            return Err(UnplacedReason::InvalidDimensions);
        }
        let (w, h) = (request.width, request.height);
        let orients = orientations(self.policy, w, h);

        // Dropped without opening a section when no empty section could hold it.
        if let Some(reason) = self.unfit_reason(w, h, orients) {
            return Err(reason);
        }

        let best = self.scorer.best_candidate(
            self.skyline.segments(),
            self.sections.start(),
            w,
            h,
            orients,
        );
        let cand = match best {
            Some(c) => c,
            None if self.sections.is_empty() => return Err(self.stuck_reason(w, h, orients)),
            None => {
                let start = self.sections.open_next(&mut self.skyline);
                debug!(
                    section = self.sections.index(),
                    start, request_index, "opened new section"
                );
                // Single retry against the fresh full-width segment.
                self.scorer
                    .best_candidate(self.skyline.segments(), start, w, h, orients)
                    .ok_or_else(|| self.stuck_reason(w, h, orients))?
            }
        };

        self.sections.record(cand.y, cand.height);
        self.skyline
            .place(cand.segment_index, cand.width, cand.height);

        Ok(Placement {
            request_index,
            id: request.id.clone(),
            x: cand.x,
            y: cand.y,
            width: cand.width,
            height: cand.height,
            rotated: cand.orientation.is_rotated(),
            section_index: self.sections.index(),
        })
    }
}

/// Packs `ordered` into a strip of `container_width` cut into sections of at most
/// `max_section_height`, trying both orientations of every sheet.
///
/// The order of `ordered` is kept; see [`crate::ordering`] for the recommended sort.
pub fn pack<K: Clone>(
    container_width: f64,
    max_section_height: f64,
    ordered: &[SheetRequest<K>],
) -> Result<PackResult<K>> {
    let cfg = PackerConfig {
        container_width,
        max_section_height,
        ..Default::default()
    };
    pack_with_config(ordered, &cfg)
}

#[instrument(skip_all, fields(count = ordered.len()))]
/// Same as [`pack`] with explicit weights and rotation policy from `cfg`.
/// Ordering options in `cfg` are ignored here; `ordered` is packed as given.
pub fn pack_with_config<K: Clone>(
    ordered: &[SheetRequest<K>],
    cfg: &PackerConfig,
) -> Result<PackResult<K>> {
    cfg.validate()?;
    cfg.check_request_count(ordered.len())?;

    let mut packer = SectionPacker::new(cfg);
    let mut placements = Vec::with_capacity(ordered.len());
    let mut unplaced = Vec::new();

    for (i, req) in ordered.iter().enumerate() {
        match packer.pack(i, req) {
            Ok(p) => placements.push(p),
            Err(reason) => {
                warn!(
                    request_index = i,
                    width = req.width,
                    height = req.height,
                    ?reason,
                    "sheet does not fit in any section"
                );
                unplaced.push(Unplaced {
                    request_index: i,
                    id: req.id.clone(),
                    width: req.width,
                    height: req.height,
                    reason,
                });
            }
        }
    }

    let (section_boundaries, total_height) = packer.finish();
    Ok(PackResult {
        placements,
        section_boundaries,
        total_height,
        unplaced,
    })
}
