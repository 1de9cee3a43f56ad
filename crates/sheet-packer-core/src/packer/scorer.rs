use crate::config::{RotationPolicy, ScoreWeights};
use crate::model::Segment;

/// Orientation of a sheet relative to its request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Natural,
    Rotated,
}

impl Orientation {
    /// `(width, height)` of a `w x h` request in this orientation.
    #[inline]
    pub fn dims(self, w: f64, h: f64) -> (f64, f64) {
        match self {
            Orientation::Natural => (w, h),
            Orientation::Rotated => (h, w),
        }
    }

    #[inline]
    pub fn is_rotated(self) -> bool {
        matches!(self, Orientation::Rotated)
    }
}

const NATURAL: &[Orientation] = &[Orientation::Natural];
const ROTATED: &[Orientation] = &[Orientation::Rotated];
const BOTH: &[Orientation] = &[Orientation::Natural, Orientation::Rotated];

/// Orientations a `w x h` request is tried in under `policy`, in scan order.
pub fn orientations(policy: RotationPolicy, w: f64, h: f64) -> &'static [Orientation] {
    match policy {
        RotationPolicy::PerPlacementTrial | RotationPolicy::Auto => BOTH,
        RotationPolicy::Fixed => NATURAL,
        RotationPolicy::LongSideVertical if w > h => ROTATED,
        RotationPolicy::LongSideVertical => NATURAL,
    }
}

/// A feasible (segment, orientation) pair and its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub segment_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    pub score: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Scorer {
    weights: ScoreWeights,
    max_section_height: f64,
}

impl Scorer {
    pub fn new(weights: ScoreWeights, max_section_height: f64) -> Self {
        Self {
            weights,
            max_section_height,
        }
    }

    /// A `w x h` rectangle fits on `seg` if the segment is wide enough and the rectangle
    /// does not cross the end of the section starting at `section_start`.
    #[inline]
    pub fn is_feasible(&self, seg: &Segment, section_start: f64, w: f64, h: f64) -> bool {
        seg.width >= w && (seg.y - section_start) + h <= self.max_section_height
    }

    /// Lower is better: height dominates, then wasted segment width, then a small rotation cost.
    #[inline]
    pub fn score(&self, seg: &Segment, w: f64, orientation: Orientation) -> f64 {
        let penalty = if orientation.is_rotated() {
            self.weights.rotation_penalty
        } else {
            0.0
        };
        seg.y * self.weights.height + (seg.width - w) * self.weights.waste + penalty
    }

    /// Best candidate across every segment and every orientation in `orientations`.
    /// Ties keep the first pair in scan order (segments left to right, orientations in order).
    pub fn best_candidate(
        &self,
        segments: &[Segment],
        section_start: f64,
        w: f64,
        h: f64,
        orientations: &[Orientation],
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (i, seg) in segments.iter().enumerate() {
            for &o in orientations {
                let (cw, ch) = o.dims(w, h);
                if !self.is_feasible(seg, section_start, cw, ch) {
                    continue;
                }
                let score = self.score(seg, cw, o);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(Candidate {
                        segment_index: i,
                        x: seg.x,
                        y: seg.y,
                        width: cw,
                        height: ch,
                        orientation: o,
                        score,
                    });
                }
            }
        }
        best
    }
}
