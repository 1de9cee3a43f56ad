use serde::{Deserialize, Serialize};
use std::fmt;

/// A sheet to lay out. Units are arbitrary but must be consistent (inches in the default config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetRequest<K = String> {
    pub id: K,
    pub width: f64,
    pub height: f64,
}

impl<K> SheetRequest<K> {
    pub fn new(id: K, width: f64, height: f64) -> Self {
        Self { id, width, height }
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// One piece of the skyline: from `x` to `x + width` (exclusive) the top occupied edge is at `y`.
/// `y` is absolute, i.e. it already includes the offset of the current section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl Segment {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self { x, y, width }
    }
    /// Exclusive right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// A committed position for one request (post-rotation width/height).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement<K = String> {
    /// Index of the request in the list handed to the packer.
    pub request_index: usize,
    pub id: K,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// True if width and height were swapped relative to the request.
    pub rotated: bool,
    /// 0-based section the placement belongs to.
    pub section_index: usize,
}

impl<K> Placement<K> {
    /// Exclusive right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    /// Exclusive bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
    /// True if the interiors of `self` and `other` intersect. Touching edges do not overlap.
    pub fn overlaps<L>(&self, other: &Placement<L>) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Why a request could not be placed in any section.
///
/// The size variants carry the dimension that blocked the sheet, taken from the
/// orientations the rotation policy allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnplacedReason {
    /// Zero, negative or non-finite width/height.
    InvalidDimensions,
    /// Wider than the container in every allowed orientation; `width` is the narrowest of them.
    TooWide { width: f64 },
    /// Fits the container width only in orientations longer than one section;
    /// `height` is the shortest of those.
    TooTall { height: f64 },
}

impl UnplacedReason {
    /// Stable snake_case name, as used in exported layouts.
    pub fn kind(&self) -> &'static str {
        match self {
            UnplacedReason::InvalidDimensions => "invalid_dimensions",
            UnplacedReason::TooWide { .. } => "too_wide",
            UnplacedReason::TooTall { .. } => "too_tall",
        }
    }
}

/// A request that was dropped, reported back instead of silently lost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unplaced<K = String> {
    pub request_index: usize,
    pub id: K,
    pub width: f64,
    pub height: f64,
    pub reason: UnplacedReason,
}

impl<K: fmt::Display> Unplaced<K> {
    /// User-facing explanation naming the dimension that did not fit and the limit it broke.
    pub fn message(&self, container_width: f64, max_section_height: f64) -> String {
        let (w, h) = (self.width, self.height);
        match self.reason {
            UnplacedReason::InvalidDimensions => format!(
                "Sheet '{}' has invalid dimensions ({w}\" x {h}\"); both sides must be positive.",
                self.id
            ),
            UnplacedReason::TooWide { width } => format!(
                "Sheet '{}' ({w}\" x {h}\") is too large! It is {width}\" wide in every allowed orientation, more than the container width of {container_width}\".",
                self.id
            ),
            UnplacedReason::TooTall { height } => format!(
                "Sheet '{}' ({w}\" x {h}\") is too large! Where it fits the container width of {container_width}\" it is {height}\" long, more than the max section length of {max_section_height}\".",
                self.id
            ),
        }
    }
}

/// One section of the strip, `[start, end)` on the vertical axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl Section {
    pub fn height(&self) -> f64 {
        self.end - self.start
    }
}

/// Output of a packing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackResult<K = String> {
    pub placements: Vec<Placement<K>>,
    /// Absolute end of every section, strictly increasing.
    pub section_boundaries: Vec<f64>,
    pub total_height: f64,
    pub unplaced: Vec<Unplaced<K>>,
}

impl<K> Default for PackResult<K> {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
            section_boundaries: Vec::new(),
            total_height: 0.0,
            unplaced: Vec::new(),
        }
    }
}

impl<K> PackResult<K> {
    /// Returns true if every request was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn section_count(&self) -> usize {
        self.section_boundaries.len()
    }

    /// Sections as `[start, end)` ranges derived from the boundaries.
    pub fn sections(&self) -> Vec<Section> {
        let mut start = 0.0;
        self.section_boundaries
            .iter()
            .enumerate()
            .map(|(index, &end)| {
                let s = Section { index, start, end };
                start = end;
                s
            })
            .collect()
    }

    /// Cut lines between sections: every boundary except the final one.
    pub fn section_lines(&self) -> &[f64] {
        match self.section_boundaries.split_last() {
            Some((_, lines)) => lines,
            None => &[],
        }
    }

    /// Placements belonging to section `index`.
    pub fn placements_in(&self, index: usize) -> impl Iterator<Item = &Placement<K>> {
        self.placements
            .iter()
            .filter(move |p| p.section_index == index)
    }

    /// Computes packing statistics for a strip of `container_width`.
    pub fn stats(&self, container_width: f64) -> PackStats {
        let used_area: f64 = self.placements.iter().map(|p| p.width * p.height).sum();
        let total_area = container_width * self.total_height;
        let occupancy = if total_area > 0.0 {
            used_area / total_area
        } else {
            0.0
        };
        PackStats {
            num_sections: self.section_count(),
            num_placed: self.placements.len(),
            num_unplaced: self.unplaced.len(),
            num_rotated: self.placements.iter().filter(|p| p.rotated).count(),
            total_height: self.total_height,
            used_area,
            total_area,
            occupancy,
        }
    }
}

/// Statistics about strip usage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    pub num_sections: usize,
    pub num_placed: usize,
    pub num_unplaced: usize,
    pub num_rotated: usize,
    pub total_height: f64,
    /// Sum of placed sheet areas.
    pub used_area: f64,
    /// `container_width * total_height`.
    pub total_area: f64,
    /// used_area / total_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sections: {}, Placed: {}, Unplaced: {}, Rotated: {}, Total Height: {:.2}, Occupancy: {:.2}%",
            self.num_sections,
            self.num_placed,
            self.num_unplaced,
            self.num_rotated,
            self.total_height,
            self.occupancy * 100.0,
        )
    }

    /// Returns the unused strip area.
    pub fn wasted_area(&self) -> f64 {
        (self.total_area - self.used_area).max(0.0)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_area > 0.0 {
            (self.wasted_area() / self.total_area) * 100.0
        } else {
            0.0
        }
    }
}
