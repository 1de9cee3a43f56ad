use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Packing configuration and the policies the engine can run with.
/// Key notes:
///   - `rotation` selects how the engine orients each sheet (per-placement trial by default)
///   - `pre_rotate` enables the tall-sheet pre-rotation applied once before sorting
///   - `time_budget_ms` and `parallel` affect Auto portfolio evaluation
///
/// How the engine orients a sheet when placing it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Score both orientations against every segment and keep the global minimum.
    PerPlacementTrial,
    /// Place sheets exactly as given. Pair with `pre_rotate` for the heuristic-only variant.
    Fixed,
    /// Always stand the longer side vertically before placing.
    LongSideVertical,
    /// Try a small portfolio of policies and keep the best result.
    Auto,
}

impl FromStr for RotationPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trial" | "per_placement_trial" | "both" => Ok(Self::PerPlacementTrial),
            "fixed" | "none" => Ok(Self::Fixed),
            "long_side_vertical" | "lsv" | "vertical" => Ok(Self::LongSideVertical),
            "auto" => Ok(Self::Auto),
            _ => Err(()),
        }
    }
}

/// Sorting orders applied to the requests before packing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Widest first (widths within `width_tolerance` compare equal), then largest area.
    WidthThenArea,
    AreaDesc,
    HeightDesc,
    MaxSideDesc,
    IdAsc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "width_then_area" | "width" => Ok(Self::WidthThenArea),
            "area_desc" => Ok(Self::AreaDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "id_asc" | "name_asc" => Ok(Self::IdAsc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// Weights of the candidate score `y * height + (segment.width - width) * waste + rotation_penalty`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    /// Multiplier on the candidate's y. Must dominate the other terms.
    pub height: f64,
    /// Multiplier on the width left over in the segment.
    pub waste: f64,
    /// Flat cost added to rotated candidates.
    pub rotation_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            height: 1000.0,
            waste: 0.1,
            rotation_penalty: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Fixed width of the strip.
    pub container_width: f64,
    /// Maximum height of a single section.
    pub max_section_height: f64,

    #[serde(default = "default_rotation")]
    pub rotation: RotationPolicy,
    /// Pre-rotate tall sheets once before sorting.
    #[serde(default)]
    pub pre_rotate: bool,
    /// Pre-rotate when `height > pre_rotate_aspect * width`...
    #[serde(default = "default_pre_rotate_aspect")]
    pub pre_rotate_aspect: f64,
    /// ...and `height > pre_rotate_width_fraction * container_width`.
    #[serde(default = "default_pre_rotate_width_fraction")]
    pub pre_rotate_width_fraction: f64,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    /// Widths closer than this compare equal under `SortOrder::WidthThenArea`.
    #[serde(default = "default_width_tolerance")]
    pub width_tolerance: f64,

    #[serde(default)]
    pub weights: ScoreWeights,

    /// Upper bound on the number of requests accepted by one run. None disables the check.
    #[serde(default = "default_max_requests")]
    pub max_requests: Option<usize>,

    // portfolio/parallel controls
    /// Optional time budget for the auto portfolio (milliseconds). None or 0 disables.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    /// Enable parallel candidate evaluation when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            container_width: 60.0,
            max_section_height: 96.0,
            rotation: default_rotation(),
            pre_rotate: false,
            pre_rotate_aspect: default_pre_rotate_aspect(),
            pre_rotate_width_fraction: default_pre_rotate_width_fraction(),
            sort_order: default_sort_order(),
            width_tolerance: default_width_tolerance(),
            weights: ScoreWeights::default(),
            max_requests: default_max_requests(),
            time_budget_ms: None,
            parallel: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - The container width or max section height is not positive and finite
    /// - A score weight or threshold is negative or not finite
    /// - The request limit is zero
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SheetPackerError;

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.container_width) || !positive(self.max_section_height) {
            return Err(SheetPackerError::InvalidDimensions {
                container_width: self.container_width,
                max_section_height: self.max_section_height,
            });
        }

        let w = &self.weights;
        for (name, v) in [
            ("weights.height", w.height),
            ("weights.waste", w.waste),
            ("weights.rotation_penalty", w.rotation_penalty),
            ("pre_rotate_aspect", self.pre_rotate_aspect),
            ("pre_rotate_width_fraction", self.pre_rotate_width_fraction),
            ("width_tolerance", self.width_tolerance),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SheetPackerError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if w.height == 0.0 {
            return Err(SheetPackerError::InvalidConfig(
                "weights.height must be positive so lower placements always win".into(),
            ));
        }

        if self.max_requests == Some(0) {
            return Err(SheetPackerError::InvalidConfig(
                "max_requests must be at least 1 (use None to disable the limit)".into(),
            ));
        }

        Ok(())
    }

    /// Fails with `TooManyRequests` when `count` is above `max_requests`.
    pub fn check_request_count(&self, count: usize) -> crate::error::Result<()> {
        match self.max_requests {
            Some(limit) if count > limit => {
                Err(crate::error::SheetPackerError::TooManyRequests { count, limit })
            }
            _ => Ok(()),
        }
    }
}

fn default_rotation() -> RotationPolicy {
    RotationPolicy::PerPlacementTrial
}
fn default_pre_rotate_aspect() -> f64 {
    1.5
}
fn default_pre_rotate_width_fraction() -> f64 {
    0.3
}
fn default_sort_order() -> SortOrder {
    SortOrder::WidthThenArea
}
fn default_width_tolerance() -> f64 {
    1.0
}
fn default_max_requests() -> Option<usize> {
    Some(10_000)
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_dimensions(mut self, container_width: f64, max_section_height: f64) -> Self {
        self.cfg.container_width = container_width;
        self.cfg.max_section_height = max_section_height;
        self
    }
    pub fn rotation(mut self, v: RotationPolicy) -> Self {
        self.cfg.rotation = v;
        self
    }
    pub fn pre_rotate(mut self, v: bool) -> Self {
        self.cfg.pre_rotate = v;
        self
    }
    pub fn pre_rotate_thresholds(mut self, aspect: f64, width_fraction: f64) -> Self {
        self.cfg.pre_rotate_aspect = aspect;
        self.cfg.pre_rotate_width_fraction = width_fraction;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn width_tolerance(mut self, v: f64) -> Self {
        self.cfg.width_tolerance = v;
        self
    }
    pub fn weights(mut self, v: ScoreWeights) -> Self {
        self.cfg.weights = v;
        self
    }
    pub fn max_requests(mut self, v: Option<usize>) -> Self {
        self.cfg.max_requests = v;
        self
    }
    pub fn time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.cfg.time_budget_ms = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
