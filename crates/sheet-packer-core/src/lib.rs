//! Core library for laying out rectangular sheets in a fixed-width strip.
//!
//! The strip is cut into stacked sections, each at most `max_section_height` tall
//! (for example the length of a roll or stock board). Sheets are placed greedily on a
//! skyline; when a sheet no longer fits the current section a new section is started.
//!
//! - Packing: [`pack`] packs an already-ordered list; [`pack_sheets`] also applies the
//!   ordering policy and maps results back to the caller's order
//! - Rotation: per-placement trial (default), fixed, long-side-vertical or an auto portfolio
//! - Sheets that cannot fit anywhere are returned in `PackResult::unplaced`, never dropped silently
//!
//! Quick example:
//! ```
//! use sheet_packer_core::{SheetRequest, pack};
//! # fn main() -> sheet_packer_core::Result<()> {
//! let sheets = vec![SheetRequest::new("door", 48.0, 24.0)];
//! let out = pack(60.0, 96.0, &sheets)?;
//! assert_eq!(out.section_boundaries, vec![24.0]);
//! assert_eq!(out.total_height, 24.0);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod ordering;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::{Packer, SectionPacker, pack, pack_with_config};
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `sheet_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        PackerConfig, PackerConfigBuilder, RotationPolicy, ScoreWeights, SortOrder,
    };
    pub use crate::model::{
        PackResult, PackStats, Placement, Section, Segment, SheetRequest, Unplaced,
        UnplacedReason,
    };
    pub use crate::ordering::{OrderedRequest, order_requests};
    pub use crate::{pack, pack_sheets, pack_with_config};
}
