//! Suitability masks
//!
//! Boolean masks are `Raster<u8>`: [`MASK_TRUE`] where a constraint holds,
//! [`MASK_FALSE`] where it does not, [`MASK_NODATA`] where the input was
//! missing.
//!
//! - **threshold**: Per-cell range and lower-bound predicates
//! - **fuzzy**: Boolean fuzzy AND across masks and self-masking

mod fuzzy;
mod threshold;

pub use fuzzy::{fuzzy_and, self_mask, MaskSummary, SUITABLE};
pub use threshold::{at_least_mask, range_mask, threshold_mask};

use cropsuit_core::Raster;

/// A boolean suitability mask
pub type Mask = Raster<u8>;

/// Constraint satisfied
pub const MASK_TRUE: u8 = 1;
/// Constraint not satisfied
pub const MASK_FALSE: u8 = 0;
/// Input missing at this cell
pub const MASK_NODATA: u8 = u8::MAX;
