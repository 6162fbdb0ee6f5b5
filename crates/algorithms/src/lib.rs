//! # cropsuit algorithms
//!
//! Raster algebra used by the suitability pipeline.
//!
//! ## Algorithm Categories
//!
//! - **algebra**: Unary and binary band math
//! - **statistics**: Annual totals of monthly series
//! - **suitability**: Threshold masks, fuzzy AND, self-masking
//! - **resample**: Reprojection onto an export grid

pub mod algebra;
pub mod resample;
pub mod statistics;
pub mod suitability;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::algebra::{band_math, band_math_binary};
    pub use crate::resample::{warp, TargetGrid};
    pub use crate::statistics::annual_sum;
    pub use crate::suitability::{
        at_least_mask, fuzzy_and, range_mask, self_mask, threshold_mask, Mask, MaskSummary,
        MASK_FALSE, MASK_NODATA, MASK_TRUE, SUITABLE,
    };
    pub use cropsuit_core::prelude::*;
}
