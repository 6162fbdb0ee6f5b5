//! Raster algebra
//!
//! Element-wise arithmetic on one or two rasters sharing a grid.

mod band_math;

pub use band_math::{band_math, band_math_binary};
