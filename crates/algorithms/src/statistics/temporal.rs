//! Temporal reduction
//!
//! Collapse a monthly [`RasterTimeSeries`] into one raster, cell by cell.

use crate::algebra::{band_math, band_math_binary};
use cropsuit_core::raster::{Raster, RasterTimeSeries};
use cropsuit_core::Result;

/// Annual total of a monthly series (e.g. precipitation normals).
///
/// A cell that is no-data in any month is no-data in the total. Masked
/// months are not skipped, so a partial year never passes as a full one.
pub fn annual_sum(series: &RasterTimeSeries<f64>) -> Result<Raster<f64>> {
    // band_math(identity) normalises no-data to NaN on the first member
    let mut total = band_math(series.reference(), |v| v)?;
    for member in series.iter().skip(1) {
        total = band_math_binary(&total, member, |a, b| a + b)?;
    }
    Ok(total)
}
