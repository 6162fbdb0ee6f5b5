//! Threshold predicates producing boolean masks
//!
//! Each cell is tested independently. Bounds are inclusive: an optimal
//! range `[min, max]` accepts both endpoints.

use super::{Mask, MASK_FALSE, MASK_NODATA, MASK_TRUE};
use crate::maybe_rayon::*;
use cropsuit_core::raster::Raster;
use cropsuit_core::{Error, Result};
use ndarray::Array2;

/// Build a mask from an arbitrary per-cell predicate.
///
/// No-data input cells become [`MASK_NODATA`]; the predicate only sees
/// valid values.
pub fn threshold_mask<P>(raster: &Raster<f64>, predicate: P) -> Result<Mask>
where
    P: Fn(f64) -> bool + Sync + Send,
{
    let rows = raster.rows();
    let input = raster.data();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            input
                .row(row)
                .iter()
                .map(|&val| {
                    if raster.is_nodata(val) {
                        MASK_NODATA
                    } else if predicate(val) {
                        MASK_TRUE
                    } else {
                        MASK_FALSE
                    }
                })
                .collect::<Vec<u8>>()
        })
        .collect();

    let mut mask = raster.with_same_meta::<u8>(MASK_NODATA);
    mask.set_nodata(Some(MASK_NODATA));
    *mask.data_mut() =
        Array2::from_shape_vec(raster.shape(), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(mask)
}

/// True where `min <= value <= max`.
pub fn range_mask(raster: &Raster<f64>, min: f64, max: f64) -> Result<Mask> {
    if min.is_nan() || max.is_nan() || min > max {
        return Err(Error::InvalidParameter {
            name: "range",
            value: format!("[{}, {}]", min, max),
            reason: "min must not exceed max".to_string(),
        });
    }
    threshold_mask(raster, |v| v >= min && v <= max)
}

/// True where `value >= min`.
pub fn at_least_mask(raster: &Raster<f64>, min: f64) -> Result<Mask> {
    if min.is_nan() {
        return Err(Error::InvalidParameter {
            name: "min",
            value: min.to_string(),
            reason: "must be a number".to_string(),
        });
    }
    threshold_mask(raster, |v| v >= min)
}
