//! Band math operations
//!
//! Apply arithmetic to one raster, or to two rasters cell by cell.

use crate::maybe_rayon::*;
use cropsuit_core::raster::Raster;
use cropsuit_core::{Error, Result};
use ndarray::Array2;

/// Apply a unary function to every cell in a raster.
///
/// No-data cells come out as NaN; the output's no-data value is NaN.
///
/// # Example
/// ```ignore
/// // SoilGrids stores pH x 10
/// let ph = band_math(&soil_raw, |v| v / 10.0)?;
/// ```
pub fn band_math<F>(raster: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let rows = raster.rows();
    let input = raster.data();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            input
                .row(row)
                .iter()
                .map(|&val| if raster.is_nodata(val) { f64::NAN } else { f(val) })
                .collect::<Vec<f64>>()
        })
        .collect();

    finish(raster, data)
}

/// Combine two rasters cell by cell with `f`.
///
/// Both rasters must lie on the same grid. No-data in either input
/// produces NaN in the output.
pub fn band_math_binary<F>(a: &Raster<f64>, b: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    a.ensure_same_grid(b)?;

    let (rows, cols) = a.shape();
    let da = a.data();
    let db = b.data();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let va = da[(row, col)];
                let vb = db[(row, col)];
                if a.is_nodata(va) || b.is_nodata(vb) {
                    continue;
                }
                *out = f(va, vb);
            }
            row_data
        })
        .collect();

    finish(a, data)
}

fn finish(reference: &Raster<f64>, data: Vec<f64>) -> Result<Raster<f64>> {
    let mut output = reference.with_same_meta::<f64>(f64::NAN);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec(reference.shape(), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}
