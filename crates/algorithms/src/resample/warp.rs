//! Nearest-neighbour reprojection onto a region-clipped target grid
//!
//! The target grid covers the envelope of a lon/lat [`Region`] in the
//! target projection. Every output cell centre is taken back to lon/lat;
//! cells outside the region are no-data, the rest copy the source cell
//! under that point.

use crate::maybe_rayon::*;
use cropsuit_core::crs::METERS_PER_DEGREE;
use cropsuit_core::raster::{GeoTransform, Raster, RasterElement};
use cropsuit_core::{Error, Projection, Region, Result, CRS};
use ndarray::Array2;

/// Output grid of a warp: projection, georeferencing and dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    pub crs: CRS,
    pub projection: Projection,
    pub region: Region,
    pub transform: GeoTransform,
    pub rows: usize,
    pub cols: usize,
}

impl TargetGrid {
    /// Lay out a grid over `region` in `crs` with `scale` metres per cell.
    ///
    /// For geographic targets the scale is converted to degrees at the
    /// equator.
    pub fn for_region(region: Region, crs: &CRS, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "scale",
                value: scale.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        let projection = crs.projection()?;
        region.validate_for(&projection)?;

        let cell = if projection.is_geographic() {
            scale / METERS_PER_DEGREE
        } else {
            scale
        };

        let (min_x, min_y, max_x, max_y) = region.envelope(&projection);
        let cols = ((max_x - min_x) / cell).ceil().max(1.0) as usize;
        let rows = ((max_y - min_y) / cell).ceil().max(1.0) as usize;

        Ok(Self {
            crs: crs.clone(),
            projection,
            region,
            transform: GeoTransform::new(min_x, max_y, cell, -cell),
            rows,
            cols,
        })
    }

    /// Number of output cells
    pub fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resample `source` onto `target` by nearest neighbour.
///
/// The source CRS is taken from the raster, or assumed geographic when
/// unset. No-data in the output uses the source's no-data value (or the
/// type default).
pub fn warp<T: RasterElement>(source: &Raster<T>, target: &TargetGrid) -> Result<Raster<T>> {
    let source_projection = match source.crs() {
        Some(crs) => crs.projection()?,
        None => Projection::Geographic,
    };
    let nodata = source.nodata().unwrap_or_else(T::default_nodata);

    let TargetGrid {
        rows,
        cols,
        transform,
        projection,
        region,
        ..
    } = target;

    let data: Vec<T> = (0..*rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..*cols)
                .map(|col| {
                    let (x, y) = transform.pixel_to_geo(col, row);
                    let (lon, lat) = projection.inverse(x, y);
                    if !region.contains(lon, lat) {
                        return nodata;
                    }
                    let (sx, sy) = source_projection.forward(lon, lat);
                    source.sample(sx, sy).unwrap_or(nodata)
                })
                .collect::<Vec<T>>()
        })
        .collect();

    let array = Array2::from_shape_vec((*rows, *cols), data).map_err(|e| Error::Other(e.to_string()))?;
    let mut output = Raster::from_array(array);
    output.set_transform(*transform);
    output.set_crs(Some(target.crs.clone()));
    output.set_nodata(Some(nodata));
    Ok(output)
}
