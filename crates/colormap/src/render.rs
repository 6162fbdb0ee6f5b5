//! Raster-to-RGBA rendering using palettes.

use crate::scheme::{Palette, PaletteError, Rgb, SUITABILITY_PALETTE};
use cropsuit_core::raster::{Raster, RasterElement};

/// Visualization parameters: value range, palette and no-data color.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    /// Palette spread over [min, max].
    pub palette: Palette,
    /// Minimum value for normalization. Values below this are clamped.
    pub min: f64,
    /// Maximum value for normalization. Values above this are clamped.
    pub max: f64,
    /// Color for no-data pixels (RGBA). Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    /// Params with an explicit range.
    pub fn with_range(palette: Palette, min: f64, max: f64) -> Self {
        Self {
            palette,
            min,
            max,
            nodata_color: [0, 0, 0, 0],
        }
    }

    /// [`SUITABILITY_PALETTE`] over [0, 1], with masked cells transparent.
    pub fn suitability() -> Result<Self, PaletteError> {
        Ok(Self::with_range(Palette::from_specs(&SUITABILITY_PALETTE)?, 0.0, 1.0))
    }
}

/// Convert a raster to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4` in row-major order.
/// No-data pixels are rendered with `params.nodata_color`.
pub fn raster_to_rgba<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Vec<u8> {
    let range = params.max - params.min;
    let inv_range = if range.abs() > f64::EPSILON {
        1.0 / range
    } else {
        1.0
    };

    let mut rgba = Vec::with_capacity(raster.len() * 4);

    for &val in raster.data().iter() {
        let value = if raster.is_nodata(val) { None } else { val.to_f64() };
        match value {
            Some(v) if v.is_finite() => {
                let Rgb { r, g, b } = params.palette.evaluate((v - params.min) * inv_range);
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
            _ => rgba.extend_from_slice(&params.nodata_color),
        }
    }

    rgba
}
