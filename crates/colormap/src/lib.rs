//! # cropsuit colormap
//!
//! Palettes and raster-to-RGBA rendering for static suitability quicklooks.
//!
//! ## Usage
//!
//! ```ignore
//! use cropsuit_colormap::{raster_to_rgba, ColormapParams, Palette, SUITABILITY_PALETTE};
//!
//! let params = ColormapParams::with_range(Palette::from_specs(&SUITABILITY_PALETTE)?, 0.0, 1.0);
//! let rgba = raster_to_rgba(&suitability, &params);
//! ```

mod render;
mod scheme;

pub use render::{raster_to_rgba, ColormapParams};
pub use scheme::{ColorStop, Palette, PaletteError, Rgb, SUITABILITY_PALETTE};
