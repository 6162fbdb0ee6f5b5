//! # cropsuit core
//!
//! Core types, traits and I/O for the cropsuit suitability pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type
//! - `RasterTimeSeries<T>`: Twelve monthly rasters on one grid
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS` and `Projection`: Coordinate reference systems and the map
//!   projections the exporter can target
//! - `Region`: Geographic rectangle used to clip exports
//! - Native GeoTIFF I/O

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;
pub mod region;

pub use crs::{Projection, CRS};
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement, RasterTimeSeries};
pub use region::Region;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{Projection, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement, RasterTimeSeries};
    pub use crate::region::Region;
}
