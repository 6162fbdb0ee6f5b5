//! Raster data structures

mod element;
mod geotransform;
mod grid;
mod series;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use series::{RasterTimeSeries, MONTHS_PER_YEAR};
