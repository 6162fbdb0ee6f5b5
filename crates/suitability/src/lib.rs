//! # cropsuit-suitability
//!
//! Sweet-corn land suitability from 1981-2010 monthly climate normals and
//! topsoil pH, following FAO EcoCrop optimal ranges.
//!
//! The pipeline runs four stages in order:
//!
//! - **Load**: monthly precipitation, mean and minimum temperature, plus soil pH
//! - **Evaluate**: one boolean mask per constraint
//! - **Combine**: fuzzy AND of the masks; unsuitable cells are masked out
//! - **Export**: warp to the target CRS and region, write a GeoTIFF
//!
//! ```ignore
//! use cropsuit_suitability::prelude::*;
//!
//! let pipeline = SuitabilityPipeline::new(PipelineConfig::default(), CropThresholds::SWEET_CORN);
//! let report = pipeline.run(&DirectorySource::new("data"), &DirectoryDestination::new("exports"))?;
//! ```

pub mod combiner;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod exporter;
pub mod loader;
pub mod pipeline;
pub mod thresholds;

pub use combiner::{combine, Suitability, SuitabilitySummary};
pub use config::{DatasetCatalog, ExportParams, PipelineConfig};
pub use error::{ConfigError, ExportError, LoadError, PipelineError, Result};
pub use evaluator::{evaluate_constraints, ConstraintMasks};
pub use exporter::{DirectoryDestination, ExportReport};
pub use loader::{load_inputs, ClimateInputs, DirectorySource, MemorySource, RasterSource};
pub use pipeline::{Stage, SuitabilityPipeline};
pub use thresholds::CropThresholds;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DatasetCatalog, ExportParams, PipelineConfig};
    pub use crate::error::{ExportError, LoadError, PipelineError};
    pub use crate::exporter::{DirectoryDestination, ExportReport};
    pub use crate::loader::{DirectorySource, MemorySource, RasterSource};
    pub use crate::pipeline::{Stage, SuitabilityPipeline};
    pub use crate::thresholds::CropThresholds;
}
