//! Error types for the suitability pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain an input dataset from a raster store.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("dataset {dataset} band {band} unavailable: {reason}")]
    DataUnavailable {
        dataset: String,
        band: String,
        reason: String,
    },
}

impl LoadError {
    pub(crate) fn unavailable(dataset: &str, band: &str, reason: impl std::fmt::Display) -> Self {
        LoadError::DataUnavailable {
            dataset: dataset.to_string(),
            band: band.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure to write the suitability raster.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("destination {} is unreachable: {reason}", path.display())]
    DestinationUnreachable { path: PathBuf, reason: String },

    #[error("invalid export region: {0}")]
    InvalidRegion(String),

    #[error("unsupported export CRS: {0}")]
    UnsupportedCrs(String),

    #[error("invalid export scale {0}: must be a positive number")]
    InvalidScale(f64),

    #[error("invalid export description '{0}': use letters, digits, '_', '-' or '.'")]
    InvalidDescription(String),

    #[error("export grid of {rows}x{cols} cells exceeds the limit of {limit} cells")]
    GridTooLarge { rows: usize, cols: usize, limit: usize },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: cropsuit_core::Error,
    },

    #[error("failed to write export metadata {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render quicklook: {0}")]
    Palette(#[from] cropsuit_colormap::PaletteError),

    #[error("raster error during export: {0}")]
    Raster(#[from] cropsuit_core::Error),
}

/// Failure to read a pipeline configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Pipeline failure, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("load stage failed: {0}")]
    Load(#[from] LoadError),

    #[error("evaluation stage failed: {0}")]
    Evaluate(#[from] cropsuit_core::Error),

    #[error("export stage failed: {0}")]
    Export(#[from] ExportError),
}

impl PipelineError {
    /// Name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Load(_) => "load",
            PipelineError::Evaluate(_) => "evaluate",
            PipelineError::Export(_) => "export",
        }
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
