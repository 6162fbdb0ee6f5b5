//! Export of the suitability raster to a directory
//!
//! The raster is warped onto a grid covering the export region in the
//! target CRS and written as `<description>.tif` with a JSON sidecar
//! `<description>.json`. Optionally an RGBA quicklook is written as
//! `<description>_quicklook.tif`.

use crate::combiner::{Suitability, SuitabilitySummary};
use crate::config::ExportParams;
use crate::error::ExportError;
use cropsuit_algorithms::resample::{warp, TargetGrid};
use cropsuit_colormap::{raster_to_rgba, ColormapParams};
use cropsuit_core::io::{write_geotiff, write_rgba_tiff};
use cropsuit_core::{GeoTransform, Projection, Raster, Region, CRS};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Largest output grid accepted, in cells.
pub const MAX_EXPORT_CELLS: usize = 100_000_000;

/// Files produced by an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub raster_path: PathBuf,
    pub metadata_path: PathBuf,
    pub quicklook_path: Option<PathBuf>,
    pub rows: usize,
    pub cols: usize,
    /// Suitable cells in the exported grid
    pub exported_suitable: usize,
    /// Counts on the source grid, before warping
    pub summary: SuitabilitySummary,
}

/// JSON sidecar written next to the raster.
#[derive(Debug, Serialize)]
struct ExportMetadata<'a> {
    description: &'a str,
    crs: String,
    scale: f64,
    region: Region,
    rows: usize,
    cols: usize,
    transform: [f64; 4],
    exported_suitable: usize,
    summary: SuitabilitySummary,
}

/// Check export parameters and resolve the target CRS.
pub fn validate_params(params: &ExportParams) -> Result<(CRS, Projection), ExportError> {
    let description = params.description.as_str();
    if description.is_empty()
        || description.starts_with('.')
        || !description
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ExportError::InvalidDescription(params.description.clone()));
    }

    let crs: CRS = params
        .crs
        .parse()
        .map_err(|_| ExportError::UnsupportedCrs(params.crs.clone()))?;
    let projection = crs
        .projection()
        .map_err(|_| ExportError::UnsupportedCrs(params.crs.clone()))?;

    if !params.scale.is_finite() || params.scale <= 0.0 {
        return Err(ExportError::InvalidScale(params.scale));
    }

    params
        .region
        .validate_for(&projection)
        .map_err(|e| ExportError::InvalidRegion(e.to_string()))?;

    Ok((crs, projection))
}

/// Export target: an existing directory.
#[derive(Debug, Clone)]
pub struct DirectoryDestination {
    root: PathBuf,
    quicklook: bool,
}

impl DirectoryDestination {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            quicklook: false,
        }
    }

    /// Also write an RGBA quicklook next to the raster.
    pub fn with_quicklook(mut self, quicklook: bool) -> Self {
        self.quicklook = quicklook;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Warp `suitability` onto the export grid and write it.
    pub fn export(&self, suitability: &Suitability, params: &ExportParams) -> Result<ExportReport, ExportError> {
        let (crs, _) = validate_params(params)?;

        if !self.root.is_dir() {
            return Err(ExportError::DestinationUnreachable {
                path: self.root.clone(),
                reason: "not an existing directory".to_string(),
            });
        }

        let grid = TargetGrid::for_region(params.region, &crs, params.scale)?;
        if grid.len() > MAX_EXPORT_CELLS {
            return Err(ExportError::GridTooLarge {
                rows: grid.rows,
                cols: grid.cols,
                limit: MAX_EXPORT_CELLS,
            });
        }
        debug!(rows = grid.rows, cols = grid.cols, crs = %crs, "export grid");

        let output = warp(&suitability.raster, &grid)?;
        let exported_suitable = output.statistics().valid_count;

        let raster_path = self.root.join(format!("{}.tif", params.description));
        write_geotiff(&output, &raster_path).map_err(|source| ExportError::Write {
            path: raster_path.clone(),
            source,
        })?;
        info!(path = %raster_path.display(), rows = grid.rows, cols = grid.cols, "wrote suitability raster");

        let quicklook_path = if self.quicklook {
            let path = self.root.join(format!("{}_quicklook.tif", params.description));
            write_quicklook(&output, &path)?;
            Some(path)
        } else {
            None
        };

        let metadata_path = self.root.join(format!("{}.json", params.description));
        let metadata = ExportMetadata {
            description: &params.description,
            crs: crs.identifier(),
            scale: params.scale,
            region: params.region,
            rows: grid.rows,
            cols: grid.cols,
            transform: transform_array(&grid.transform),
            exported_suitable,
            summary: suitability.summary,
        };
        write_metadata(&metadata, &metadata_path)?;

        Ok(ExportReport {
            raster_path,
            metadata_path,
            quicklook_path,
            rows: grid.rows,
            cols: grid.cols,
            exported_suitable,
            summary: suitability.summary,
        })
    }
}

fn transform_array(gt: &GeoTransform) -> [f64; 4] {
    [gt.origin_x, gt.origin_y, gt.pixel_width, gt.pixel_height]
}

fn write_metadata(metadata: &ExportMetadata<'_>, path: &Path) -> Result<(), ExportError> {
    let to_error = |source: std::io::Error| ExportError::Metadata {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, metadata).map_err(|e| to_error(e.into()))?;
    writer.write_all(b"\n").map_err(to_error)?;
    writer.flush().map_err(to_error)
}

/// Render a suitability raster on the suitability palette over [0, 1],
/// masked cells transparent, and write it as an RGBA TIFF.
pub fn write_quicklook(raster: &Raster<u8>, path: &Path) -> Result<(), ExportError> {
    let params = ColormapParams::suitability()?;
    let rgba = raster_to_rgba(raster, &params);
    write_rgba_tiff(path, &rgba, raster.rows(), raster.cols()).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote quicklook");
    Ok(())
}
