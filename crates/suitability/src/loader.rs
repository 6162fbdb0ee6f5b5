//! Input loading from raster stores
//!
//! A [`RasterSource`] hands out monthly collections and single images by
//! dataset identifier and band name. [`DirectorySource`] reads GeoTIFFs laid
//! out on disk as
//!
//! ```text
//! <root>/<dataset id>/<band>_<MM>.tif   (collections, MM = 01..12)
//! <root>/<dataset id>/<band>.tif        (images)
//! ```
//!
//! where slashes in the dataset identifier become subdirectories.

use crate::config::DatasetCatalog;
use crate::error::LoadError;
use cropsuit_core::io::read_geotiff;
use cropsuit_core::raster::MONTHS_PER_YEAR;
use cropsuit_core::{Raster, RasterTimeSeries};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// A store of georeferenced rasters addressed by dataset and band.
pub trait RasterSource {
    /// Twelve monthly rasters of `band`, January first.
    fn load_collection(&self, dataset: &str, band: &str) -> Result<RasterTimeSeries<f64>, LoadError>;

    /// A single raster of `band`.
    fn load_image(&self, dataset: &str, band: &str) -> Result<Raster<f64>, LoadError>;
}

/// GeoTIFFs in a directory tree.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `dataset`, rejecting identifiers that would escape
    /// the root.
    fn dataset_dir(&self, dataset: &str, band: &str) -> Result<PathBuf, LoadError> {
        let relative = safe_relative(dataset)
            .ok_or_else(|| LoadError::unavailable(dataset, band, "invalid dataset identifier"))?;
        if !is_plain_name(band) {
            return Err(LoadError::unavailable(dataset, band, "invalid band name"));
        }
        Ok(self.root.join(relative))
    }

    fn read(&self, dataset: &str, band: &str, path: &Path) -> Result<Raster<f64>, LoadError> {
        if !path.is_file() {
            return Err(LoadError::unavailable(
                dataset,
                band,
                format!("missing file {}", path.display()),
            ));
        }
        debug!(path = %path.display(), "reading raster");
        read_geotiff(path)
            .map_err(|e| LoadError::unavailable(dataset, band, format!("{}: {e}", path.display())))
    }
}

impl RasterSource for DirectorySource {
    fn load_collection(&self, dataset: &str, band: &str) -> Result<RasterTimeSeries<f64>, LoadError> {
        let dir = self.dataset_dir(dataset, band)?;
        let months = (1..=MONTHS_PER_YEAR)
            .map(|month| self.read(dataset, band, &dir.join(format!("{band}_{month:02}.tif"))))
            .collect::<Result<Vec<_>, _>>()?;
        RasterTimeSeries::from_months(months).map_err(|e| LoadError::unavailable(dataset, band, e))
    }

    fn load_image(&self, dataset: &str, band: &str) -> Result<Raster<f64>, LoadError> {
        let dir = self.dataset_dir(dataset, band)?;
        self.read(dataset, band, &dir.join(format!("{band}.tif")))
    }
}

/// Split a dataset identifier into path components, or `None` if any
/// component is empty, `.`/`..`, or the identifier is absolute.
fn safe_relative(dataset: &str) -> Option<PathBuf> {
    if dataset.is_empty() || dataset.starts_with('/') {
        return None;
    }
    let mut path = PathBuf::new();
    for part in dataset.split('/') {
        if !is_plain_name(part) {
            return None;
        }
        path.push(part);
    }
    Some(path)
}

fn is_plain_name(part: &str) -> bool {
    let mut components = Path::new(part).components();
    !part.is_empty()
        && !part.contains('\\')
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}

enum Entry {
    Collection(RasterTimeSeries<f64>),
    Image(Raster<f64>),
}

/// In-memory raster store, mostly for tests and embedding.
#[derive(Default)]
pub struct MemorySource {
    entries: HashMap<(String, String), Entry>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_collection(&mut self, dataset: &str, band: &str, series: RasterTimeSeries<f64>) {
        self.entries
            .insert((dataset.to_string(), band.to_string()), Entry::Collection(series));
    }

    pub fn insert_image(&mut self, dataset: &str, band: &str, raster: Raster<f64>) {
        self.entries
            .insert((dataset.to_string(), band.to_string()), Entry::Image(raster));
    }

    fn entry(&self, dataset: &str, band: &str) -> Result<&Entry, LoadError> {
        self.entries
            .get(&(dataset.to_string(), band.to_string()))
            .ok_or_else(|| LoadError::unavailable(dataset, band, "not present in store"))
    }
}

impl RasterSource for MemorySource {
    fn load_collection(&self, dataset: &str, band: &str) -> Result<RasterTimeSeries<f64>, LoadError> {
        match self.entry(dataset, band)? {
            Entry::Collection(series) => Ok(series.clone()),
            Entry::Image(_) => Err(LoadError::unavailable(dataset, band, "stored as an image, not a collection")),
        }
    }

    fn load_image(&self, dataset: &str, band: &str) -> Result<Raster<f64>, LoadError> {
        match self.entry(dataset, band)? {
            Entry::Image(raster) => Ok(raster.clone()),
            Entry::Collection(_) => Err(LoadError::unavailable(dataset, band, "stored as a collection, not an image")),
        }
    }
}

/// Everything the evaluator needs.
#[derive(Debug, Clone)]
pub struct ClimateInputs {
    /// Monthly precipitation totals (mm)
    pub precipitation: RasterTimeSeries<f64>,
    /// Monthly mean temperature (°C)
    pub mean_temperature: RasterTimeSeries<f64>,
    /// Monthly minimum temperature (°C)
    pub min_temperature: RasterTimeSeries<f64>,
    /// Topsoil pH as stored (pH x 10)
    pub soil_ph_raw: Raster<f64>,
}

/// Load the three climate bands and the soil pH band named in `catalog`.
pub fn load_inputs<S>(source: &S, catalog: &DatasetCatalog) -> Result<ClimateInputs, LoadError>
where
    S: RasterSource + ?Sized,
{
    info!(dataset = %catalog.climate, "loading climate normals");
    let precipitation = source.load_collection(&catalog.climate, &catalog.precipitation_band)?;
    let mean_temperature = source.load_collection(&catalog.climate, &catalog.mean_temperature_band)?;
    let min_temperature = source.load_collection(&catalog.climate, &catalog.min_temperature_band)?;

    info!(dataset = %catalog.soil, band = %catalog.soil_ph_band, "loading soil pH");
    let soil_ph_raw = source.load_image(&catalog.soil, &catalog.soil_ph_band)?;

    let (rows, cols) = precipitation.shape();
    debug!(rows, cols, "climate grid");

    Ok(ClimateInputs {
        precipitation,
        mean_temperature,
        min_temperature,
        soil_ph_raw,
    })
}
