//! Pipeline configuration: input dataset identifiers and export parameters
//!
//! Configuration is JSON. Every field has a default, so a config file only
//! needs the values it overrides. Crop thresholds are not configurable.

use crate::error::ConfigError;
use cropsuit_core::Region;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifiers of the input datasets and bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetCatalog {
    /// Monthly climate normals collection (12 images)
    pub climate: String,
    /// Monthly total precipitation band (mm)
    pub precipitation_band: String,
    /// Monthly mean temperature band (°C)
    pub mean_temperature_band: String,
    /// Monthly minimum temperature band (°C)
    pub min_temperature_band: String,
    /// Soil pH image
    pub soil: String,
    /// Topsoil pH band, stored as pH x 10
    pub soil_ph_band: String,
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        Self {
            climate: "OREGONSTATE/PRISM/Norm81m".to_string(),
            precipitation_band: "ppt".to_string(),
            mean_temperature_band: "tmean".to_string(),
            min_temperature_band: "tmin".to_string(),
            soil: "projects/soilgrids-isric/phh2o_mean".to_string(),
            soil_ph_band: "phh2o_0-5cm_mean".to_string(),
        }
    }
}

/// Where and how the suitability raster is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportParams {
    /// Output name; also the file stem at the destination
    pub description: String,
    /// Output cell size in metres
    pub scale: f64,
    /// Lon/lat rectangle to export
    pub region: Region,
    /// Output CRS as `EPSG:<code>`
    pub crs: String,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            description: "CornSuitabilityGEE".to_string(),
            scale: 250.0,
            region: Region::new(-77.0, 39.0, -75.0, 41.0),
            crs: "EPSG:3857".to_string(),
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub datasets: DatasetCatalog,
    pub export: ExportParams,
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pretty JSON rendering, as accepted by [`Self::from_json_file`].
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_published_export() {
        let params = ExportParams::default();
        assert_eq!(params.description, "CornSuitabilityGEE");
        assert_eq!(params.scale, 250.0);
        assert_eq!(params.region, Region::new(-77.0, 39.0, -75.0, 41.0));
        assert_eq!(params.crs, "EPSG:3857");

        let datasets = DatasetCatalog::default();
        assert_eq!(datasets.climate, "OREGONSTATE/PRISM/Norm81m");
        assert_eq!(datasets.soil_ph_band, "phh2o_0-5cm_mean");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "export": { "scale": 1000, "crs": "EPSG:4326" } }"#).unwrap();
        assert_eq!(config.export.scale, 1000.0);
        assert_eq!(config.export.crs, "EPSG:4326");
        assert_eq!(config.export.description, "CornSuitabilityGEE");
        assert_eq!(config.datasets, DatasetCatalog::default());
    }

    #[test]
    fn json_file_round_trip() {
        let mut config = PipelineConfig::default();
        config.export.region = Region::new(-76.5, 39.5, -75.5, 40.5);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn bad_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = PipelineConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = PipelineConfig::from_json_file("/nonexistent/cropsuit.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
