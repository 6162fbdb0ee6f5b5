//! The four-stage suitability pipeline
//!
//! Loader -> Evaluator -> Combiner -> Exporter, strictly in order. The
//! pipeline is described by [`SuitabilityPipeline::plan`] before anything is
//! read, so a dry run can show what would be computed.

use crate::combiner::{combine, Suitability};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::evaluator::evaluate_constraints;
use crate::exporter::{validate_params, DirectoryDestination, ExportReport};
use crate::loader::{load_inputs, RasterSource};
use crate::thresholds::{CropThresholds, GROWING_SEASON_MONTHS, KILL_TEMPERATURE_MONTH, SOIL_PH_SCALE};
use std::fmt;
use std::time::Instant;
use tracing::info;

/// One step of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Read a monthly collection band
    LoadCollection { dataset: String, band: String },
    /// Read a single image band
    LoadImage { dataset: String, band: String },
    /// Evaluate one constraint into a mask
    Evaluate { constraint: &'static str, rule: String },
    /// Fuzzy AND of all masks, keeping suitable cells only
    Combine,
    /// Write the result
    Export {
        description: String,
        crs: String,
        scale: f64,
    },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::LoadCollection { dataset, band } => write!(f, "load collection {dataset} [{band}] (12 months)"),
            Stage::LoadImage { dataset, band } => write!(f, "load image {dataset} [{band}]"),
            Stage::Evaluate { constraint, rule } => write!(f, "evaluate {constraint}: {rule}"),
            Stage::Combine => write!(f, "combine masks (fuzzy AND), mask unsuitable cells"),
            Stage::Export { description, crs, scale } => {
                write!(f, "export {description} at {scale} m/cell in {crs}")
            }
        }
    }
}

/// Sweet-corn suitability over configured inputs.
#[derive(Debug, Clone)]
pub struct SuitabilityPipeline {
    config: PipelineConfig,
    thresholds: CropThresholds,
}

impl SuitabilityPipeline {
    pub fn new(config: PipelineConfig, thresholds: CropThresholds) -> Self {
        Self { config, thresholds }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &CropThresholds {
        &self.thresholds
    }

    /// Ordered stages, without touching any data.
    pub fn plan(&self) -> Vec<Stage> {
        let d = &self.config.datasets;
        let t = &self.thresholds;
        let season = GROWING_SEASON_MONTHS
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            Stage::LoadCollection {
                dataset: d.climate.clone(),
                band: d.precipitation_band.clone(),
            },
            Stage::LoadCollection {
                dataset: d.climate.clone(),
                band: d.mean_temperature_band.clone(),
            },
            Stage::LoadCollection {
                dataset: d.climate.clone(),
                band: d.min_temperature_band.clone(),
            },
            Stage::LoadImage {
                dataset: d.soil.clone(),
                band: d.soil_ph_band.clone(),
            },
            Stage::Evaluate {
                constraint: "precipitation",
                rule: format!("{} <= annual total <= {} mm", t.min_precip, t.max_precip),
            },
            Stage::Evaluate {
                constraint: "growing season",
                rule: format!(
                    "{} <= mean temperature <= {} °C in months {season}",
                    t.min_temp_optimal, t.max_temp_optimal
                ),
            },
            Stage::Evaluate {
                constraint: "kill temperature",
                rule: format!(
                    "minimum temperature >= {} °C in month {KILL_TEMPERATURE_MONTH}",
                    t.kill_temp
                ),
            },
            Stage::Evaluate {
                constraint: "soil pH",
                rule: format!("{} <= raw / {SOIL_PH_SCALE} <= {}", t.min_ph, t.max_ph),
            },
            Stage::Combine,
            Stage::Export {
                description: self.config.export.description.clone(),
                crs: self.config.export.crs.clone(),
                scale: self.config.export.scale,
            },
        ]
    }

    /// Load, evaluate and combine; the result stays in memory.
    pub fn materialize<S>(&self, source: &S) -> Result<Suitability>
    where
        S: RasterSource + ?Sized,
    {
        let start = Instant::now();
        let inputs = load_inputs(source, &self.config.datasets)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "inputs loaded");

        let masks = evaluate_constraints(&inputs, &self.thresholds)?;
        let suitability = combine(&masks)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "suitability computed");
        Ok(suitability)
    }

    /// Full pipeline: materialize, then export to `destination`.
    ///
    /// Export parameters are checked before any input is read.
    pub fn run<S>(&self, source: &S, destination: &DirectoryDestination) -> Result<ExportReport>
    where
        S: RasterSource + ?Sized,
    {
        validate_params(&self.config.export)?;
        let suitability = self.materialize(source)?;
        let report = destination.export(&suitability, &self.config.export)?;
        info!(
            raster = %report.raster_path.display(),
            rows = report.rows,
            cols = report.cols,
            "export complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_lists_stages_in_order() {
        let pipeline = SuitabilityPipeline::new(PipelineConfig::default(), CropThresholds::SWEET_CORN);
        let plan = pipeline.plan();
        assert_eq!(plan.len(), 10);
        assert!(matches!(plan[0], Stage::LoadCollection { ref band, .. } if band == "ppt"));
        assert!(matches!(plan[3], Stage::LoadImage { ref band, .. } if band == "phh2o_0-5cm_mean"));
        assert_eq!(plan[8], Stage::Combine);
        assert_eq!(plan[9].to_string(), "export CornSuitabilityGEE at 250 m/cell in EPSG:3857");
        assert_eq!(
            plan[5].to_string(),
            "evaluate growing season: 16 <= mean temperature <= 24 °C in months 5, 6, 7, 8"
        );
        assert_eq!(
            plan[6].to_string(),
            "evaluate kill temperature: minimum temperature >= 4 °C in month 4"
        );
    }
}
