//! Agronomic thresholds for sweet corn
//!
//! Optimal ranges from the FAO EcoCrop database. These are fixed for the one
//! crop this pipeline models.

use serde::Serialize;

/// Absolute minimum temperature the crop tolerates (°C) before the margin.
pub const BASE_KILL_TEMPERATURE: f64 = 0.0;

/// Safety margin added to [`BASE_KILL_TEMPERATURE`] (°C).
pub const KILL_TEMPERATURE_MARGIN: f64 = 4.0;

/// Months whose mean temperature must be optimal (May to August).
pub const GROWING_SEASON_MONTHS: [usize; 4] = [5, 6, 7, 8];

/// Month whose minimum temperature must stay above the kill temperature.
pub const KILL_TEMPERATURE_MONTH: usize = 4;

/// SoilGrids stores pH multiplied by this factor.
pub const SOIL_PH_SCALE: f64 = 10.0;

/// Inclusive optimal ranges and the kill temperature for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropThresholds {
    /// Lower bound of the optimal monthly mean temperature (°C)
    pub min_temp_optimal: f64,
    /// Upper bound of the optimal monthly mean temperature (°C)
    pub max_temp_optimal: f64,
    /// Lower bound of the optimal annual precipitation (mm)
    pub min_precip: f64,
    /// Upper bound of the optimal annual precipitation (mm)
    pub max_precip: f64,
    /// Lower bound of the optimal soil pH
    pub min_ph: f64,
    /// Upper bound of the optimal soil pH
    pub max_ph: f64,
    /// Minimum April temperature the crop survives (°C)
    pub kill_temp: f64,
}

impl CropThresholds {
    /// Sweet corn (FAO EcoCrop)
    pub const SWEET_CORN: Self = Self {
        min_temp_optimal: 16.0,
        max_temp_optimal: 24.0,
        min_precip: 800.0,
        max_precip: 1500.0,
        min_ph: 5.5,
        max_ph: 6.8,
        kill_temp: BASE_KILL_TEMPERATURE + KILL_TEMPERATURE_MARGIN,
    };
}

impl Default for CropThresholds {
    fn default() -> Self {
        Self::SWEET_CORN
    }
}
