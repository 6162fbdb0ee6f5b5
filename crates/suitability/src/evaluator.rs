//! Per-constraint suitability masks
//!
//! Each constraint is an inclusive per-cell comparison against
//! [`CropThresholds`]. No-data inputs give no-data mask cells.

use crate::loader::ClimateInputs;
use crate::thresholds::{CropThresholds, GROWING_SEASON_MONTHS, KILL_TEMPERATURE_MONTH, SOIL_PH_SCALE};
use cropsuit_algorithms::algebra::band_math;
use cropsuit_algorithms::statistics::annual_sum;
use cropsuit_algorithms::suitability::{at_least_mask, fuzzy_and, range_mask, Mask};
use cropsuit_core::{Raster, RasterTimeSeries, Result};
use tracing::debug;

/// The four constraint masks, all on the climate grid.
#[derive(Debug, Clone)]
pub struct ConstraintMasks {
    pub precipitation: Mask,
    pub growing_season: Mask,
    pub kill_temperature: Mask,
    pub soil_ph: Mask,
}

impl ConstraintMasks {
    /// Masks in combination order
    pub fn as_slice(&self) -> [&Mask; 4] {
        [
            &self.precipitation,
            &self.growing_season,
            &self.kill_temperature,
            &self.soil_ph,
        ]
    }
}

/// Annual precipitation within the optimal range.
pub fn precipitation_mask(precipitation: &RasterTimeSeries<f64>, thresholds: &CropThresholds) -> Result<Mask> {
    let total = annual_sum(precipitation)?;
    range_mask(&total, thresholds.min_precip, thresholds.max_precip)
}

/// Optimal mean temperature, month by month.
pub fn monthly_temperature_masks(
    mean_temperature: &RasterTimeSeries<f64>,
    thresholds: &CropThresholds,
) -> Result<RasterTimeSeries<u8>> {
    mean_temperature.map(|month| range_mask(month, thresholds.min_temp_optimal, thresholds.max_temp_optimal))
}

/// Optimal mean temperature in every growing-season month.
pub fn growing_season_mask(mean_temperature: &RasterTimeSeries<f64>, thresholds: &CropThresholds) -> Result<Mask> {
    let monthly = monthly_temperature_masks(mean_temperature, thresholds)?;
    let season = GROWING_SEASON_MONTHS
        .iter()
        .map(|&m| monthly.month(m))
        .collect::<Result<Vec<_>>>()?;
    fuzzy_and(&season)
}

/// Minimum temperature at or above the kill temperature, month by month.
pub fn monthly_kill_masks(
    min_temperature: &RasterTimeSeries<f64>,
    thresholds: &CropThresholds,
) -> Result<RasterTimeSeries<u8>> {
    min_temperature.map(|month| at_least_mask(month, thresholds.kill_temp))
}

/// April minimum temperature at or above the kill temperature.
pub fn kill_temperature_mask(min_temperature: &RasterTimeSeries<f64>, thresholds: &CropThresholds) -> Result<Mask> {
    let monthly = monthly_kill_masks(min_temperature, thresholds)?;
    Ok(monthly.month(KILL_TEMPERATURE_MONTH)?.clone())
}

/// Soil pH (stored x10) within the optimal range.
pub fn soil_ph_mask(soil_ph_raw: &Raster<f64>, thresholds: &CropThresholds) -> Result<Mask> {
    let ph = band_math(soil_ph_raw, |v| v / SOIL_PH_SCALE)?;
    range_mask(&ph, thresholds.min_ph, thresholds.max_ph)
}

/// Evaluate all four constraints.
///
/// Inputs must share one grid; a soil raster on a different grid is an
/// error rather than being resampled.
pub fn evaluate_constraints(inputs: &ClimateInputs, thresholds: &CropThresholds) -> Result<ConstraintMasks> {
    let reference = inputs.precipitation.reference();
    reference.ensure_same_grid(inputs.mean_temperature.reference())?;
    reference.ensure_same_grid(inputs.min_temperature.reference())?;
    reference.ensure_same_grid(&inputs.soil_ph_raw)?;

    let masks = ConstraintMasks {
        precipitation: precipitation_mask(&inputs.precipitation, thresholds)?,
        growing_season: growing_season_mask(&inputs.mean_temperature, thresholds)?,
        kill_temperature: kill_temperature_mask(&inputs.min_temperature, thresholds)?,
        soil_ph: soil_ph_mask(&inputs.soil_ph_raw, thresholds)?,
    };
    debug!("evaluated precipitation, growing season, kill temperature and soil pH masks");
    Ok(masks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropsuit_algorithms::suitability::{MASK_FALSE, MASK_NODATA, MASK_TRUE};
    use cropsuit_core::{Error, GeoTransform, CRS};

    fn grid(values: Vec<f64>) -> Raster<f64> {
        let n = values.len();
        let mut r = Raster::from_vec(values, 1, n).unwrap();
        r.set_transform(GeoTransform::new(-77.0, 41.0, 0.5, -0.5));
        r.set_crs(Some(CRS::wgs84()));
        r
    }

    /// Series where month `m` (1-based) holds `values(m)` in every cell.
    fn series(cells: usize, values: impl Fn(usize) -> f64) -> RasterTimeSeries<f64> {
        RasterTimeSeries::from_months((1..=12).map(|m| grid(vec![values(m); cells])).collect()).unwrap()
    }

    fn mask_values(mask: &Mask) -> Vec<u8> {
        mask.data().iter().copied().collect()
    }

    #[test]
    fn precipitation_bounds_are_inclusive() {
        // January carries the whole annual total
        let totals = vec![800.0, 1500.0, 799.5, 1500.5, 1000.0];
        let months = (1..=12)
            .map(|m| if m == 1 { grid(totals.clone()) } else { grid(vec![0.0; totals.len()]) })
            .collect();
        let ppt = RasterTimeSeries::from_months(months).unwrap();

        let mask = precipitation_mask(&ppt, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(
            mask_values(&mask),
            vec![MASK_TRUE, MASK_TRUE, MASK_FALSE, MASK_FALSE, MASK_TRUE]
        );
    }

    #[test]
    fn growing_season_requires_every_month() {
        let season = [0.0, 0.0, 0.0, 0.0, 17.0, 20.0, 22.0, 19.0, 0.0, 0.0, 0.0, 0.0];
        let ok = series(1, |m| season[m - 1]);
        let mask = growing_season_mask(&ok, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(mask_values(&mask), vec![MASK_TRUE]);

        // July too hot
        let hot = series(1, |m| if m == 7 { 25.0 } else { season[m - 1] });
        let mask = growing_season_mask(&hot, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(mask_values(&mask), vec![MASK_FALSE]);

        // Months outside May-August do not matter; bounds 16 and 24 count
        let edges = series(1, |m| match m {
            5 | 7 => 24.0,
            6 | 8 => 16.0,
            _ => -30.0,
        });
        let mask = growing_season_mask(&edges, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(mask_values(&mask), vec![MASK_TRUE]);
    }

    #[test]
    fn monthly_temperature_masks_cover_the_year() {
        let tmean = series(1, |m| m as f64 * 2.0);
        let masks = monthly_temperature_masks(&tmean, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(masks.len(), 12);
        // 16..=24 => months 8..=12
        let flags: Vec<u8> = masks.iter().map(|m| m.get(0, 0).unwrap()).collect();
        assert_eq!(flags, vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn kill_temperature_uses_april_only() {
        let tmin = series(3, |m| if m == 4 { 0.0 } else { -20.0 });
        let mut april = tmin.month(4).unwrap().clone();
        april.set(0, 0, 4.0).unwrap();
        april.set(0, 1, 3.99).unwrap();
        april.set(0, 2, 5.0).unwrap();
        let mut months: Vec<_> = tmin.iter().cloned().collect();
        months[3] = april;
        let tmin = RasterTimeSeries::from_months(months).unwrap();

        let mask = kill_temperature_mask(&tmin, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(mask_values(&mask), vec![MASK_TRUE, MASK_FALSE, MASK_TRUE]);
    }

    #[test]
    fn soil_ph_is_rescaled() {
        let soil = grid(vec![62.0, 50.0, 55.0, 68.0, 69.0, f64::NAN]);
        let mask = soil_ph_mask(&soil, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(
            mask_values(&mask),
            vec![MASK_TRUE, MASK_FALSE, MASK_TRUE, MASK_TRUE, MASK_FALSE, MASK_NODATA]
        );
    }

    #[test]
    fn nodata_month_propagates_to_annual_total() {
        let months = (1..=12)
            .map(|m| grid(vec![90.0, if m == 3 { f64::NAN } else { 90.0 }]))
            .collect();
        let ppt = RasterTimeSeries::from_months(months).unwrap();
        let mask = precipitation_mask(&ppt, &CropThresholds::SWEET_CORN).unwrap();
        assert_eq!(mask_values(&mask), vec![MASK_TRUE, MASK_NODATA]);
    }

    #[test]
    fn misaligned_soil_grid_is_an_error() {
        let inputs = ClimateInputs {
            precipitation: series(2, |_| 80.0),
            mean_temperature: series(2, |_| 20.0),
            min_temperature: series(2, |_| 8.0),
            soil_ph_raw: {
                let mut soil = grid(vec![62.0, 62.0]);
                soil.set_transform(GeoTransform::new(-76.0, 41.0, 0.5, -0.5));
                soil
            },
        };
        let err = evaluate_constraints(&inputs, &CropThresholds::SWEET_CORN).unwrap_err();
        assert!(matches!(err, Error::GridMismatch(_)));
    }
}
