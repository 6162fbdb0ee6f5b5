//! Rectangular geographic regions

use crate::crs::{Projection, MAX_MERCATOR_LATITUDE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A lon/lat rectangle in degrees, as `[west, south, east, north]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Region {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Check the rectangle is finite, non-empty and on the globe.
    pub fn validate(&self) -> Result<()> {
        let coords = [self.west, self.south, self.east, self.north];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(self.invalid("coordinates must be finite"));
        }
        if self.west >= self.east {
            return Err(self.invalid("west must be less than east"));
        }
        if self.south >= self.north {
            return Err(self.invalid("south must be less than north"));
        }
        if self.west < -180.0 || self.east > 180.0 {
            return Err(self.invalid("longitude outside [-180, 180]"));
        }
        if self.south < -90.0 || self.north > 90.0 {
            return Err(self.invalid("latitude outside [-90, 90]"));
        }
        Ok(())
    }

    /// Check the rectangle can be represented in `projection`.
    pub fn validate_for(&self, projection: &Projection) -> Result<()> {
        self.validate()?;
        if matches!(projection, Projection::WebMercator)
            && (self.south < -MAX_MERCATOR_LATITUDE || self.north > MAX_MERCATOR_LATITUDE)
        {
            return Err(self.invalid("latitude beyond the Web Mercator limit"));
        }
        Ok(())
    }

    /// Whether (lon, lat) falls inside the rectangle (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Envelope of the rectangle in `projection` map units,
    /// as (min_x, min_y, max_x, max_y).
    ///
    /// Samples points along every edge, not just the corners, so curved
    /// edges in transverse projections stay inside the envelope.
    pub fn envelope(&self, projection: &Projection) -> (f64, f64, f64, f64) {
        const STEPS: usize = 16;

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for i in 0..=STEPS {
            let f = i as f64 / STEPS as f64;
            let lon = self.west + f * (self.east - self.west);
            let lat = self.south + f * (self.north - self.south);
            for (px, py) in [
                (lon, self.south),
                (lon, self.north),
                (self.west, lat),
                (self.east, lat),
            ] {
                let (x, y) = projection.forward(px, py);
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        (min_x, min_y, max_x, max_y)
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidParameter {
            name: "region",
            value: format!("[{}, {}, {}, {}]", self.west, self.south, self.east, self.north),
            reason: reason.to_string(),
        }
    }
}

impl From<[f64; 4]> for Region {
    fn from(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn validates_export_rectangle() {
        assert!(Region::from([-77.0, 39.0, -75.0, 41.0]).validate().is_ok());
        assert!(Region::new(-75.0, 39.0, -77.0, 41.0).validate().is_err());
        assert!(Region::new(-77.0, 41.0, -75.0, 41.0).validate().is_err());
        assert!(Region::new(-181.0, 39.0, -75.0, 41.0).validate().is_err());
        assert!(Region::new(-77.0, 39.0, -75.0, 91.0).validate().is_err());
        assert!(Region::new(f64::NAN, 39.0, -75.0, 41.0).validate().is_err());
    }

    #[test]
    fn mercator_rejects_polar_region() {
        let polar = Region::new(-10.0, 80.0, 10.0, 89.0);
        assert!(polar.validate_for(&Projection::Geographic).is_ok());
        assert!(polar.validate_for(&Projection::WebMercator).is_err());
    }

    #[test]
    fn envelope_in_web_mercator() {
        let region = Region::new(-77.0, 39.0, -75.0, 41.0);
        let (min_x, min_y, max_x, max_y) = region.envelope(&Projection::WebMercator);
        assert_abs_diff_eq!(min_x, -8_571_600.791, epsilon = 0.01);
        assert_abs_diff_eq!(min_y, 4_721_671.573, epsilon = 0.01);
        assert_abs_diff_eq!(max_x, -8_348_961.809, epsilon = 0.01);
        assert_abs_diff_eq!(max_y, 5_012_341.664, epsilon = 0.01);
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let region = Region::new(-77.0, 39.0, -75.0, 41.0);
        assert!(region.contains(-77.0, 39.0));
        assert!(region.contains(-76.0, 40.0));
        assert!(!region.contains(-74.99, 40.0));
    }
}
