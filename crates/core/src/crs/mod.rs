//! Coordinate Reference System handling

mod projection;

pub use projection::{Projection, MAX_MERCATOR_LATITUDE, METERS_PER_DEGREE};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordinate Reference System, identified by its EPSG code.
///
/// Parsed from and displayed as `"EPSG:<code>"`, the form export requests
/// use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        self.epsg == other.epsg
    }

    /// String identifier, e.g. `EPSG:3857`
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// Map projection for this CRS, if it is one cropsuit can transform.
    pub fn projection(&self) -> Result<Projection> {
        Projection::from_epsg(self.epsg).ok_or_else(|| Error::UnsupportedCrs(self.identifier()))
    }
}

impl FromStr for CRS {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = trimmed
            .split_once(':')
            .filter(|(authority, _)| authority.eq_ignore_ascii_case("EPSG"))
            .and_then(|(_, code)| code.parse::<u32>().ok())
            .ok_or_else(|| Error::UnsupportedCrs(trimmed.to_string()))?;
        Ok(Self::from_epsg(code))
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}
