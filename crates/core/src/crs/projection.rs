//! Pure-Rust map projections for the export CRS set.
//!
//! Geographic (EPSG:4326, and NAD83 EPSG:4269 treated as WGS84), spherical
//! Web Mercator (EPSG:3857) and WGS84 UTM (EPSG 326xx North, 327xx South).
//! UTM follows Snyder 1987, USGS Prof. Paper 1395, pp. 61-64.

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Latitude limit of the Web Mercator square (degrees).
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Length of one degree of longitude at the equator (m).
pub const METERS_PER_DEGREE: f64 = 111_319.490_793_273_58;

/// A projection between geographic (lon, lat) degrees and map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Plate carrée: map units are degrees.
    Geographic,
    /// Spherical Mercator on the WGS84 semi-major axis.
    WebMercator,
    /// Transverse Mercator zone on the WGS84 ellipsoid.
    Utm { zone: u32, north: bool },
}

impl Projection {
    /// Projection for an EPSG code, or `None` if unsupported.
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            4326 | 4269 => Some(Projection::Geographic),
            3857 => Some(Projection::WebMercator),
            32601..=32660 => Some(Projection::Utm {
                zone: epsg - 32600,
                north: true,
            }),
            32701..=32760 => Some(Projection::Utm {
                zone: epsg - 32700,
                north: false,
            }),
            _ => None,
        }
    }

    /// Whether map units are degrees.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Projection::Geographic)
    }

    /// Project (lon, lat) degrees to map coordinates.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match *self {
            Projection::Geographic => (lon, lat),
            Projection::WebMercator => {
                let x = A * lon.to_radians();
                let y = A * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
                (x, y)
            }
            Projection::Utm { zone, north } => wgs84_to_utm(lon, lat, zone, north),
        }
    }

    /// Map coordinates back to (lon, lat) degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Projection::Geographic => (x, y),
            Projection::WebMercator => {
                let lon = (x / A).to_degrees();
                let lat = (2.0 * (y / A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
                (lon, lat)
            }
            Projection::Utm { zone, north } => utm_to_wgs84(x, y, zone, north),
        }
    }
}

fn central_meridian(zone: u32) -> f64 {
    ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
}

/// Convert WGS84 (longitude, latitude) in degrees to UTM (easting, northing)
/// in metres for the given zone and hemisphere.
fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lon0 = central_meridian(zone);

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a_coeff = cos_lat * (lon - lon0);
    let m = meridional_arc(lat);

    let a2 = a_coeff * a_coeff;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    // Snyder eq. 8-9
    let easting = K0
        * n
        * (a_coeff
            + (1.0 - t + c) * a2 * a_coeff / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2) * a4 * a_coeff / 120.0)
        + FALSE_EASTING;

    // Snyder eq. 8-10
    let northing = K0
        * (m + n
            * tan_lat
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    if north {
        (easting, northing)
    } else {
        (easting, northing + FALSE_NORTHING_SOUTH)
    }
}

/// Inverse of [`wgs84_to_utm`] via the footpoint latitude
/// (Snyder eqs. 8-18 to 8-25).
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - FALSE_NORTHING_SOUTH
    };

    let e4 = E2 * E2;
    let e6 = e4 * E2;
    let m = y / K0;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1_e2 = (1.0 - E2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - E2 * sin_phi1 * sin_phi1;
    let n1 = A / denom.sqrt();
    let r1 = A * (1.0 - E2) / denom.powf(1.5);
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * E_PRIME2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                * d5
                / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

/// Meridional arc from equator to latitude `lat` (radians).
/// Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;

    A * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn epsg_lookup() {
        assert_eq!(Projection::from_epsg(4326), Some(Projection::Geographic));
        assert_eq!(Projection::from_epsg(3857), Some(Projection::WebMercator));
        assert_eq!(
            Projection::from_epsg(32618),
            Some(Projection::Utm { zone: 18, north: true })
        );
        assert_eq!(
            Projection::from_epsg(32721),
            Some(Projection::Utm { zone: 21, north: false })
        );
        assert_eq!(Projection::from_epsg(32600), None);
        assert_eq!(Projection::from_epsg(32661), None);
        assert_eq!(Projection::from_epsg(5070), None);
    }

    #[test]
    fn web_mercator_export_corners() {
        let p = Projection::WebMercator;
        let (x, y) = p.forward(-77.0, 39.0);
        assert_abs_diff_eq!(x, -8_571_600.791, epsilon = 0.01);
        assert_abs_diff_eq!(y, 4_721_671.573, epsilon = 0.01);

        let (x, y) = p.forward(-75.0, 41.0);
        assert_abs_diff_eq!(x, -8_348_961.809, epsilon = 0.01);
        assert_abs_diff_eq!(y, 5_012_341.664, epsilon = 0.01);
    }

    #[test]
    fn web_mercator_roundtrip() {
        let p = Projection::WebMercator;
        let (x, y) = p.forward(-76.123, 40.456);
        let (lon, lat) = p.inverse(x, y);
        assert_abs_diff_eq!(lon, -76.123, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 40.456, epsilon = 1e-9);
    }

    // Reference values from pyproj (PROJ 9.x), EPSG:4326 → EPSG:32630 / 32721
    #[test]
    fn madrid_wgs84_to_utm30n() {
        let (e, n) = Projection::Utm { zone: 30, north: true }.forward(-3.7037, 40.4168);
        assert_abs_diff_eq!(e, 440_298.94, epsilon = 1.0);
        assert_abs_diff_eq!(n, 4_474_257.31, epsilon = 1.0);
    }

    #[test]
    fn buenos_aires_wgs84_to_utm21s() {
        let (e, n) = Projection::Utm { zone: 21, north: false }.forward(-58.3816, -34.6037);
        assert_abs_diff_eq!(e, 373_317.50, epsilon = 1.0);
        assert_abs_diff_eq!(n, 6_170_036.17, epsilon = 1.0);
    }

    #[test]
    fn utm_roundtrip_both_hemispheres() {
        for (proj, lon, lat) in [
            (Projection::Utm { zone: 18, north: true }, -76.0, 40.0),
            (Projection::Utm { zone: 18, north: true }, -77.9, 39.1),
            (Projection::Utm { zone: 21, north: false }, -58.3816, -34.6037),
        ] {
            let (e, n) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(e, n);
            assert_abs_diff_eq!(lon2, lon, epsilon = 1e-6);
            assert_abs_diff_eq!(lat2, lat, epsilon = 1e-6);
        }
    }

    #[test]
    fn geographic_is_identity() {
        let p = Projection::Geographic;
        assert_eq!(p.forward(-77.0, 39.0), (-77.0, 39.0));
        assert_eq!(p.inverse(-77.0, 39.0), (-77.0, 39.0));
        assert!(p.is_geographic());
    }
}
