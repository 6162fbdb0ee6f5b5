//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and map coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// Climate normals and export grids are north-up, so the rotation terms are
/// zero and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Rotation about X axis (usually 0)
    pub row_rotation: f64,
    /// Rotation about Y axis (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Convert pixel coordinates to map coordinates
    ///
    /// Returns the coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Convert pixel coordinates to map coordinates (top-left corner)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64, row as f64)
    }

    fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Convert map coordinates to pixel coordinates
    ///
    /// Returns fractional pixel coordinates; use `.floor()` to get integer indices
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-12 {
            // Degenerate transformation
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Get the cell size (assumes square pixels and no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Whether two transforms describe the same grid, within a tolerance
    /// relative to the cell size.
    pub fn is_aligned_with(&self, other: &GeoTransform) -> bool {
        let tol = self.cell_size().max(other.cell_size()) * 1e-6;
        let pairs = [
            (self.origin_x, other.origin_x),
            (self.origin_y, other.origin_y),
            (self.pixel_width, other.pixel_width),
            (self.pixel_height, other.pixel_height),
            (self.row_rotation, other.row_rotation),
            (self.col_rotation, other.col_rotation),
        ];
        pairs.iter().all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Calculate the bounding box for a raster of given dimensions
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let corners = [
            self.pixel_to_geo_corner(0, 0),
            self.pixel_to_geo_corner(width, 0),
            self.pixel_to_geo_corner(0, height),
            self.pixel_to_geo_corner(width, height),
        ];

        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        // PRISM-like 4 km geographic grid
        let gt = GeoTransform::new(-125.0208, 49.9375, 0.041666667, -0.041666667);

        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.5, epsilon = 1e-8);
        assert_relative_eq!(row, 10.5, epsilon = 1e-8);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(-77.0, 41.0, 0.5, -0.5);
        let (min_x, min_y, max_x, max_y) = gt.bounds(4, 4);

        assert_relative_eq!(min_x, -77.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 39.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, -75.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 41.0, epsilon = 1e-10);
    }

    #[test]
    fn test_alignment() {
        let a = GeoTransform::new(-77.0, 41.0, 0.5, -0.5);
        let b = GeoTransform::new(-77.0 + 1e-9, 41.0, 0.5, -0.5);
        let c = GeoTransform::new(-76.5, 41.0, 0.5, -0.5);

        assert!(a.is_aligned_with(&b));
        assert!(!a.is_aligned_with(&c));
    }
}
