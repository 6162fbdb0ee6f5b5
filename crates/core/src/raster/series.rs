//! Monthly raster time series

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};

/// Number of members in a monthly climate-normal series.
pub const MONTHS_PER_YEAR: usize = 12;

/// Twelve rasters, one per calendar month, all on the same grid.
///
/// Months are addressed 1-12 (January = 1), matching how climate normals
/// are published.
#[derive(Debug, Clone)]
pub struct RasterTimeSeries<T: RasterElement> {
    months: Vec<Raster<T>>,
}

impl<T: RasterElement> RasterTimeSeries<T> {
    /// Build a series from rasters ordered January..December.
    ///
    /// Fails unless there are exactly twelve members sharing one grid.
    pub fn from_months(months: Vec<Raster<T>>) -> Result<Self> {
        if months.len() != MONTHS_PER_YEAR {
            return Err(Error::SeriesLength {
                expected: MONTHS_PER_YEAR,
                actual: months.len(),
            });
        }
        let (first, rest) = months.split_first().ok_or(Error::SeriesLength {
            expected: MONTHS_PER_YEAR,
            actual: 0,
        })?;
        for member in rest {
            first.ensure_same_grid(member)?;
        }
        Ok(Self { months })
    }

    /// Raster for calendar month `month` (1-12).
    pub fn month(&self, month: usize) -> Result<&Raster<T>> {
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(Error::MonthOutOfRange(month));
        }
        Ok(&self.months[month - 1])
    }

    /// First member, used as the grid reference for derived rasters.
    pub fn reference(&self) -> &Raster<T> {
        &self.months[0]
    }

    /// Shared (rows, cols) of all members
    pub fn shape(&self) -> (usize, usize) {
        self.reference().shape()
    }

    /// Number of members (always twelve)
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Iterate members January..December
    pub fn iter(&self) -> std::slice::Iter<'_, Raster<T>> {
        self.months.iter()
    }

    /// Apply `f` to every month, producing a new series on the same grid.
    pub fn map<U, F>(&self, f: F) -> Result<RasterTimeSeries<U>>
    where
        U: RasterElement,
        F: FnMut(&Raster<T>) -> Result<Raster<U>>,
    {
        let months = self.months.iter().map(f).collect::<Result<Vec<_>>>()?;
        RasterTimeSeries::from_months(months)
    }
}

impl<'a, T: RasterElement> IntoIterator for &'a RasterTimeSeries<T> {
    type Item = &'a Raster<T>;
    type IntoIter = std::slice::Iter<'a, Raster<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
