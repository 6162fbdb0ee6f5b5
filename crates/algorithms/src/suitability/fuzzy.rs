//! Fuzzy AND combination and self-masking
//!
//! "Fuzzy AND" here is a strict per-cell boolean conjunction, not a
//! continuous t-norm: a cell is suitable only when every mask is true.

use super::{Mask, MASK_FALSE, MASK_NODATA, MASK_TRUE};
use crate::maybe_rayon::*;
use cropsuit_core::raster::Raster;
use cropsuit_core::{Error, Result};
use ndarray::Array2;
use serde::Serialize;

/// Value of suitable cells in a self-masked raster; everything else is
/// no-data.
pub const SUITABLE: u8 = 1;

/// Combine masks with a per-cell boolean AND.
///
/// A false in any mask makes the cell false, even if another mask is
/// no-data there; otherwise a no-data in any mask makes it no-data. Values
/// other than 0 and 1 are treated as no-data.
///
/// All masks must share one grid.
pub fn fuzzy_and(masks: &[&Mask]) -> Result<Mask> {
    let (first, rest) = masks.split_first().ok_or_else(|| Error::InvalidParameter {
        name: "masks",
        value: "[]".to_string(),
        reason: "at least one mask is required".to_string(),
    })?;
    for mask in rest {
        first.ensure_same_grid(mask)?;
    }

    let (rows, cols) = first.shape();
    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| {
                    let mut missing = false;
                    for mask in masks {
                        match mask.data()[(row, col)] {
                            MASK_TRUE => {}
                            MASK_FALSE => return MASK_FALSE,
                            _ => missing = true,
                        }
                    }
                    if missing {
                        MASK_NODATA
                    } else {
                        MASK_TRUE
                    }
                })
                .collect::<Vec<u8>>()
        })
        .collect();

    let mut combined = first.with_same_meta::<u8>(MASK_NODATA);
    combined.set_nodata(Some(MASK_NODATA));
    *combined.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(combined)
}

/// Mask out every cell that is not true.
///
/// The result holds [`SUITABLE`] where `mask` is true and no-data (0)
/// elsewhere, so unsuitable cells are transparent rather than zero-valued.
pub fn self_mask(mask: &Mask) -> Raster<u8> {
    let mut out = mask.with_same_meta::<u8>(0);
    out.set_nodata(Some(0));
    out.data_mut().zip_mut_with(mask.data(), |o, &m| {
        if m == MASK_TRUE {
            *o = SUITABLE;
        }
    });
    out
}

/// Cell counts of a combined mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MaskSummary {
    pub suitable: usize,
    pub unsuitable: usize,
    pub nodata: usize,
}

impl MaskSummary {
    /// Count true, false and no-data cells.
    pub fn of(mask: &Mask) -> Self {
        mask.data()
            .iter()
            .fold(MaskSummary::default(), |mut acc, &v| {
                match v {
                    MASK_TRUE => acc.suitable += 1,
                    MASK_FALSE => acc.unsuitable += 1,
                    _ => acc.nodata += 1,
                }
                acc
            })
    }

    /// Total cells counted
    pub fn total(&self) -> usize {
        self.suitable + self.unsuitable + self.nodata
    }

    /// Share of valid cells that are suitable, in percent.
    pub fn suitable_percent(&self) -> f64 {
        let valid = self.suitable + self.unsuitable;
        if valid == 0 {
            0.0
        } else {
            100.0 * self.suitable as f64 / valid as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropsuit_core::GeoTransform;

    fn mask(values: Vec<u8>) -> Mask {
        let mut m = Raster::from_vec(values, 2, 2).unwrap();
        m.set_transform(GeoTransform::new(-77.0, 41.0, 1.0, -1.0));
        m.set_nodata(Some(MASK_NODATA));
        m
    }

    #[test]
    fn all_true_is_true() {
        let a = mask(vec![1, 1, 0, 1]);
        let b = mask(vec![1, 0, 1, 1]);
        let c = mask(vec![1, 1, 1, 1]);
        let combined = fuzzy_and(&[&a, &b, &c]).unwrap();
        assert_eq!(combined.data().iter().copied().collect::<Vec<_>>(), vec![1, 0, 0, 1]);
    }

    #[test]
    fn false_wins_over_nodata() {
        let a = mask(vec![MASK_NODATA, MASK_NODATA, 1, 1]);
        let b = mask(vec![0, 1, 1, MASK_NODATA]);
        let combined = fuzzy_and(&[&a, &b]).unwrap();
        assert_eq!(
            combined.data().iter().copied().collect::<Vec<_>>(),
            vec![MASK_FALSE, MASK_NODATA, MASK_TRUE, MASK_NODATA]
        );
    }

    #[test]
    fn empty_and_misaligned_inputs_fail() {
        assert!(fuzzy_and(&[]).is_err());

        let a = mask(vec![1, 1, 1, 1]);
        let mut b = mask(vec![1, 1, 1, 1]);
        b.set_transform(GeoTransform::new(0.0, 0.0, 1.0, -1.0));
        assert!(matches!(fuzzy_and(&[&a, &b]), Err(Error::GridMismatch(_))));

        let c: Mask = Raster::filled(3, 2, 1);
        assert!(matches!(fuzzy_and(&[&a, &c]), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn self_mask_drops_everything_but_true() {
        let combined = mask(vec![1, 0, MASK_NODATA, 1]);
        let out = self_mask(&combined);
        assert_eq!(out.get(0, 0).unwrap(), SUITABLE);
        assert!(out.is_nodata_at(0, 1).unwrap());
        assert!(out.is_nodata_at(1, 0).unwrap());
        assert_eq!(out.statistics().valid_count, 2);
        assert_eq!(out.transform(), combined.transform());
    }

    #[test]
    fn summary_counts() {
        let summary = MaskSummary::of(&mask(vec![1, 0, MASK_NODATA, 1]));
        assert_eq!(
            summary,
            MaskSummary {
                suitable: 2,
                unsuitable: 1,
                nodata: 1
            }
        );
        assert_eq!(summary.total(), 4);
        assert!((summary.suitable_percent() - 66.666).abs() < 0.01);
    }
}
