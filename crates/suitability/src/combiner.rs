//! Fuzzy AND of the constraint masks into the suitability raster

use crate::evaluator::ConstraintMasks;
use cropsuit_algorithms::suitability::{fuzzy_and, self_mask, Mask, MaskSummary};
use cropsuit_core::{Raster, Result};
use tracing::info;

/// Cell counts of the combined mask.
pub type SuitabilitySummary = MaskSummary;

/// Combined result of all constraints.
#[derive(Debug, Clone)]
pub struct Suitability {
    /// Self-masked raster: 1 where suitable, no-data (0) elsewhere
    pub raster: Raster<u8>,
    pub summary: SuitabilitySummary,
}

/// AND the four masks and drop every cell that is not suitable.
pub fn combine(masks: &ConstraintMasks) -> Result<Suitability> {
    let combined: Mask = fuzzy_and(&masks.as_slice())?;
    let summary = SuitabilitySummary::of(&combined);
    info!(
        suitable = summary.suitable,
        unsuitable = summary.unsuitable,
        nodata = summary.nodata,
        "combined constraints ({:.1}% of valid cells suitable)",
        summary.suitable_percent()
    );
    Ok(Suitability {
        raster: self_mask(&combined),
        summary,
    })
}
