//! Reprojection and resampling
//!
//! - **warp**: Nearest-neighbour warp onto a region-clipped grid in a target CRS

mod warp;

pub use warp::{warp, TargetGrid};
