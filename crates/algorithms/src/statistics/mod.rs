//! Statistical reductions for raster data
//!
//! - **temporal**: Per-cell annual totals of a monthly series

pub mod temporal;

pub use temporal::annual_sum;
