//! Pipeline orchestration and summary derivation for VendorMetrics.
//!
//! This crate ties the raw loader and the storage layer together into the
//! two-stage batch job (`run_ingest` → `run_summary`) and owns the
//! cleaning/derivation transform applied to the combined aggregate.

pub mod clean;
pub mod pipeline;
pub mod summary;
