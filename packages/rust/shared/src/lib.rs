//! Shared types, error model, and configuration for VendorMetrics.
//!
//! This crate is the foundation depended on by all other VendorMetrics crates.
//! It provides:
//! - [`VendorMetricsError`] — the unified error type
//! - Tabular and domain types ([`DataTable`], [`CombinedRow`], [`SummaryRow`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{Result, VendorMetricsError};
pub use types::{Column, ColumnType, CombinedRow, DataTable, SummaryRow, Value};
