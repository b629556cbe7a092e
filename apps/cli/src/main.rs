//! VendorMetrics CLI — batch vendor sales summary tool.
//!
//! Loads delimited inventory exports into a local SQLite store and builds
//! the per-vendor, per-brand sales-and-purchasing summary table.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = vendormetrics_shared::load_config()?;
    commands::init_tracing(&cli, &config)?;
    commands::run(cli, config).await
}
