//! Two-stage batch pipeline: raw load, then summary build.
//!
//! The stages communicate only through the persisted tables. The summary
//! stage declares its dependency on the raw tables explicitly: it probes
//! for all four source tables and refuses to run if any is missing,
//! rather than relying on run-order convention.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;
use vendormetrics_ingest::IngestReport;
use vendormetrics_shared::{Result, VendorMetricsError};
use vendormetrics_storage::{SOURCE_TABLES, Store};

use crate::summary::{self, SummaryReport};

/// Outcome of a full ingest-then-summarize run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub ingest: IngestReport,
    pub summary: SummaryReport,
    /// Total wall-clock time across both stages.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Check that every source table the summary reads from exists.
pub async fn check_source_tables(store: &Store) -> Result<()> {
    let mut missing = Vec::new();
    for name in SOURCE_TABLES {
        if !store.table_exists(name).await? {
            missing.push(name);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(VendorMetricsError::validation(format!(
            "missing source tables: {} — run the raw loader first",
            missing.join(", ")
        )))
    }
}

/// Stage 1: load every delimited file in `data_dir` into the store.
pub async fn run_ingest(
    store: &Store,
    data_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<IngestReport> {
    progress.phase("Loading raw files");
    vendormetrics_ingest::ingest_directory(data_dir, store).await
}

/// Stage 2: build the vendor summary from the raw tables.
///
/// Fails with a validation error naming the missing tables if the raw
/// load has not happened yet; nothing is written in that case.
pub async fn run_summary(
    store: &Store,
    progress: &dyn ProgressReporter,
) -> Result<SummaryReport> {
    progress.phase("Checking source tables");
    check_source_tables(store).await?;
    summary::build_vendor_summary(store, progress).await
}

/// Run both stages in order over one store handle.
pub async fn run_full(
    store: &Store,
    data_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();

    let ingest = run_ingest(store, data_dir, progress).await?;
    let summary = run_summary(store, progress).await?;

    let report = RunReport {
        ingest,
        summary,
        elapsed: start.elapsed(),
    };

    info!(
        files_ingested = report.ingest.files_ingested,
        summary_rows = report.summary.rows,
        elapsed_ms = report.elapsed.as_millis(),
        "pipeline complete"
    );

    Ok(report)
}
