//! Raw data loader: delimited files → replacement tables in the store.
//!
//! Scans a directory for `.csv` files and loads each one into a table
//! named after the file (minus extension), replacing any pre-existing
//! table of that name. A file that fails to parse or write is logged and
//! skipped; the batch continues. Ordering between files is immaterial —
//! they are processed in directory enumeration order.

mod reader;

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{error, info};
use vendormetrics_shared::{Result, VendorMetricsError};
use vendormetrics_storage::Store;

pub use reader::read_delimited;

/// Outcome of one ingest run over a data directory.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Files loaded and written successfully.
    pub files_ingested: usize,
    /// Files skipped after a parse or write failure.
    pub files_failed: usize,
    /// Total wall-clock time for the run.
    pub elapsed: Duration,
}

/// Load every `.csv` file in `data_dir` into the store.
///
/// Each file becomes a replacement table named after the file stem. A
/// failing file does not abort the batch: the failure is logged and the
/// remaining files are still processed.
pub async fn ingest_directory(data_dir: &Path, store: &Store) -> Result<IngestReport> {
    let start = Instant::now();

    // The original layout ships an empty data directory; create it rather
    // than failing the run on first use.
    std::fs::create_dir_all(data_dir).map_err(|e| VendorMetricsError::io(data_dir, e))?;

    let entries = std::fs::read_dir(data_dir).map_err(|e| VendorMetricsError::io(data_dir, e))?;

    let mut files_ingested = 0;
    let mut files_failed = 0;

    for entry in entries {
        let entry = entry.map_err(|e| VendorMetricsError::io(data_dir, e))?;
        let path = entry.path();

        if !path.is_file() || path.extension().is_none_or(|ext| ext != "csv") {
            continue;
        }

        let Some(table_name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };

        match ingest_file(&path, &table_name, store).await {
            Ok(rows) => {
                info!(file = %path.display(), table = %table_name, rows, "file ingested");
                files_ingested += 1;
            }
            Err(e) => {
                error!(file = %path.display(), error = %e, "failed to process file, skipping");
                files_failed += 1;
            }
        }
    }

    let report = IngestReport {
        files_ingested,
        files_failed,
        elapsed: start.elapsed(),
    };

    info!(
        files_ingested = report.files_ingested,
        files_failed = report.files_failed,
        elapsed_ms = report.elapsed.as_millis(),
        "ingestion completed"
    );

    Ok(report)
}

/// Read one file and write it as a replacement table. Returns the row count.
async fn ingest_file(path: &Path, table_name: &str, store: &Store) -> Result<usize> {
    let table = reader::read_delimited(path)?;
    store.replace_table(table_name, &table).await?;
    Ok(table.row_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn test_store(dir: &tempfile::TempDir) -> Store {
        Store::open(&dir.path().join("test.db"))
            .await
            .expect("open test db")
    }

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).expect("create file");
        file.write_all(content.as_bytes()).expect("write file");
    }

    #[tokio::test]
    async fn ingests_all_valid_files() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        write_file(&data_dir, "sales.csv", "VendorNo,Brand,SalesDollars\n1,100,50.0\n");
        write_file(&data_dir, "purchases.csv", "VendorNumber,Brand\n1,100\n2,200\n");

        let store = test_store(&dir).await;
        let report = ingest_directory(&data_dir, &store).await.expect("ingest");

        assert_eq!(report.files_ingested, 2);
        assert_eq!(report.files_failed, 0);
        assert_eq!(store.count_rows("sales").await.unwrap(), 1);
        assert_eq!(store.count_rows("purchases").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn malformed_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        write_file(&data_dir, "good_one.csv", "a,b\n1,2\n");
        write_file(&data_dir, "good_two.csv", "x,y\n3,4\n5,6\n");
        write_file(&data_dir, "broken.csv", "a,b,c\n1,2,3\n4,5\n");

        let store = test_store(&dir).await;
        let report = ingest_directory(&data_dir, &store).await.expect("ingest");

        assert_eq!(report.files_ingested, 2);
        assert_eq!(report.files_failed, 1);
        assert!(store.table_exists("good_one").await.unwrap());
        assert!(store.table_exists("good_two").await.unwrap());
        assert!(!store.table_exists("broken").await.unwrap());
    }

    #[tokio::test]
    async fn non_csv_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        write_file(&data_dir, "notes.txt", "not a table");
        write_file(&data_dir, "inventory.csv", "id\n1\n");

        let store = test_store(&dir).await;
        let report = ingest_directory(&data_dir, &store).await.expect("ingest");

        assert_eq!(report.files_ingested, 1);
        assert!(!store.table_exists("notes").await.unwrap());
    }

    #[tokio::test]
    async fn reingest_replaces_table() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        write_file(&data_dir, "items.csv", "id\n1\n2\n3\n");

        let store = test_store(&dir).await;
        ingest_directory(&data_dir, &store).await.unwrap();
        assert_eq!(store.count_rows("items").await.unwrap(), 3);

        write_file(&data_dir, "items.csv", "id\n9\n");
        ingest_directory(&data_dir, &store).await.unwrap();
        assert_eq!(store.count_rows("items").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_data_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("fresh");

        let store = test_store(&dir).await;
        let report = ingest_directory(&data_dir, &store).await.expect("ingest");

        assert_eq!(report.files_ingested, 0);
        assert!(data_dir.is_dir());
    }
}
