//! Batched CSV to SQLite import
//!
//! Each batch is written in its own transaction. A failed batch is logged and
//! counted and the remaining batches still run.

use std::future::Future;
use std::path::{Path, PathBuf};

use property_ingest::{buildings_from_rows, leases_from_rows, parse_csv_file, IngestError, Row};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::sqlite::SqliteStore;

/// Outcome of importing one CSV file into one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub table: &'static str,
    /// Data rows that survived CSV parsing
    pub rows_read: usize,
    /// Rows rejected by the record transform
    pub skipped: usize,
    pub written: u64,
    pub batches: usize,
    pub failed_batches: usize,
}

impl ImportReport {
    /// True when there was something to write and every batch failed
    pub fn failed_outright(&self) -> bool {
        self.batches > 0 && self.failed_batches == self.batches
    }
}

pub async fn import_buildings(
    store: &SqliteStore,
    path: &Path,
    batch_size: usize,
) -> Result<ImportReport, StoreError> {
    let rows = read_rows(path).await?;
    let transformed = buildings_from_rows(&rows);

    let mut report = ImportReport {
        table: "buildings",
        rows_read: rows.len(),
        skipped: transformed.skipped,
        ..Default::default()
    };
    write_batches(&mut report, &transformed.records, batch_size, |batch| {
        store.upsert_buildings(batch)
    })
    .await;

    Ok(report)
}

pub async fn import_leases(
    store: &SqliteStore,
    path: &Path,
    batch_size: usize,
) -> Result<ImportReport, StoreError> {
    let rows = read_rows(path).await?;
    let transformed = leases_from_rows(&rows);

    let mut report = ImportReport {
        table: "leased_properties",
        rows_read: rows.len(),
        skipped: transformed.skipped,
        ..Default::default()
    };
    write_batches(&mut report, &transformed.records, batch_size, |batch| {
        store.upsert_leases(batch)
    })
    .await;

    Ok(report)
}

async fn read_rows(path: &Path) -> Result<Vec<Row>, StoreError> {
    info!("Reading {}", path.display());
    let owned: PathBuf = path.to_path_buf();
    let rows = tokio::task::spawn_blocking(move || parse_csv_file(&owned))
        .await
        .map_err(|e| IngestError::Task(e.to_string()))??;
    Ok(rows)
}

async fn write_batches<'a, T, F, Fut>(
    report: &mut ImportReport,
    records: &'a [T],
    batch_size: usize,
    write: F,
) where
    F: Fn(&'a [T]) -> Fut,
    Fut: Future<Output = Result<u64, StoreError>> + 'a,
{
    let batch_size = batch_size.max(1);
    report.batches = records.len().div_ceil(batch_size);

    for (index, batch) in records.chunks(batch_size).enumerate() {
        match write(batch).await {
            Ok(written) => {
                report.written += written;
                info!(
                    "{}: batch {}/{} wrote {} rows",
                    report.table,
                    index + 1,
                    report.batches,
                    written
                );
            }
            Err(e) => {
                report.failed_batches += 1;
                warn!(
                    "{}: batch {}/{} failed: {}",
                    report.table,
                    index + 1,
                    report.batches,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PropertySource;
    use pretty_assertions::assert_eq;
    use property_types::OwnershipFilter;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_imports_in_batches() {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = String::from("Location Code,Owned or Leased,City,State\n");
        for i in 0..5 {
            csv.push_str(&format!("CODE{i},L,Austin,tx\n"));
        }
        csv.push_str(",L,Nowhere,TX\n");
        let path = write(dir.path(), "buildings.csv", &csv);

        let store = SqliteStore::in_memory().await.unwrap();
        let report = import_buildings(&store, &path, 2).await.unwrap();

        assert_eq!(
            report,
            ImportReport {
                table: "buildings",
                rows_read: 6,
                skipped: 1,
                written: 5,
                batches: 3,
                failed_batches: 0,
            }
        );
        assert!(!report.failed_outright());

        let stored = store.buildings(OwnershipFilter::Leased).await.unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[0].state, "TX");
    }

    #[tokio::test]
    async fn test_import_leases_keeps_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "leases.csv",
            "Location Code,Lease Number,Lease Effective Date,Lease Expiration Date\n\
             NOBUILDING,L1,1/1/2020,12/31/2029\n",
        );

        let store = SqliteStore::in_memory().await.unwrap();
        let report = import_leases(&store, &path, 1000).await.unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.batches, 1);
        assert_eq!(store.count_leases().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_batches_are_counted() {
        let store = SqliteStore::in_memory().await.unwrap();
        sqlx::query("DROP TABLE leased_properties")
            .execute(store.pool())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "leases.csv",
            "Location Code,Lease Number\nA,L1\nB,L2\nC,L3\n",
        );

        let report = import_leases(&store, &path, 2).await.unwrap();
        assert_eq!(report.batches, 2);
        assert_eq!(report.failed_batches, 2);
        assert_eq!(report.written, 0);
        assert!(report.failed_outright());
    }

    #[tokio::test]
    async fn test_missing_file_fails_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::in_memory().await.unwrap();
        let result = import_buildings(&store, &dir.path().join("missing.csv"), 1000).await;
        assert!(matches!(
            result,
            Err(StoreError::Ingest(IngestError::Io { .. }))
        ));
    }

    #[test]
    fn test_empty_import_is_not_a_failure() {
        let report = ImportReport::default();
        assert!(!report.failed_outright());
    }
}
