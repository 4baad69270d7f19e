//! Parsed-row cache keyed by file path
//!
//! An entry stays valid while the file's modification time and length are
//! unchanged; any change re-parses the file on the next read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::parser::{parse_csv_file, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    len: u64,
}

struct CacheEntry {
    fingerprint: Fingerprint,
    rows: Arc<Vec<Row>>,
}

/// Shared cache of parsed CSV files
#[derive(Default)]
pub struct CsvCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl CsvCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed rows of `path`, re-parsing when the file changed since the
    /// cached read
    pub async fn rows(&self, path: &Path) -> Result<Arc<Vec<Row>>, IngestError> {
        let fingerprint = fingerprint(path).await?;

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(path) {
                if entry.fingerprint == fingerprint {
                    debug!("CSV cache hit: {}", path.display());
                    return Ok(Arc::clone(&entry.rows));
                }
            }
        }

        let owned = path.to_path_buf();
        let rows = tokio::task::spawn_blocking(move || parse_csv_file(&owned))
            .await
            .map_err(|e| IngestError::Task(e.to_string()))??;
        let rows = Arc::new(rows);

        info!("Parsed {} rows from {}", rows.len(), path.display());

        self.entries.write().await.insert(
            path.to_path_buf(),
            CacheEntry {
                fingerprint,
                rows: Arc::clone(&rows),
            },
        );

        Ok(rows)
    }

    /// Drop the cached rows of one file
    pub async fn invalidate(&self, path: &Path) {
        self.entries.write().await.remove(path);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

async fn fingerprint(path: &Path) -> Result<Fingerprint, IngestError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| IngestError::io(path, e))?;
    let modified = meta.modified().map_err(|e| IngestError::io(path, e))?;
    Ok(Fingerprint {
        modified,
        len: meta.len(),
    })
}
