//! Read-only source over the raw CSV files
//!
//! Rows come from the shared [`CsvCache`], so an unchanged file is parsed
//! once; every call re-runs the row transform.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use property_ingest::{buildings_from_rows, leases_from_rows, CsvCache};
use property_types::{Building, LeaseRecord, OwnershipFilter};

use crate::error::StoreError;
use crate::source::PropertySource;

pub struct CsvSource {
    buildings_path: PathBuf,
    leases_path: PathBuf,
    cache: Arc<CsvCache>,
}

impl CsvSource {
    pub fn new(buildings_path: impl Into<PathBuf>, leases_path: impl Into<PathBuf>) -> Self {
        Self::with_cache(buildings_path, leases_path, Arc::new(CsvCache::new()))
    }

    pub fn with_cache(
        buildings_path: impl Into<PathBuf>,
        leases_path: impl Into<PathBuf>,
        cache: Arc<CsvCache>,
    ) -> Self {
        Self {
            buildings_path: buildings_path.into(),
            leases_path: leases_path.into(),
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<CsvCache> {
        &self.cache
    }

    async fn all_buildings(&self) -> Result<Vec<Building>, StoreError> {
        let rows = self.cache.rows(&self.buildings_path).await?;
        Ok(buildings_from_rows(&rows).records)
    }
}

#[async_trait]
impl PropertySource for CsvSource {
    fn describe(&self) -> &'static str {
        "csv"
    }

    async fn buildings(&self, ownership: OwnershipFilter) -> Result<Vec<Building>, StoreError> {
        let mut buildings = self.all_buildings().await?;
        buildings.retain(|b| ownership.matches(b.ownership));
        Ok(buildings)
    }

    async fn building(&self, location_code: &str) -> Result<Option<Building>, StoreError> {
        Ok(self
            .all_buildings()
            .await?
            .into_iter()
            .find(|b| b.location_code == location_code))
    }

    async fn leases(&self) -> Result<Vec<LeaseRecord>, StoreError> {
        let rows = self.cache.rows(&self.leases_path).await?;
        Ok(leases_from_rows(&rows).records)
    }

    async fn leases_for(&self, location_code: &str) -> Result<Vec<LeaseRecord>, StoreError> {
        let mut leases = self.leases().await?;
        leases.retain(|l| l.location_code == location_code);
        Ok(leases)
    }
}
