use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use portfolio_engine::{reconcile, reconcile_building};
use property_types::{Building, EnhancedBuilding, LeaseRecord, OwnershipFilter};
use tracing::info;

use crate::config::{DataSourceKind, PortfolioConfig};
use crate::csv_source::CsvSource;
use crate::error::StoreError;
use crate::sqlite::SqliteStore;

/// Read access to the building and lease datasets
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Short backend name reported by the health endpoint
    fn describe(&self) -> &'static str;

    async fn buildings(&self, ownership: OwnershipFilter) -> Result<Vec<Building>, StoreError>;

    async fn building(&self, location_code: &str) -> Result<Option<Building>, StoreError>;

    async fn leases(&self) -> Result<Vec<LeaseRecord>, StoreError>;

    async fn leases_for(&self, location_code: &str) -> Result<Vec<LeaseRecord>, StoreError>;
}

/// Leased buildings joined with their reconciled leases
pub async fn enhanced_leased_buildings(
    source: &dyn PropertySource,
    today: NaiveDate,
) -> Result<Vec<EnhancedBuilding>, StoreError> {
    let buildings = source.buildings(OwnershipFilter::Leased).await?;
    let leases = source.leases().await?;
    Ok(reconcile(&buildings, &leases, today))
}

/// One building with its reconciled leases, or `None` when unknown
pub async fn enhanced_building(
    source: &dyn PropertySource,
    location_code: &str,
    today: NaiveDate,
) -> Result<Option<EnhancedBuilding>, StoreError> {
    let Some(building) = source.building(location_code).await? else {
        return Ok(None);
    };
    let leases = source.leases_for(location_code).await?;
    let records: Vec<&LeaseRecord> = leases.iter().collect();
    Ok(Some(reconcile_building(&building, &records, today)))
}

/// Open the backend selected by `config.source`
pub async fn open_source(config: &PortfolioConfig) -> Result<Arc<dyn PropertySource>, StoreError> {
    match config.source {
        DataSourceKind::Sqlite => {
            let store = SqliteStore::connect(&config.database_url).await?;
            Ok(Arc::new(store))
        }
        DataSourceKind::Csv => {
            info!(
                "Serving CSV files {} and {}",
                config.buildings_csv.display(),
                config.leases_csv.display()
            );
            Ok(Arc::new(CsvSource::new(
                config.buildings_csv.clone(),
                config.leases_csv.clone(),
            )))
        }
    }
}
