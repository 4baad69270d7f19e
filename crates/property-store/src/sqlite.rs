//! SQLite-backed store
//!
//! Two tables joined by the textual location code. Lease rows may name
//! location codes absent from `buildings`, so there is no foreign key.

use async_trait::async_trait;
use property_types::{Building, LeaseRecord, Ownership, OwnershipFilter};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{info, warn};

use crate::config::database_dir;
use crate::error::StoreError;
use crate::source::PropertySource;

const BUILDING_COLUMNS: &str = "location_code, name, installation_name, owned_or_leased, \
    gsa_region, street_address, city, state, zip_code, latitude, longitude, \
    rentable_square_feet, available_square_feet, construction_year, congressional_district, \
    congressional_representative, building_status, asset_type";

const LEASE_COLUMNS: &str = "location_code, lease_number, name, street_address, city, state, \
    zip_code, lease_effective_date, lease_expiration_date, congressional_representative, \
    rentable_square_feet, available_square_feet";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` and create the schema if needed
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        if database_url.contains(":memory:") {
            return Self::in_memory().await;
        }
        if let Some(dir) = database_dir(database_url) {
            if let Err(e) = tokio::fs::create_dir_all(&dir).await {
                warn!("Could not create {}: {}", dir.display(), e);
            }
        }

        info!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database on a single connection
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
        info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS buildings (
                location_code TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                installation_name TEXT NOT NULL DEFAULT '',
                owned_or_leased TEXT NOT NULL,
                gsa_region INTEGER,
                street_address TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                state TEXT NOT NULL DEFAULT '',
                zip_code TEXT NOT NULL DEFAULT '',
                latitude REAL,
                longitude REAL,
                rentable_square_feet REAL,
                available_square_feet REAL,
                construction_year INTEGER,
                congressional_district INTEGER,
                congressional_representative TEXT NOT NULL DEFAULT '',
                building_status TEXT NOT NULL DEFAULT '',
                asset_type TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leased_properties (
                location_code TEXT NOT NULL,
                lease_number TEXT NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                street_address TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                state TEXT NOT NULL DEFAULT '',
                zip_code TEXT NOT NULL DEFAULT '',
                lease_effective_date TEXT,
                lease_expiration_date TEXT,
                congressional_representative TEXT NOT NULL DEFAULT '',
                rentable_square_feet REAL,
                available_square_feet REAL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (location_code, lease_number)
            )
            "#,
        )
        .execute(pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_buildings_owned_or_leased ON buildings(owned_or_leased)",
            "CREATE INDEX IF NOT EXISTS idx_buildings_state ON buildings(state)",
            "CREATE INDEX IF NOT EXISTS idx_leased_properties_location_code ON leased_properties(location_code)",
            "CREATE INDEX IF NOT EXISTS idx_leased_properties_effective ON leased_properties(lease_effective_date)",
            "CREATE INDEX IF NOT EXISTS idx_leased_properties_expiration ON leased_properties(lease_expiration_date)",
        ] {
            sqlx::query(statement).execute(pool).await?;
        }

        info!("Migrations complete");
        Ok(())
    }

    /// Insert or replace one batch of buildings in a single transaction
    pub async fn upsert_buildings(&self, batch: &[Building]) -> Result<u64, StoreError> {
        let sql = format!(
            "INSERT INTO buildings ({BUILDING_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(location_code) DO UPDATE SET \
                name = excluded.name, \
                installation_name = excluded.installation_name, \
                owned_or_leased = excluded.owned_or_leased, \
                gsa_region = excluded.gsa_region, \
                street_address = excluded.street_address, \
                city = excluded.city, \
                state = excluded.state, \
                zip_code = excluded.zip_code, \
                latitude = excluded.latitude, \
                longitude = excluded.longitude, \
                rentable_square_feet = excluded.rentable_square_feet, \
                available_square_feet = excluded.available_square_feet, \
                construction_year = excluded.construction_year, \
                congressional_district = excluded.congressional_district, \
                congressional_representative = excluded.congressional_representative, \
                building_status = excluded.building_status, \
                asset_type = excluded.asset_type, \
                updated_at = datetime('now')"
        );

        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for b in batch {
            let result = sqlx::query(&sql)
                .bind(&b.location_code)
                .bind(&b.name)
                .bind(&b.installation_name)
                .bind(b.ownership.flag())
                .bind(b.gsa_region)
                .bind(&b.street_address)
                .bind(&b.city)
                .bind(&b.state)
                .bind(&b.zip_code)
                .bind(b.latitude)
                .bind(b.longitude)
                .bind(b.rentable_square_feet)
                .bind(b.available_square_feet)
                .bind(b.construction_year)
                .bind(b.congressional_district)
                .bind(&b.congressional_representative)
                .bind(&b.status)
                .bind(&b.asset_type)
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;

        Ok(written)
    }

    /// Insert or replace one batch of lease records in a single transaction
    pub async fn upsert_leases(&self, batch: &[LeaseRecord]) -> Result<u64, StoreError> {
        let sql = format!(
            "INSERT INTO leased_properties ({LEASE_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(location_code, lease_number) DO UPDATE SET \
                name = excluded.name, \
                street_address = excluded.street_address, \
                city = excluded.city, \
                state = excluded.state, \
                zip_code = excluded.zip_code, \
                lease_effective_date = excluded.lease_effective_date, \
                lease_expiration_date = excluded.lease_expiration_date, \
                congressional_representative = excluded.congressional_representative, \
                rentable_square_feet = excluded.rentable_square_feet, \
                available_square_feet = excluded.available_square_feet, \
                updated_at = datetime('now')"
        );

        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for l in batch {
            let result = sqlx::query(&sql)
                .bind(&l.location_code)
                .bind(&l.lease_number)
                .bind(&l.name)
                .bind(&l.street_address)
                .bind(&l.city)
                .bind(&l.state)
                .bind(&l.zip_code)
                .bind(&l.effective_date)
                .bind(&l.expiration_date)
                .bind(&l.congressional_representative)
                .bind(l.rentable_square_feet)
                .bind(l.available_square_feet)
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;

        Ok(written)
    }

    pub async fn count_buildings(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM buildings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_leases(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM leased_properties")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl PropertySource for SqliteStore {
    fn describe(&self) -> &'static str {
        "sqlite"
    }

    async fn buildings(&self, ownership: OwnershipFilter) -> Result<Vec<Building>, StoreError> {
        let rows: Vec<DbBuilding> = match ownership.ownership() {
            Some(ownership) => {
                let sql = format!(
                    "SELECT {BUILDING_COLUMNS} FROM buildings \
                     WHERE owned_or_leased = ? ORDER BY location_code"
                );
                sqlx::query_as(&sql)
                    .bind(ownership.flag())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {BUILDING_COLUMNS} FROM buildings ORDER BY location_code");
                sqlx::query_as(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.into_iter().map(Building::try_from).collect()
    }

    async fn building(&self, location_code: &str) -> Result<Option<Building>, StoreError> {
        let sql = format!("SELECT {BUILDING_COLUMNS} FROM buildings WHERE location_code = ?");
        let row: Option<DbBuilding> = sqlx::query_as(&sql)
            .bind(location_code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Building::try_from).transpose()
    }

    async fn leases(&self) -> Result<Vec<LeaseRecord>, StoreError> {
        let sql = format!(
            "SELECT {LEASE_COLUMNS} FROM leased_properties ORDER BY location_code, lease_number"
        );
        let rows: Vec<DbLease> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(LeaseRecord::from).collect())
    }

    async fn leases_for(&self, location_code: &str) -> Result<Vec<LeaseRecord>, StoreError> {
        let sql = format!(
            "SELECT {LEASE_COLUMNS} FROM leased_properties \
             WHERE location_code = ? ORDER BY lease_number"
        );
        let rows: Vec<DbLease> = sqlx::query_as(&sql)
            .bind(location_code)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LeaseRecord::from).collect())
    }
}

#[derive(Debug, FromRow)]
struct DbBuilding {
    location_code: String,
    name: String,
    installation_name: String,
    owned_or_leased: String,
    gsa_region: Option<i64>,
    street_address: String,
    city: String,
    state: String,
    zip_code: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    rentable_square_feet: Option<f64>,
    available_square_feet: Option<f64>,
    construction_year: Option<i32>,
    congressional_district: Option<i32>,
    congressional_representative: String,
    building_status: String,
    asset_type: String,
}

impl TryFrom<DbBuilding> for Building {
    type Error = StoreError;

    fn try_from(row: DbBuilding) -> Result<Self, Self::Error> {
        let ownership: Ownership = row.owned_or_leased.parse().map_err(|_| {
            StoreError::InvalidRow(format!(
                "building {} has ownership flag '{}'",
                row.location_code, row.owned_or_leased
            ))
        })?;

        Ok(Building {
            location_code: row.location_code,
            name: row.name,
            installation_name: row.installation_name,
            ownership,
            gsa_region: row.gsa_region,
            street_address: row.street_address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            latitude: row.latitude,
            longitude: row.longitude,
            rentable_square_feet: row.rentable_square_feet,
            available_square_feet: row.available_square_feet,
            construction_year: row.construction_year,
            congressional_district: row.congressional_district,
            congressional_representative: row.congressional_representative,
            status: row.building_status,
            asset_type: row.asset_type,
        })
    }
}

#[derive(Debug, FromRow)]
struct DbLease {
    location_code: String,
    lease_number: String,
    name: String,
    street_address: String,
    city: String,
    state: String,
    zip_code: String,
    lease_effective_date: Option<String>,
    lease_expiration_date: Option<String>,
    congressional_representative: String,
    rentable_square_feet: Option<f64>,
    available_square_feet: Option<f64>,
}

impl From<DbLease> for LeaseRecord {
    fn from(row: DbLease) -> Self {
        LeaseRecord {
            location_code: row.location_code,
            lease_number: row.lease_number,
            name: row.name,
            street_address: row.street_address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            effective_date: row.lease_effective_date,
            expiration_date: row.lease_expiration_date,
            congressional_representative: row.congressional_representative,
            rentable_square_feet: row.rentable_square_feet,
            available_square_feet: row.available_square_feet,
        }
    }
}
