//! Data access for buildings and leases
//!
//! [`PropertySource`] is the read interface used by the API. Two backends
//! implement it: [`SqliteStore`] (the relational store, also the import
//! target) and [`CsvSource`] (re-reads the CSV files through the parsed-row
//! cache).

pub mod config;
pub mod csv_source;
pub mod error;
pub mod import;
pub mod source;
pub mod sqlite;

pub use config::{DataSourceKind, PortfolioConfig};
pub use csv_source::CsvSource;
pub use error::StoreError;
pub use import::{import_buildings, import_leases, ImportReport};
pub use source::{enhanced_building, enhanced_leased_buildings, open_source, PropertySource};
pub use sqlite::SqliteStore;
