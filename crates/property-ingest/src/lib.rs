//! CSV ingestion for the real property inventory datasets
//!
//! - `parser`: delimited text into header-keyed rows with numeric coercion
//! - `transform`: rows into `Building` and `LeaseRecord`
//! - `cache`: parsed rows per file, invalidated on modification time

pub mod cache;
pub mod error;
pub mod parser;
pub mod transform;

pub use cache::CsvCache;
pub use error::IngestError;
pub use parser::{
    normalize_header, parse_csv, parse_csv_bytes, parse_csv_file, FieldValue, Row, NUMERIC_FIELDS,
};
pub use transform::{
    building_from_row, buildings_from_rows, lease_from_row, leases_from_rows, Transformed,
};
