use property_ingest::IngestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}
