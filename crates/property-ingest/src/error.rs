use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("CSV header row is not valid UTF-8")]
    HeaderEncoding,

    #[error("Row at line {line} is missing required field '{field}'")]
    MissingField { field: &'static str, line: u64 },

    #[error("Row at line {line} has unrecognized ownership flag {value:?}")]
    InvalidOwnership { value: String, line: u64 },

    #[error("Background parse task failed: {0}")]
    Task(String),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}
