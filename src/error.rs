use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    #[error("Failed to write experiment log: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
