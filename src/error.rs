// Error types for dataset loading, configuration and CLI option parsing
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Unknown dataset: {0}. Available: {1}")]
    UnknownDataset(String, String),
    #[error("Unknown sort order: {0}. Supported: desc, asc, original")]
    UnknownSort(String),
    #[error("Unknown output format: {0}. Supported: human, plain, json")]
    UnknownFormat(String),
    #[error("Failed to parse dataset file {path}: {source}")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type DashResult<T> = std::result::Result<T, DashError>;
