use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage is unavailable")]
    StorageUnavailable,

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] camper_catalog_common::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
