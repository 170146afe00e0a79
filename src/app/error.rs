use thiserror::Error;

use swarms_cost::{CatalogError, EstimationError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid config {path}: {message}")]
    Config { path: String, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request to the Swarms API failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("No API key. Set SWARMS_API_KEY, pass --api-key, or add api_key to the config file.")]
    MissingApiKey,

    #[error("Cost estimate failed: {0}")]
    Estimation(#[from] EstimationError),

    #[error("Invalid pricing configuration: {0}")]
    Catalog(#[from] CatalogError),
}
