//! Error types for catalog acquisition.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while fetching, caching, or reading catalogs.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Portal request to {url} failed with status {status}")]
    PortalStatus { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No cached {key} entry")]
    CacheMiss { key: String },

    #[error("Backup catalog file not found: {0}")]
    BackupNotFound(PathBuf),

    #[error("Template error: {0}")]
    Template(#[from] azfunc_templates::TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
