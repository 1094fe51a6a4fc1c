//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while parsing or resolving the template catalog.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid {document} document: {message}")]
    InvalidCatalog {
        document: &'static str,
        message: String,
    },

    #[error("Invalid template {template}: {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Failed to parse function.json: {0}")]
    InvalidFunctionJson(String),

    #[error("Template catalog for runtime {runtime} is missing verified templates: {ids}")]
    MissingVerifiedTemplates { runtime: String, ids: String },

    #[error("No templates loaded for runtime {0}")]
    RuntimeNotLoaded(String),

    #[error("No templates found for language {language}, runtime {runtime}, filter {filter}")]
    NoMatchingTemplates {
        language: String,
        runtime: String,
        filter: String,
    },

    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Function already exists at path: {0}")]
    AlreadyExists(PathBuf),

    #[error("Template file path leaves the function directory: {0}")]
    UnsafeFilePath(String),

    #[error("Invalid function name: {0}")]
    InvalidFunctionName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
