//! Error types for template operations

use thiserror::Error;

/// Errors that can occur while filling a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Package could not be read or written
    #[error("Package error: {0}")]
    Package(#[from] store::DocxError),

    /// Structural error from the node tree
    #[error("Document model error: {0}")]
    Model(#[from] doc_model::DocModelError),

    /// Invalid visibility configuration
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
