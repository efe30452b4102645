//! Error type shared by catalog operations.

use thiserror::Error;

/// Failure of a catalog operation.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The store rejected or failed a query.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A text search matched nothing. Filtered listings never raise this.
    #[error("No documents found")]
    NoDocumentsFound,

    /// Reading a library file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The preferences backup is not valid JSON.
    #[error("Preferences error: {0}")]
    Preferences(#[from] serde_json::Error),
}

/// Result of a catalog operation.
pub type Result<T> = std::result::Result<T, CatalogError>;
