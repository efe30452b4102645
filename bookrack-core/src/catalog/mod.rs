//! Catalog queries: the repository port and its SQLite implementation.

pub mod materialize;
pub mod sqlite;

use async_trait::async_trait;
use bookrack_model::{BookID, CustomColumn, Document};

use crate::error::Result;
use crate::query::QueryOptions;

pub use materialize::{RawDocument, extract_pages, materialize};
pub use sqlite::{CATALOG_FILE, SqliteCatalogRepository, connect_read_only};

/// One page of a listing plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    /// Matches across all pages.
    pub count: u32,
    /// The requested page, in sort order.
    pub documents: Vec<Document>,
}

/// Read access to a Calibre catalog.
///
/// Implementations apply their field visibility policy to every document
/// they return.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Listing restricted by the options' entity filter. No match is an
    /// empty page, not an error.
    async fn query_by(&self, options: &QueryOptions) -> Result<DocumentPage>;

    /// Listing filtered by the options' search text. No match is
    /// [`crate::CatalogError::NoDocumentsFound`].
    async fn query_search(&self, options: &QueryOptions) -> Result<DocumentPage>;

    /// A single book, or `None` when the id is unknown.
    async fn query_document(&self, id: BookID) -> Result<Option<Document>>;

    /// User-defined columns registered in the catalog.
    async fn query_custom_columns(&self) -> Result<Vec<CustomColumn>>;
}
