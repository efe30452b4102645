//! Catalog core: query options, SQL clause composition, packed-column
//! decoding, and document materialization over a Calibre `metadata.db`.

pub mod catalog;
pub mod decode;
pub mod error;
pub mod prefs;
pub mod query;

pub use bookrack_model as model;
pub use error::{CatalogError, Result};

/// Commonly used types for consumers that drive catalog queries.
pub mod prelude {
    pub use crate::catalog::{
        CatalogRepository, DocumentPage, SqliteCatalogRepository,
    };
    pub use crate::error::{CatalogError, Result};
    pub use crate::prefs::{
        CalibrePrefs, DisplayFields, ShowAllFields, VirtualLibraries,
    };
    pub use crate::query::{QueryOptions, RequestParams, SearchExpression};
    pub use bookrack_model::{Document, EntityFilter, EntityRecord, SortBy};
}
