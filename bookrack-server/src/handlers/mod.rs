pub mod documents;
pub mod listing;

pub use documents::{custom_columns, document, virtual_libraries};
pub use listing::{ListingResponse, browse, browse_form, by_entity, by_entity_named};
