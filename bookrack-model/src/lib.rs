//! Core data model definitions shared across bookrack crates.
#![allow(missing_docs)]

pub mod document;
pub mod entity;
pub mod filter;
pub mod ids;
pub mod presentation;
pub mod sort;

// Intentionally curated re-exports for downstream consumers.
pub use document::{CustomColumn, Document};
pub use entity::{EntityList, EntityRecord};
pub use filter::EntityFilter;
pub use ids::BookID;
pub use presentation::{GuiLang, Layout, Theme};
pub use sort::SortBy;
