//! Trait surfaces describing what the bookrack catalog core needs from the
//! outside world: a field-visibility policy, a reader for per-book metadata
//! files, and virtual-library definitions.

pub mod metadata;
pub mod virtual_library;
pub mod visibility;

/// Frequently used seams for core and server crates.
pub mod prelude {
    pub use super::metadata::{LibraryFiles, MetadataSource};
    pub use super::virtual_library::{VirtualLibrary, VirtualLibraryResolver};
    pub use super::visibility::{FieldVisibility, VisibilityError};
}
