//! Named saved searches defined in Calibre preferences.

/// A named, saved search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualLibrary {
    /// Name shown in Calibre's virtual library menu.
    pub name: String,
    /// Search expression, in the same syntax as free-text search.
    pub definition: String,
}

/// Looks up virtual libraries by name.
pub trait VirtualLibraryResolver: Send + Sync {
    /// Exact, case-sensitive lookup.
    fn resolve(&self, name: &str) -> Option<VirtualLibrary>;

    /// All known names, sorted.
    fn names(&self) -> Vec<String>;
}

/// Resolver with no libraries at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVirtualLibraries;

impl VirtualLibraryResolver for NoVirtualLibraries {
    fn resolve(&self, _name: &str) -> Option<VirtualLibrary> {
        None
    }

    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}
