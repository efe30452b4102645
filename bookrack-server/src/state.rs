use std::{fmt, sync::Arc};

use bookrack_contracts::virtual_library::VirtualLibraryResolver;
use bookrack_core::catalog::CatalogRepository;
use bookrack_core::query::QueryOptions;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn CatalogRepository>,
    pub libraries: Arc<dyn VirtualLibraryResolver>,
    pub books_per_page: u32,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("books_per_page", &self.books_per_page)
            .field("virtual_libraries", &self.libraries.names().len())
            .finish()
    }
}

impl AppState {
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        libraries: Arc<dyn VirtualLibraryResolver>,
        books_per_page: u32,
    ) -> Self {
        Self {
            repository,
            libraries,
            books_per_page,
        }
    }

    /// Options restored from a `qos` token, or fresh defaults when the
    /// request carries none.
    pub fn restore_options(&self, token: Option<&str>) -> QueryOptions {
        let mut options = match token.filter(|token| !token.trim().is_empty()) {
            Some(token) => QueryOptions::deserialize(token),
            None => QueryOptions::new(self.books_per_page),
        };
        if options.limit_length == 0 {
            options.limit_length = QueryOptions::new(self.books_per_page).limit_length;
        }
        options
    }
}
