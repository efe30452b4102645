#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use bookrack_contracts::metadata::LibraryFiles;
use bookrack_core::catalog::{SqliteCatalogRepository, connect_read_only};
use bookrack_core::prefs::CalibrePrefs;
use bookrack_server::{AppState, router};

#[path = "../../../bookrack-core/tests/support/mod.rs"]
pub mod support;

pub use support::*;

/// A running router over a fixture library, wired the way the binary
/// wires it: prefs-driven visibility and virtual libraries.
pub struct TestApp {
    pub server: TestServer,
    library: Library,
}

impl TestApp {
    pub fn library(&self) -> &Library {
        &self.library
    }
}

pub async fn build_test_app(books_per_page: u32) -> Result<TestApp> {
    let library = Library::create().await?;
    let pool = connect_read_only(library.path(), 2).await?;
    let prefs = CalibrePrefs::load(library.path()).await?;

    let repository = SqliteCatalogRepository::new(
        pool,
        Arc::new(prefs.display_fields()),
        Arc::new(LibraryFiles::new(library.path())),
    );
    let state = AppState::new(
        Arc::new(repository),
        Arc::new(prefs.virtual_libraries()),
        books_per_page,
    );

    let server =
        TestServer::new(router(state)).map_err(|err| anyhow!(err.to_string()))?;
    Ok(TestApp { server, library })
}
