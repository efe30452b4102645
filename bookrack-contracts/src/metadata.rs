//! Access to per-book `metadata.opf` files.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Name of the per-book metadata file inside each book directory.
pub const METADATA_FILE: &str = "metadata.opf";

/// Reads the raw metadata file that accompanies a book directory.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// `relative_path` is the book's `path` column, relative to the library
    /// root.
    async fn read_metadata(&self, relative_path: &str) -> io::Result<Vec<u8>>;
}

/// Reads `<library>/<path>/metadata.opf` from the local filesystem.
#[derive(Debug, Clone)]
pub struct LibraryFiles {
    root: PathBuf,
}

impl LibraryFiles {
    /// `root` is the library directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn metadata_path(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path).join(METADATA_FILE)
    }
}

#[async_trait]
impl MetadataSource for LibraryFiles {
    async fn read_metadata(&self, relative_path: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.metadata_path(relative_path)).await
    }
}
