//! Adapters over Calibre's `metadata_db_prefs_backup.json`.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;

use bookrack_contracts::virtual_library::{VirtualLibrary, VirtualLibraryResolver};
use bookrack_contracts::visibility::{FieldVisibility, VisibilityError};
use serde::Deserialize;
use tracing::warn;

use crate::error::Result;

/// File Calibre writes next to `metadata.db` with a copy of its library
/// preferences.
pub const PREFS_FILE: &str = "metadata_db_prefs_backup.json";

/// The subset of Calibre library preferences the catalog uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalibrePrefs {
    /// Ordered `[field, visible]` pairs from the book details panel.
    #[serde(default)]
    pub book_display_fields: Vec<(String, bool)>,
    /// Saved searches keyed by name.
    #[serde(default)]
    pub virtual_libraries: BTreeMap<String, String>,
}

impl CalibrePrefs {
    /// Parses the backup's JSON; unknown keys are ignored.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads the preferences backup from a library directory. A missing
    /// file is not an error; it yields empty preferences.
    pub async fn load(library: &Path) -> Result<Self> {
        let path = library.join(PREFS_FILE);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Self::from_json(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Calibre preferences not found at {}; all optional fields stay hidden",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Visibility policy built from the book details panel settings.
    pub fn display_fields(&self) -> DisplayFields {
        DisplayFields {
            fields: self.book_display_fields.iter().cloned().collect(),
        }
    }

    /// Resolver over the saved virtual libraries.
    pub fn virtual_libraries(&self) -> VirtualLibraries {
        VirtualLibraries {
            libraries: self.virtual_libraries.clone(),
        }
    }
}

/// Visibility as configured in Calibre's book details panel.
///
/// Fields Calibre does not list are reported as unknown.
#[derive(Debug, Clone, Default)]
pub struct DisplayFields {
    fields: HashMap<String, bool>,
}

impl DisplayFields {
    /// Later pairs win over earlier ones for the same field.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, visible)| (name.into(), visible))
                .collect(),
        }
    }
}

impl FieldVisibility for DisplayFields {
    fn is_visible(&self, field: &str) -> std::result::Result<bool, VisibilityError> {
        self.fields
            .get(field)
            .copied()
            .ok_or_else(|| VisibilityError::UnknownField(field.to_string()))
    }
}

/// Policy that exposes every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowAllFields;

impl FieldVisibility for ShowAllFields {
    fn is_visible(&self, _field: &str) -> std::result::Result<bool, VisibilityError> {
        Ok(true)
    }
}

/// Virtual libraries read from Calibre preferences.
#[derive(Debug, Clone, Default)]
pub struct VirtualLibraries {
    libraries: BTreeMap<String, String>,
}

impl VirtualLibraryResolver for VirtualLibraries {
    fn resolve(&self, name: &str) -> Option<VirtualLibrary> {
        self.libraries.get(name).map(|definition| VirtualLibrary {
            name: name.to_string(),
            definition: definition.clone(),
        })
    }

    fn names(&self) -> Vec<String> {
        self.libraries.keys().cloned().collect()
    }
}
