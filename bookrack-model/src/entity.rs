/// One related attribute value of a book: an author, tag, series,
/// publisher, identifier, format, or language.
///
/// For identifiers `name` holds the identifier type (e.g. `isbn`) and `url`
/// the identifier value; for every other kind `url` stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    pub id: i64,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    pub url: String,
}

impl EntityRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            url: String::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Ordered list of entity records as stored on a [`crate::Document`].
pub type EntityList = Vec<EntityRecord>;
