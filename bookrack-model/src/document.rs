use chrono::{DateTime, Utc};

use crate::entity::{EntityList, EntityRecord};
use crate::ids::BookID;

/// A fully materialized book, as returned by catalog queries.
///
/// Fields hidden by the active visibility policy hold their zero value;
/// they are never omitted from the structure.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub id: BookID,
    pub title: String,
    pub title_sort: String,
    pub author_sort: String,
    pub authors: EntityList,
    pub tags: EntityList,
    pub formats: EntityList,
    pub languages: EntityList,
    pub identifiers: EntityList,
    pub publisher: Option<EntityRecord>,
    pub series: Option<EntityRecord>,
    pub series_index: f64,
    /// Calibre stores ratings as 0..=10 (half stars).
    pub rating: i64,
    /// Largest format file, in bytes.
    pub size: i64,
    pub isbn: String,
    pub lccn: String,
    /// Book directory relative to the library root.
    pub path: String,
    pub pubdate: Option<DateTime<Utc>>,
    pub timestamp: Option<DateTime<Utc>>,
    pub flags: i64,
    pub uuid: String,
    pub has_cover: bool,
    pub comments: String,
    pub pages: u32,
}

impl Document {
    pub fn new(id: BookID) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// User-defined column declared in the catalog's `custom_columns` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomColumn {
    pub id: i64,
    /// Lookup key without the leading `#`.
    pub label: String,
    pub name: String,
    pub datatype: String,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn hidden_fields_are_serialized_as_zero_values() {
        let doc = Document::new(BookID::new(7));
        let json = serde_json::to_value(&doc).expect("serialize");
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "");
        assert!(json["authors"].as_array().expect("array").is_empty());
        assert!(json["publisher"].is_null());
        assert!(json["pubdate"].is_null());
        assert_eq!(json["pages"], 0);
    }
}
