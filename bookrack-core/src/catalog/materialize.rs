//! Turning base-projection rows into visibility-filtered documents.

use bookrack_contracts::metadata::MetadataSource;
use bookrack_contracts::visibility::FieldVisibility;
use bookrack_model::{BookID, Document};
use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::decode::{NAME_ID, NAME_ID_VALUE, decode_entities, decode_single};

static PAGES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?si)<meta name="calibre:user_metadata:#pages" .*?, &quot;#value#&quot;: (\d+),"#,
    )
    .expect("pages regex should compile")
});

/// One row of the base projection before visibility is applied.
///
/// Packed columns are still in their `name|id, ...` text form. Fields
/// follow the projection's column order and names.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub rating: i64,
    pub timestamp: Option<DateTime<Utc>>,
    pub size: i64,
    pub tags: String,
    pub comments: String,
    pub series: String,
    pub series_index: f64,
    pub title_sort: String,
    pub author_sort: String,
    pub formats: String,
    pub languages: String,
    pub isbn: String,
    pub identifiers: String,
    pub path: String,
    pub lccn: String,
    pub pubdate: Option<DateTime<Utc>>,
    pub flags: i64,
    pub uuid: String,
    pub has_cover: bool,
}

impl RawDocument {
    /// Reads a row of the base projection by position. NULL or mistyped
    /// values become zero values.
    pub fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: integer(row, 0),
            title: text(row, 1),
            authors: text(row, 2),
            publisher: text(row, 3),
            rating: integer(row, 4),
            timestamp: parse_timestamp(&text(row, 5)),
            size: integer(row, 6),
            tags: text(row, 7),
            comments: text(row, 8),
            series: text(row, 9),
            series_index: real(row, 10),
            title_sort: text(row, 11),
            author_sort: text(row, 12),
            formats: text(row, 13),
            languages: text(row, 14),
            isbn: text(row, 15),
            identifiers: text(row, 16),
            path: text(row, 17),
            lccn: text(row, 18),
            pubdate: parse_timestamp(&text(row, 19)),
            flags: integer(row, 20),
            uuid: text(row, 21),
            has_cover: integer(row, 22) != 0,
        }
    }
}

fn text(row: &SqliteRow, index: usize) -> String {
    row.try_get::<Option<String>, _>(index)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn integer(row: &SqliteRow, index: usize) -> i64 {
    row.try_get::<Option<i64>, _>(index)
        .ok()
        .flatten()
        .unwrap_or(0)
}

fn real(row: &SqliteRow, index: usize) -> f64 {
    match row.try_get::<Option<f64>, _>(index) {
        Ok(value) => value.unwrap_or(0.0),
        Err(_) => integer(row, index) as f64,
    }
}

/// Parses the text forms Calibre writes for dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Page count recorded in a book's `metadata.opf`, or `0`.
pub fn extract_pages(metadata: &[u8]) -> u32 {
    PAGES_PATTERN
        .captures(metadata)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| std::str::from_utf8(digits.as_bytes()).ok())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

async fn read_pages(metadata: &dyn MetadataSource, path: &str) -> u32 {
    match metadata.read_metadata(path).await {
        Ok(bytes) if !bytes.is_empty() => extract_pages(&bytes),
        _ => 0,
    }
}

/// Applies the visibility policy to a raw row and decodes its packed
/// columns.
///
/// Hidden fields keep their zero value. `authors` falls back to the
/// visibility of `author_sort`, `title` to that of `sort`.
pub async fn materialize(
    raw: RawDocument,
    visibility: &dyn FieldVisibility,
    metadata: &dyn MetadataSource,
) -> Document {
    let shows = |field: &str| visibility.shows(field);

    let mut doc = Document {
        id: BookID::new(raw.id),
        title_sort: raw.title_sort,
        author_sort: raw.author_sort,
        series_index: raw.series_index,
        isbn: raw.isbn,
        lccn: raw.lccn,
        flags: raw.flags,
        has_cover: raw.has_cover,
        ..Document::default()
    };

    if shows("authors") || shows("author_sort") {
        doc.authors = decode_entities(&raw.authors, NAME_ID);
    }
    if shows("comments") {
        doc.comments = raw.comments;
    }
    if shows("formats") {
        doc.formats = decode_entities(&raw.formats, NAME_ID);
    }
    if shows("identifiers") {
        doc.identifiers = decode_entities(&raw.identifiers, NAME_ID_VALUE);
    }
    if shows("languages") {
        doc.languages = decode_entities(&raw.languages, NAME_ID);
    }
    // Page lookup needs the real path, so it runs before path redaction.
    if shows("#pages") {
        doc.pages = read_pages(metadata, &raw.path).await;
    }
    if shows("path") {
        doc.path = raw.path;
    }
    if shows("pubdate") {
        doc.pubdate = raw.pubdate;
    }
    if shows("publisher") {
        doc.publisher = decode_single(&raw.publisher);
    }
    if shows("rating") {
        doc.rating = raw.rating;
    }
    if shows("series") {
        doc.series = decode_single(&raw.series);
    }
    if shows("tags") {
        doc.tags = decode_entities(&raw.tags, NAME_ID);
    }
    if shows("timestamp") {
        doc.timestamp = raw.timestamp;
    }
    if shows("title") || shows("sort") {
        doc.title = raw.title;
    }
    if shows("size") {
        doc.size = raw.size;
    }
    if shows("uuid") {
        doc.uuid = raw.uuid;
    }

    doc
}
