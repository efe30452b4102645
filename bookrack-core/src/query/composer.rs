//! Builders for the SQL fragments appended to the base projection.
//!
//! Fragments are plain text; ids and lengths are integers, and the only
//! free text reaching SQL goes through [`escape_query`].

use bookrack_model::{EntityFilter, SortBy};

/// Projection shared by every document query. Packed columns use `|`
/// between name and id and `, ` between entries.
pub const BASE_QUERY: &str = "SELECT b.id,
b.title,
IFNULL((SELECT group_concat(a.name || '|' || a.id, ', ')
	FROM authors a
	JOIN books_authors_link bal ON(bal.author = a.id)
	WHERE (bal.book = b.id)
), '') authors,
IFNULL((SELECT group_concat(p.name || '|' || p.id, ', ')
	FROM publishers p
	JOIN books_publishers_link bpl ON(p.id = bpl.publisher)
	WHERE (bpl.book = b.id)
), '') publisher,
IFNULL((SELECT r.rating
	FROM ratings r
	WHERE r.id IN (
		SELECT brl.rating
		FROM books_ratings_link brl
		WHERE (brl.book = b.id)
	)
), 0) rating,
b.timestamp,
IFNULL((SELECT MAX(data.uncompressed_size)
	FROM data
	WHERE (data.book = b.id)
), 0) size,
IFNULL((SELECT group_concat(t.name || '|' || t.id, ', ')
	FROM tags t
	JOIN books_tags_link btl ON(btl.tag = t.id)
	WHERE (btl.book = b.id)
), '') tags,
IFNULL((SELECT c.text
	FROM comments c
	WHERE (c.book = b.id)
), '') comments,
IFNULL((SELECT group_concat(s.name || '|' || s.id, ', ')
	FROM series s
	JOIN books_series_link bsl ON(bsl.series = s.id)
	WHERE (bsl.book = b.id)
), '') series,
b.series_index,
b.sort AS title_sort,
b.author_sort,
IFNULL((SELECT group_concat(d.format || '|' || d.id, ', ')
	FROM data d
	WHERE (d.book = b.id)
), '') formats,
IFNULL((SELECT group_concat(l.lang_code || '|' || l.id, ', ')
	FROM books_languages_link bll
	JOIN languages l ON(bll.lang_code = l.id)
	WHERE (bll.book = b.id)
), '') languages,
b.isbn,
IFNULL((SELECT group_concat(i.type || '|' || i.id || '|' || i.val, ', ')
	FROM identifiers i
	WHERE (i.book = b.id)
), '') identifiers,
b.path,
b.lccn,
b.pubdate,
b.flags,
b.uuid,
b.has_cover
FROM books b ";

/// Projection for the total row count of a filter.
pub const COUNT_QUERY: &str = "SELECT COUNT(b.id) FROM books b ";

/// Lists user-defined columns.
pub const CUSTOM_COLUMNS_QUERY: &str =
    "SELECT id, label, name, datatype FROM custom_columns ";

/// Restricts a listing to books linked to entity `id`.
///
/// Returns an empty fragment for non-restricting entities or a zero id.
pub fn having(entity: EntityFilter, id: i64) -> String {
    if id == 0 {
        return String::new();
    }
    let template = match entity {
        EntityFilter::None | EntityFilter::All => return String::new(),
        EntityFilter::Author => {
            "JOIN books_authors_link a ON(a.book = b.id) WHERE (a.author = {}) "
        }
        EntityFilter::Format => {
            "JOIN data d ON(b.id = d.book) JOIN data dd ON (d.format = dd.format) WHERE (dd.id = {}) "
        }
        EntityFilter::Lang => {
            "JOIN books_languages_link l ON(l.book = b.id) WHERE (l.lang_code = {}) "
        }
        EntityFilter::Publisher => {
            "JOIN books_publishers_link p ON(p.book = b.id) WHERE (p.publisher = {}) "
        }
        EntityFilter::Series => {
            "JOIN books_series_link s ON(s.book = b.id) WHERE (s.series = {}) "
        }
        EntityFilter::Tag => {
            "JOIN books_tags_link t ON(t.book = b.id) WHERE (t.tag = {}) "
        }
    };
    template.replacen("{}", &id.to_string(), 1)
}

/// Primary column followed by its tie-breakers.
fn sort_columns(sort_by: SortBy) -> &'static [&'static str] {
    match sort_by {
        SortBy::Unsorted => &[],
        SortBy::Acquisition => &["b.timestamp", "b.pubdate", "b.author_sort"],
        SortBy::Author => &["b.author_sort", "b.timestamp"],
        SortBy::Language => &["languages", "b.author_sort", "b.sort"],
        SortBy::Publisher => &["publisher", "b.author_sort", "b.sort"],
        SortBy::Rating => &["rating", "b.author_sort", "b.sort"],
        SortBy::Series => &["series", "b.series_index", "b.sort"],
        SortBy::Size => &["size", "b.author_sort"],
        SortBy::Tags => &["tags", "b.author_sort"],
        SortBy::Time => &["b.pubdate", "b.timestamp", "b.author_sort"],
        SortBy::Title => &["b.sort", "b.author_sort"],
    }
}

/// Every column carries the direction so ties break the same way.
pub fn order_by(sort_by: SortBy, descending: bool) -> String {
    let columns = sort_columns(sort_by);
    if columns.is_empty() {
        return String::new();
    }
    let direction = if descending { "DESC" } else { "ASC" };
    let list = columns
        .iter()
        .map(|column| format!("{column} {direction}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(" ORDER BY {list} ")
}

/// ` LIMIT start,length ` fragment for one page.
pub fn limit(start: u32, length: u32) -> String {
    format!(" LIMIT {start},{length} ")
}

/// Backslash-escapes newline, carriage return, backslash, and double
/// quote; Ctrl-Z becomes `\Z`. Apostrophes pass through untouched.
///
/// Not idempotent: apply exactly once per raw input.
pub fn escape_query(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() * 2);
    for ch in raw.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\u{1a}' => escaped.push_str("\\Z"),
            other => escaped.push(other),
        }
    }
    escaped
}
