//! Temporary Calibre library with a small, fixed catalog.
#![allow(dead_code)]

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

pub const HOBBIT: i64 = 1;
pub const FELLOWSHIP: i64 = 2;
pub const EARTHSEA: i64 = 3;

pub const TOLKIEN: i64 = 1;
pub const LE_GUIN: i64 = 2;
pub const TAG_FANTASY: i64 = 1;
pub const SERIES_LOTR: i64 = 1;
pub const PUBLISHER_ALLEN: i64 = 1;
pub const LANG_GERMAN: i64 = 2;
/// `data` row of the Fellowship PDF.
pub const DATA_PDF: i64 = 3;

pub const HOBBIT_PATH: &str = "J.R.R. Tolkien/The Hobbit (1)";
pub const HOBBIT_PAGES: u32 = 310;

const SCHEMA: &str = r#"
CREATE TABLE books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT 'Unknown',
    sort TEXT,
    timestamp TIMESTAMP,
    pubdate TIMESTAMP,
    series_index REAL NOT NULL DEFAULT 1.0,
    author_sort TEXT,
    isbn TEXT DEFAULT '',
    lccn TEXT DEFAULT '',
    path TEXT NOT NULL DEFAULT '',
    flags INTEGER NOT NULL DEFAULT 1,
    uuid TEXT,
    has_cover BOOL DEFAULT 0,
    last_modified TIMESTAMP
);
CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL, sort TEXT, link TEXT NOT NULL DEFAULT '');
CREATE TABLE books_authors_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, author INTEGER NOT NULL);
CREATE TABLE publishers (id INTEGER PRIMARY KEY, name TEXT NOT NULL, sort TEXT);
CREATE TABLE books_publishers_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, publisher INTEGER NOT NULL);
CREATE TABLE ratings (id INTEGER PRIMARY KEY, rating INTEGER);
CREATE TABLE books_ratings_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, rating INTEGER NOT NULL);
CREATE TABLE data (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, format TEXT NOT NULL, uncompressed_size INTEGER NOT NULL, name TEXT NOT NULL);
CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE books_tags_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, tag INTEGER NOT NULL);
CREATE TABLE comments (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, text TEXT NOT NULL);
CREATE TABLE series (id INTEGER PRIMARY KEY, name TEXT NOT NULL, sort TEXT);
CREATE TABLE books_series_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, series INTEGER NOT NULL);
CREATE TABLE languages (id INTEGER PRIMARY KEY, lang_code TEXT NOT NULL);
CREATE TABLE books_languages_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, lang_code INTEGER NOT NULL, item_order INTEGER NOT NULL DEFAULT 0);
CREATE TABLE identifiers (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, type TEXT NOT NULL DEFAULT 'isbn', val TEXT NOT NULL);
CREATE TABLE custom_columns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    label TEXT NOT NULL,
    name TEXT NOT NULL,
    datatype TEXT NOT NULL,
    mark_for_delete BOOL DEFAULT 0,
    editable BOOL DEFAULT 1,
    display TEXT DEFAULT '{}',
    is_multiple BOOL DEFAULT 0,
    normalized BOOL
);
"#;

const DATA: &str = r#"
INSERT INTO books (id, title, sort, timestamp, pubdate, series_index, author_sort, isbn, path, flags, uuid, has_cover) VALUES
    (1, 'The Hobbit', 'Hobbit, The', '2020-01-01 10:00:00+00:00', '1937-09-21 00:00:00+00:00', 1.0, 'Tolkien, J.R.R.', '9780261102217', 'J.R.R. Tolkien/The Hobbit (1)', 1, 'uuid-hobbit', 1),
    (2, 'The Fellowship of the Ring', 'Fellowship of the Ring, The', '2021-01-01 10:00:00+00:00', '1954-07-29 00:00:00+00:00', 1.0, 'Tolkien, J.R.R.', '', 'J.R.R. Tolkien/The Fellowship of the Ring (2)', 1, 'uuid-fellowship', 0),
    (3, 'A Wizard of Earthsea', 'Wizard of Earthsea, A', '2022-01-01 10:00:00+00:00', '1968-01-01 00:00:00+00:00', 1.0, 'Le Guin, Ursula K.', '', 'Ursula K. Le Guin/A Wizard of Earthsea (3)', 1, 'uuid-earthsea', 1);

INSERT INTO authors (id, name, sort) VALUES (1, 'J.R.R. Tolkien', 'Tolkien, J.R.R.'), (2, 'Ursula K. Le Guin', 'Le Guin, Ursula K.');
INSERT INTO books_authors_link (book, author) VALUES (1, 1), (2, 1), (3, 2);

INSERT INTO publishers (id, name) VALUES (1, 'Allen & Unwin');
INSERT INTO books_publishers_link (book, publisher) VALUES (1, 1), (2, 1);

INSERT INTO ratings (id, rating) VALUES (1, 10), (2, 8);
INSERT INTO books_ratings_link (book, rating) VALUES (1, 1), (3, 2);

INSERT INTO data (id, book, format, uncompressed_size, name) VALUES
    (1, 1, 'EPUB', 1000, 'The Hobbit'),
    (2, 2, 'EPUB', 2000, 'The Fellowship of the Ring'),
    (3, 2, 'PDF', 5000, 'The Fellowship of the Ring'),
    (4, 3, 'PDF', 300, 'A Wizard of Earthsea');

INSERT INTO tags (id, name) VALUES (1, 'Fantasy'), (2, 'Classic'), (3, 'Young Adult');
INSERT INTO books_tags_link (book, tag) VALUES (1, 1), (1, 2), (2, 1), (3, 1), (3, 3);

INSERT INTO comments (book, text) VALUES (1, 'There and back again.'), (3, 'Ged learns the true names of things.');

INSERT INTO series (id, name) VALUES (1, 'The Lord of the Rings');
INSERT INTO books_series_link (book, series) VALUES (2, 1);

INSERT INTO languages (id, lang_code) VALUES (1, 'eng'), (2, 'deu');
INSERT INTO books_languages_link (book, lang_code) VALUES (1, 1), (2, 1), (3, 2);

INSERT INTO identifiers (book, type, val) VALUES (1, 'isbn', '9780261102217'), (1, 'goodreads', '5907');

INSERT INTO custom_columns (id, label, name, datatype) VALUES (1, 'pages', 'Pages', 'int');
"#;

const HOBBIT_OPF: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata>
    <meta name="calibre:user_metadata:#pages" content="{&quot;table&quot;: &quot;custom_column_1&quot;, &quot;column&quot;: &quot;value&quot;, &quot;#value#&quot;: 310, &quot;datatype&quot;: &quot;int&quot;}"/>
  </metadata>
</package>
"#;

const PREFS: &str = r##"{
    "book_display_fields": [
        ["title", true], ["authors", true], ["series", true], ["tags", false],
        ["formats", true], ["#pages", true], ["path", false], ["rating", true]
    ],
    "virtual_libraries": {"Tolkien": "author:tolkien", "Fantasy": "tag:fantasy"}
}"##;

/// A library directory holding `metadata.db`, a preferences backup, and
/// one book's `metadata.opf`.
pub struct Library {
    dir: TempDir,
}

impl Library {
    pub async fn create() -> Result<Self> {
        let dir = tempfile::tempdir().context("create library dir")?;
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("metadata.db"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("create catalog")?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await.context("schema")?;
        sqlx::raw_sql(DATA).execute(&pool).await.context("data")?;
        pool.close().await;

        let book_dir = dir.path().join(HOBBIT_PATH);
        std::fs::create_dir_all(&book_dir)?;
        std::fs::write(book_dir.join("metadata.opf"), HOBBIT_OPF)?;
        std::fs::write(
            dir.path().join("metadata_db_prefs_backup.json"),
            PREFS,
        )?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runs `sql` against the catalog through a short-lived writable pool.
    pub async fn execute(&self, sql: &str) -> Result<()> {
        let options = SqliteConnectOptions::new()
            .filename(self.dir.path().join("metadata.db"));
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("open catalog for writing")?;
        sqlx::raw_sql(sql).execute(&pool).await.context("fixture update")?;
        pool.close().await;
        Ok(())
    }
}
