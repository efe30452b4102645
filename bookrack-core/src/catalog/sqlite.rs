//! Read-only SQLite catalog repository.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bookrack_contracts::metadata::MetadataSource;
use bookrack_contracts::visibility::FieldVisibility;
use bookrack_model::{BookID, CustomColumn, Document};
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use tracing::{debug, info};

use super::materialize::{RawDocument, materialize};
use super::{CatalogRepository, DocumentPage};
use crate::error::{CatalogError, Result};
use crate::query::composer::{BASE_QUERY, COUNT_QUERY, CUSTOM_COLUMNS_QUERY};
use crate::query::{QueryOptions, SearchExpression, having, limit, order_by};

/// File name of the Calibre catalog inside a library directory.
pub const CATALOG_FILE: &str = "metadata.db";

/// Opens a read-only pool on `<library>/metadata.db`.
pub async fn connect_read_only(
    library: &Path,
    max_connections: u32,
) -> Result<SqlitePool> {
    let path = library.join(CATALOG_FILE);
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .read_only(true)
        .create_if_missing(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    info!(
        "Catalog pool opened on {} with max_connections={}",
        path.display(),
        max_connections.max(1)
    );
    Ok(pool)
}

/// Catalog repository backed by a Calibre `metadata.db`.
#[derive(Clone)]
pub struct SqliteCatalogRepository {
    pool: SqlitePool,
    visibility: Arc<dyn FieldVisibility>,
    metadata: Arc<dyn MetadataSource>,
    trace_sql: bool,
}

impl fmt::Debug for SqliteCatalogRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCatalogRepository")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("trace_sql", &self.trace_sql)
            .finish()
    }
}

impl SqliteCatalogRepository {
    /// Tracing is off until [`Self::with_sql_tracing`] turns it on.
    pub fn new(
        pool: SqlitePool,
        visibility: Arc<dyn FieldVisibility>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            pool,
            visibility,
            metadata,
            trace_sql: false,
        }
    }

    /// Logs every composed statement at debug level.
    pub fn with_sql_tracing(mut self, enabled: bool) -> Self {
        self.trace_sql = enabled;
        self
    }

    /// The underlying read-only pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn trace(&self, sql: &str) {
        if self.trace_sql {
            debug!(sql = %sql, "catalog query");
        }
    }

    async fn count(&self, filter: &str) -> Result<u32> {
        let sql = format!("{COUNT_QUERY}{filter}");
        self.trace(&sql);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        debug!("catalog filter matched {} documents", count);
        Ok(u32::try_from(count.max(0)).unwrap_or(u32::MAX))
    }

    /// Runs a full projection and materializes every row in store order.
    async fn fetch_documents(&self, sql: &str) -> Result<Vec<Document>> {
        self.trace(sql);
        // Rows are decoded before any metadata file is read so the
        // connection goes back to the pool first.
        let raws: Vec<RawDocument> = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(RawDocument::from_row)
            .collect();
        let mut documents = Vec::with_capacity(raws.len());
        for raw in raws {
            documents.push(
                materialize(raw, self.visibility.as_ref(), self.metadata.as_ref())
                    .await,
            );
        }
        Ok(documents)
    }

    async fn page(
        &self,
        filter: &str,
        options: &QueryOptions,
    ) -> Result<DocumentPage> {
        let count = self.count(filter).await?;
        if count == 0 {
            return Ok(DocumentPage::default());
        }
        let sql = format!(
            "{BASE_QUERY}{filter}{}{}",
            order_by(options.sort_by, options.descending),
            limit(options.limit_start, options.limit_length)
        );
        let documents = self.fetch_documents(&sql).await?;
        Ok(DocumentPage { count, documents })
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn query_by(&self, options: &QueryOptions) -> Result<DocumentPage> {
        let filter = having(options.entity, options.id);
        self.page(&filter, options).await
    }

    async fn query_search(&self, options: &QueryOptions) -> Result<DocumentPage> {
        let filter = SearchExpression::parse(&options.matching).clause();
        let page = self.page(&filter, options).await?;
        if page.count == 0 {
            return Err(CatalogError::NoDocumentsFound);
        }
        Ok(page)
    }

    async fn query_document(&self, id: BookID) -> Result<Option<Document>> {
        let sql = format!("{BASE_QUERY}WHERE b.id = {} LIMIT 1", id.as_i64());
        let documents = self.fetch_documents(&sql).await?;
        Ok(documents.into_iter().next())
    }

    async fn query_custom_columns(&self) -> Result<Vec<CustomColumn>> {
        self.trace(CUSTOM_COLUMNS_QUERY);
        let mut rows = sqlx::query(CUSTOM_COLUMNS_QUERY).fetch(&self.pool);
        let mut columns = Vec::new();
        while let Some(row) = rows.try_next().await? {
            match decode_custom_column(&row) {
                Ok(column) => columns.push(column),
                Err(e) => debug!("skipping undecodable custom column: {}", e),
            }
        }
        Ok(columns)
    }
}

fn decode_custom_column(
    row: &SqliteRow,
) -> std::result::Result<CustomColumn, sqlx::Error> {
    Ok(CustomColumn {
        id: row.try_get(0)?,
        label: row.try_get(1)?,
        name: row.try_get(2)?,
        datatype: row.try_get(3)?,
    })
}
