//! # Search Index
//!
//! FTS5 index over the five searchable product columns, kept in step with
//! the catalog store.
//!
//! ## How Trigram Search Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  User types: "lobe"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MATCH '"lobe"'   →  trigrams  "lob" "obe"  (adjacent, same column)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────┐                │
//! │  │ products_fts (rowid = products.id)                  │                │
//! │  │                                                     │                │
//! │  │ 1 | Acme Smart Lamp   | ... | Home  | Globex | SKU.. │ ← MATCH        │
//! │  │ 2 | Globex Eco Mixer  | ... | Books | Acme   | SKU.. │ ← MATCH        │
//! │  │ 3 | Initech Ultra Fan | ... | Toys  | Acme   | SKU.. │                │
//! │  └─────────────────────────────────────────────────────┘                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ranked by bm25, ties by id: [1, 2]                                     │
//! │                                                                         │
//! │  Case-insensitive substring match within one column. Terms shorter      │
//! │  than three characters have no trigrams and return nothing here; the    │
//! │  engine then falls back to a LIKE scan.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//! - `add_in` runs inside the store's insert transaction.
//! - `rebuild` replaces every row inside one write transaction; readers keep
//!   their WAL snapshot and see the old or the new index, never a mix.
//! - `ensure_consistent` runs on open and rebuilds a missing or stale index.

use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::PRODUCT_COLUMNS_P;
use catalog_core::validation::validate_search_term;
use catalog_core::{PageRequest, Product};

/// Recreates the index table if it was lost. Mirrors migration 002.
const CREATE_INDEX_TABLE: &str = r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS products_fts USING fts5(
        name, description, category, brand, sku,
        tokenize = 'trigram'
    )
"#;

/// Trigrams need at least this many characters.
const MIN_INDEXED_TERM_CHARS: usize = 3;

/// A single index match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub id: i64,
    /// Higher is more relevant (negated bm25).
    pub relevance: f64,
}

/// Handle to the `products_fts` index.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

impl SearchIndex {
    pub fn new(pool: SqlitePool, write_gate: Arc<Mutex<()>>) -> Self {
        SearchIndex { pool, write_gate }
    }

    /// Adds index rows for freshly inserted products on `conn`.
    pub(crate) async fn add_in(conn: &mut SqliteConnection, products: &[Product]) -> DbResult<()> {
        for product in products {
            sqlx::query(
                r#"
                INSERT INTO products_fts (rowid, name, description, category, brand, sku)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(&product.brand)
            .bind(&product.sku)
            .execute(&mut *conn)
            .await?;
        }

        debug!(count = products.len(), "Indexed products");
        Ok(())
    }

    /// Every index match for `term`, most relevant first, ties by id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - term is empty or whitespace
    pub async fn query(&self, term: &str) -> DbResult<Vec<IndexHit>> {
        let term = validate_search_term(term)?;
        let Some(expr) = match_expression(&term) else {
            return Ok(Vec::new());
        };

        let rows: Vec<(i64, f64)> = sqlx::query_as(
            r#"
            SELECT rowid, -bm25(products_fts)
            FROM products_fts
            WHERE products_fts MATCH ?1
            ORDER BY bm25(products_fts), rowid
            "#,
        )
        .bind(expr)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, relevance)| IndexHit { id, relevance })
            .collect())
    }

    /// Number of index matches for an already validated term.
    pub(crate) async fn count_in(conn: &mut SqliteConnection, term: &str) -> DbResult<i64> {
        let Some(expr) = match_expression(term) else {
            return Ok(0);
        };

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products_fts WHERE products_fts MATCH ?1")
                .bind(expr)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count)
    }

    /// One page of matching products, ranked, for an already validated term.
    pub(crate) async fn query_page_in(
        conn: &mut SqliteConnection,
        term: &str,
        request: PageRequest,
    ) -> DbResult<Vec<Product>> {
        let Some(expr) = match_expression(term) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS_P}
            FROM products_fts
            INNER JOIN products p ON p.id = products_fts.rowid
            WHERE products_fts MATCH ?1
            ORDER BY products_fts.rank, p.id
            LIMIT ?2 OFFSET ?3
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(expr)
            .bind(request.limit() as i64)
            .bind(request.offset())
            .fetch_all(&mut *conn)
            .await?;

        Ok(products)
    }

    /// Number of rows in the index.
    pub async fn len(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products_fts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Rebuilds the whole index from the catalog store.
    ///
    /// ## Returns
    /// Number of products indexed.
    pub async fn rebuild(&self) -> DbResult<u64> {
        let _guard = self.write_gate.lock().await;

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        sqlx::query(CREATE_INDEX_TABLE).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM products_fts").execute(&mut *tx).await?;
        let indexed = sqlx::query(
            r#"
            INSERT INTO products_fts (rowid, name, description, category, brand, sku)
            SELECT id, name, description, category, brand, sku
            FROM products
            ORDER BY id
            "#,
        )
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await.map_err(DbError::transaction)?;

        info!(indexed, "Search index rebuilt");
        Ok(indexed)
    }

    /// Compares the index with the store and rebuilds it when they differ.
    ///
    /// ## Returns
    /// `true` when a rebuild ran.
    pub async fn ensure_consistent(&self) -> DbResult<bool> {
        sqlx::query(CREATE_INDEX_TABLE).execute(&self.pool).await?;

        let (products, indexed, max_id, max_rowid): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products),
                (SELECT COUNT(*) FROM products_fts),
                (SELECT COALESCE(MAX(id), 0) FROM products),
                (SELECT COALESCE(MAX(rowid), 0) FROM products_fts)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        if products == indexed && max_id == max_rowid {
            debug!(products, "Search index consistent");
            return Ok(false);
        }

        warn!(
            products,
            indexed, max_id, max_rowid, "Search index out of step with store, rebuilding"
        );
        self.rebuild().await?;
        Ok(true)
    }
}

/// FTS5 expression for `term`: one quoted phrase, so the trigram tokenizer
/// treats it as a plain substring. `None` when the term is too short.
fn match_expression(term: &str) -> Option<String> {
    if term.chars().count() < MIN_INDEXED_TERM_CHARS {
        return None;
    }
    Some(format!("\"{}\"", term.replace('"', "\"\"")))
}

// =============================================================================
// Unit Tests
// =============================================================================
