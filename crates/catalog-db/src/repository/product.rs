//! # Product Repository
//!
//! The catalog store: system of record for product identity and attributes.
//!
//! ## Batch Insert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    insert_batch(products)                               │
//! │                                                                         │
//! │  duplicate SKU inside the batch? ──yes──► Err(UniqueViolation)          │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  acquire write gate ─► BEGIN                                            │
//! │       │                                                                 │
//! │       ├── INSERT ... RETURNING id   (×N, ids assigned in order)         │
//! │       │        └── UNIQUE(sku) hit? ──► rollback, Err(UniqueViolation)  │
//! │       │                                                                 │
//! │       ├── SearchIndex::add_in(inserted)                                 │
//! │       ▼                                                                 │
//! │  COMMIT ─► release gate                                                 │
//! │                                                                         │
//! │  All N rows + N index entries become visible together, or nothing.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::search_index::SearchIndex;
use crate::repository::PRODUCT_COLUMNS;
use catalog_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let inserted = repo.insert_batch(&batch).await?;
/// let first = repo.get(inserted[0].id).await?;
/// let page = repo.scan(0, 50).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool, write_gate: Arc<Mutex<()>>) -> Self {
        ProductRepository { pool, write_gate }
    }

    /// Inserts a batch of products and indexes them, atomically.
    ///
    /// ## Returns
    /// * `Ok(Vec<Product>)` - Inserted products, ids ascending
    /// * `Err(DbError::UniqueViolation)` - A SKU collided; nothing was written
    pub async fn insert_batch(&self, products: &[NewProduct]) -> DbResult<Vec<Product>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        ensure_unique_skus(products)?;

        let _guard = self.write_gate.lock().await;

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let inserted = Self::insert_batch_in(&mut tx, products).await?;
        SearchIndex::add_in(&mut tx, &inserted).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            count = inserted.len(),
            first_id = inserted.first().map(|p| p.id),
            last_id = inserted.last().map(|p| p.id),
            "Product batch committed"
        );

        Ok(inserted)
    }

    /// Inserts rows on `conn` without committing.
    async fn insert_batch_in(
        conn: &mut SqliteConnection,
        products: &[NewProduct],
    ) -> DbResult<Vec<Product>> {
        let created_at = Utc::now();
        let mut inserted = Vec::with_capacity(products.len());

        for product in products {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO products (
                    sku, name, description, category, brand,
                    price_cents, stock, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                RETURNING id
                "#,
            )
            .bind(&product.sku)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(&product.brand)
            .bind(product.price_cents)
            .bind(product.stock)
            .bind(created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| match DbError::from(err) {
                DbError::UniqueViolation { .. } => DbError::duplicate("sku", &product.sku),
                other => other,
            })?;

            inserted.push(product.clone().into_product(id, created_at));
        }

        debug!(count = inserted.len(), "Inserted product rows");
        Ok(inserted)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(DbError::NotFound)` - No product with that id
    pub async fn get(&self, id: i64) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::count_in(&mut conn).await
    }

    /// Returns up to `limit` products after skipping `offset`, ids ascending.
    pub async fn scan(&self, offset: i64, limit: u32) -> DbResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::scan_in(&mut conn, offset, limit).await
    }

    pub(crate) async fn count_in(conn: &mut SqliteConnection) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    pub(crate) async fn scan_in(
        conn: &mut SqliteConnection,
        offset: i64,
        limit: u32,
    ) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;

        Ok(products)
    }
}

/// Rejects a batch that repeats a SKU before any row is written.
fn ensure_unique_skus(products: &[NewProduct]) -> DbResult<()> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.sku.as_str()) {
            return Err(DbError::duplicate("sku", &product.sku));
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
