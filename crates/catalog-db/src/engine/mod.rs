//! # Catalog Engine
//!
//! The operations callers use: generate, list, search, get, health.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list(page, limit)                 search(term, page, limit)            │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  PageRequest::new ──► InvalidArgument    validate_search_term           │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  BEGIN (read snapshot)              BEGIN (read snapshot)               │
//! │    ├── count_in                       └── SearchPlan::execute           │
//! │    └── scan_in                              ├── IndexedSearch           │
//! │       │                                     └── SubstringScan           │
//! │       ▼                                  │                              │
//! │  COMMIT ──► Page { items, total }   COMMIT ──► Page { items, total }    │
//! │                                                                         │
//! │  generate(count, seed) ──► ProductGenerator ──► insert_batch (1 txn)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod strategy;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::pool::Database;
use crate::repository::product::ProductRepository;
use catalog_core::generator::{BatchTag, ProductGenerator};
use catalog_core::validation::{validate_generate_count, validate_search_term};
use catalog_core::{GenerationResult, HealthReport, Page, PageRequest, Product};

pub use strategy::{
    IndexedSearch, SearchHits, SearchPath, SearchPlan, SearchStrategy, SubstringScan,
};

/// A search page plus the strategy that served it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub page: Page<Product>,
    pub path: Option<SearchPath>,
}

/// Query engine over one [`Database`].
///
/// Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct CatalogEngine {
    db: Database,
    plan: Arc<SearchPlan>,
}

impl CatalogEngine {
    pub fn new(db: Database) -> Self {
        CatalogEngine::with_plan(db, SearchPlan::standard())
    }

    pub fn with_plan(db: Database, plan: SearchPlan) -> Self {
        CatalogEngine {
            db,
            plan: Arc::new(plan),
        }
    }

    /// Generates `count` products and persists them as one batch.
    ///
    /// Any integer is a valid seed; negative seeds reuse their bit pattern.
    ///
    /// ## Errors
    /// * `InvalidArgument` - count outside `1..=MAX_GENERATE`
    /// * `Conflict` - a SKU collided; nothing was written
    pub async fn generate(&self, count: i64, seed: Option<i64>) -> DbResult<GenerationResult> {
        let count = validate_generate_count(count)?;

        let tag = BatchTag::random();
        let batch = ProductGenerator::new(seed.map(|seed| seed as u64)).generate(count, &tag);

        let inserted = self.db.products().insert_batch(&batch).await?;

        info!(
            count,
            seeded = seed.is_some(),
            batch = tag.as_str(),
            "Generated products"
        );

        Ok(GenerationResult {
            inserted: inserted.len() as u32,
            first_id: inserted.first().map(|p| p.id),
            last_id: inserted.last().map(|p| p.id),
        })
    }

    /// One page of products in id order.
    pub async fn list(&self, page: i64, limit: i64) -> DbResult<Page<Product>> {
        let request = PageRequest::new(page, limit)?;
        self.list_page(request).await
    }

    /// [`list`](Self::list) with an already validated request.
    pub async fn list_page(&self, request: PageRequest) -> DbResult<Page<Product>> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::transaction)?;

        let total = ProductRepository::count_in(&mut tx).await?;
        let items = if request.offset() < total {
            ProductRepository::scan_in(&mut tx, request.offset(), request.limit()).await?
        } else {
            Vec::new()
        };

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(
            page = request.page(),
            limit = request.limit(),
            total,
            returned = items.len(),
            "Listed products"
        );

        Ok(Page::new(items, request, total))
    }

    /// Products matching `term` as a case-insensitive substring of any
    /// searchable field.
    pub async fn search(&self, term: &str, page: i64, limit: i64) -> DbResult<Page<Product>> {
        Ok(self.search_detailed(term, page, limit).await?.page)
    }

    /// Like [`search`](Self::search), also reporting which strategy answered.
    pub async fn search_detailed(
        &self,
        term: &str,
        page: i64,
        limit: i64,
    ) -> DbResult<SearchOutcome> {
        let term = validate_search_term(term)?;
        let request = PageRequest::new(page, limit)?;

        let mut tx = self.db.pool().begin().await.map_err(DbError::transaction)?;
        let planned = self.plan.execute(&mut tx, &term, request).await?;
        tx.commit().await.map_err(DbError::transaction)?;

        Ok(SearchOutcome {
            page: Page::new(planned.hits.items, request, planned.hits.total),
            path: planned.path,
        })
    }

    pub async fn get(&self, id: i64) -> DbResult<Product> {
        self.db.products().get(id).await
    }

    /// Readiness probe. Never fails; an unreachable store reports `ready: false`.
    pub async fn health(&self) -> HealthReport {
        let ready = self.db.health_check().await;

        let products = if ready {
            self.db.products().count().await.ok()
        } else {
            None
        };

        let (migrations_total, migrations_applied) = migrations::migration_status(self.db.pool())
            .await
            .unwrap_or_default();

        HealthReport {
            ready,
            products,
            migrations_applied,
            migrations_total,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use catalog_core::{ErrorKind, MAX_GENERATE, MAX_LIMIT};
    use std::collections::HashSet;

    async fn engine() -> CatalogEngine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
    }

    #[tokio::test]
    async fn test_generate_then_list_first_page() {
        let engine = engine().await;

        let result = engine.generate(50, Some(7)).await.unwrap();
        assert_eq!(result.inserted, 50);
        let first_id = result.first_id.unwrap();
        assert_eq!(result.last_id, Some(first_id + 49));

        let page = engine.list(1, 10).await.unwrap();
        assert_eq!(page.total, 50);
        assert_eq!(page.items.len(), 10);
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, (first_id..first_id + 10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_search_acme_matches_reference_semantics() {
        let engine = engine().await;
        engine.generate(50, Some(7)).await.unwrap();

        let all = engine.list(1, 50).await.unwrap().items;
        let expected: Vec<i64> = all
            .iter()
            .filter(|p| p.matches_term("acme"))
            .map(|p| p.id)
            .collect();

        let outcome = engine.search_detailed("Acme", 1, 50).await.unwrap();
        assert_eq!(outcome.path, Some(SearchPath::Index));
        assert_eq!(outcome.page.total, expected.len() as i64);
        assert!(outcome.page.items.iter().all(|p| p.matches_term("acme")));

        let mut found: Vec<i64> = outcome.page.items.iter().map(|p| p.id).collect();
        found.sort_unstable();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_generate_increases_total_with_unique_skus() {
        let engine = engine().await;
        engine.generate(20, None).await.unwrap();
        engine.generate(30, None).await.unwrap();

        let page = engine.list(1, MAX_LIMIT as i64).await.unwrap();
        assert_eq!(page.total, 50);

        let skus: HashSet<&str> = page.items.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus.len(), 50);
    }

    #[tokio::test]
    async fn test_page_beyond_last_is_empty_with_total() {
        let engine = engine().await;
        engine.generate(60, Some(1)).await.unwrap();

        let page = engine.list(7, 10).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 60);

        let page = engine.list(6, 10).await.unwrap();
        assert_eq!(page.items.len(), 10);

        // Index path.
        let first = engine.search_detailed("acme", 1, 10).await.unwrap();
        assert!(first.page.total > 0);
        let beyond = engine.search_detailed("acme", 100, 10).await.unwrap();
        assert!(beyond.page.items.is_empty());
        assert_eq!(beyond.page.total, first.page.total);
        assert_eq!(beyond.path, Some(SearchPath::Index));

        // Scan path: two characters is below a trigram.
        let first = engine.search_detailed("cm", 1, 10).await.unwrap();
        assert!(first.page.total > 0);
        let beyond = engine.search_detailed("cm", 100, 10).await.unwrap();
        assert!(beyond.page.items.is_empty());
        assert_eq!(beyond.page.total, first.page.total);
        assert_eq!(beyond.path, Some(SearchPath::Scan));
    }

    #[tokio::test]
    async fn test_huge_page_numbers_are_valid() {
        let engine = engine().await;
        engine.generate(5, Some(1)).await.unwrap();

        let page = engine.list(5_000_000_000, 10).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 5_000_000_000);

        let expected = engine.search("acme", 1, 10).await.unwrap().total;
        let page = engine.search("acme", 5_000_000_000, 10).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, expected);

        let page = engine.list(i64::MAX, MAX_LIMIT as i64).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let engine = engine().await;
        engine.generate(40, Some(3)).await.unwrap();

        let ids = |page: &Page<Product>| page.items.iter().map(|p| p.id).collect::<Vec<_>>();

        let a = engine.list(2, 15).await.unwrap();
        let b = engine.list(2, 15).await.unwrap();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.total, b.total);

        let a = engine.search("Globex", 1, 20).await.unwrap();
        let b = engine.search("Globex", 1, 20).await.unwrap();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.total, b.total);
    }

    #[tokio::test]
    async fn test_same_seed_same_attributes() {
        let a = engine().await;
        let b = engine().await;
        a.generate(25, Some(99)).await.unwrap();
        b.generate(25, Some(99)).await.unwrap();

        let left = a.list(1, 25).await.unwrap().items;
        let right = b.list(1, 25).await.unwrap().items;

        for (l, r) in left.iter().zip(&right) {
            assert_eq!(l.name, r.name);
            assert_eq!(l.description, r.description);
            assert_eq!(l.category, r.category);
            assert_eq!(l.brand, r.brand);
            assert_eq!(l.price_cents, r.price_cents);
            assert_eq!(l.stock, r.stock);
        }
    }

    #[tokio::test]
    async fn test_negative_seed_is_reproducible() {
        let a = engine().await;
        let b = engine().await;
        let c = engine().await;
        a.generate(25, Some(-42)).await.unwrap();
        b.generate(25, Some(-42)).await.unwrap();
        c.generate(25, Some(42)).await.unwrap();

        let names = |items: Vec<Product>| items.into_iter().map(|p| p.name).collect::<Vec<_>>();
        let left = names(a.list(1, 25).await.unwrap().items);
        let right = names(b.list(1, 25).await.unwrap().items);
        let positive = names(c.list(1, 25).await.unwrap().items);

        assert_eq!(left, right);
        assert_ne!(left, positive);
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let engine = engine().await;

        for count in [0, -1, MAX_GENERATE as i64 + 1] {
            let err = engine.generate(count, None).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        for (page, limit) in [(0, 10), (1, 0), (1, MAX_LIMIT as i64 + 1)] {
            let err = engine.list(page, limit).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        let err = engine.search("  ", 1, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert_eq!(engine.list(1, 1).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_short_term_falls_back_to_scan() {
        let engine = engine().await;
        engine.generate(60, Some(5)).await.unwrap();

        let all = engine.list(1, 60).await.unwrap().items;
        let expected = all.iter().filter(|p| p.matches_term("cm")).count() as i64;
        assert!(expected > 0);

        let outcome = engine.search_detailed("cm", 1, 60).await.unwrap();
        assert_eq!(outcome.path, Some(SearchPath::Scan));
        assert_eq!(outcome.page.total, expected);
        assert!(outcome.page.items.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_no_match_is_empty_and_served_by_last_strategy() {
        let engine = engine().await;
        engine.generate(10, Some(2)).await.unwrap();

        let outcome = engine.search_detailed("zzqx", 1, 10).await.unwrap();
        assert_eq!(outcome.page.total, 0);
        assert!(outcome.page.items.is_empty());
        assert_eq!(outcome.path, Some(SearchPath::Scan));
    }

    #[tokio::test]
    async fn test_wildcards_are_literal_in_scan() {
        let engine = engine().await;
        engine.generate(10, Some(2)).await.unwrap();

        let page = engine.search("%", 1, 10).await.unwrap();
        assert_eq!(page.total, 0);

        let page = engine.search("_", 1, 10).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_plans_are_swappable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog().generate(30, Some(8)).await.unwrap();

        let scan = CatalogEngine::with_plan(db.clone(), SearchPlan::scan_only());
        let index = CatalogEngine::with_plan(db.clone(), SearchPlan::index_only());

        let by_scan = scan.search_detailed("Initech", 1, 30).await.unwrap();
        let by_index = index.search_detailed("Initech", 1, 30).await.unwrap();

        assert_eq!(by_scan.path, Some(SearchPath::Scan));
        assert_eq!(by_index.path, Some(SearchPath::Index));
        assert_eq!(by_scan.page.total, by_index.page.total);

        // Index alone cannot answer terms shorter than a trigram.
        let short = index.search("In", 1, 30).await.unwrap();
        assert_eq!(short.total, 0);
        assert!(scan.search("In", 1, 30).await.unwrap().total > 0);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let engine = engine().await;
        let result = engine.generate(3, Some(4)).await.unwrap();

        let product = engine.get(result.first_id.unwrap()).await.unwrap();
        assert!(product.sku.starts_with("SKU-"));

        let err = engine.get(-1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let engine = engine().await;
        engine.generate(7, None).await.unwrap();

        let health = engine.health().await;
        assert!(health.ready);
        assert_eq!(health.products, Some(7));
        assert_eq!(health.migrations_total, 2);
        assert_eq!(health.migrations_applied, 2);

        engine.database().close().await;
        let health = engine.health().await;
        assert!(!health.ready);
        assert_eq!(health.products, None);
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let engine = engine().await;
        engine.database().close().await;

        let err = engine.list(1, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(err.kind().is_retryable());
    }
}
