//! # Search Strategies
//!
//! The two ways a term can be answered, and the plan that picks between them.
//!
//! ```text
//! SearchPlan::standard()
//!   ├── IndexedSearch  ── total > 0 ──► served
//!   │        │ total == 0
//!   │        ▼
//!   └── SubstringScan  ── always served (last strategy is authoritative)
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::search_index::SearchIndex;
use crate::repository::PRODUCT_COLUMNS;
use catalog_core::{PageRequest, Product};

/// Which strategy served a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
    Index,
    Scan,
}

/// One page of matches plus the total from the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    pub items: Vec<Product>,
    pub total: i64,
}

/// A way of answering a search term.
///
/// Implementations run on the caller's connection, which is already inside a
/// read transaction, and must read `total` and `items` there.
#[async_trait]
pub trait SearchStrategy: Send + Sync + std::fmt::Debug {
    fn path(&self) -> SearchPath;

    /// `term` is already trimmed and non-empty.
    async fn search(
        &self,
        conn: &mut SqliteConnection,
        term: &str,
        request: PageRequest,
    ) -> DbResult<SearchHits>;
}

// =============================================================================
// Index
// =============================================================================

/// Ranked lookup through the trigram index.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedSearch;

#[async_trait]
impl SearchStrategy for IndexedSearch {
    fn path(&self) -> SearchPath {
        SearchPath::Index
    }

    async fn search(
        &self,
        conn: &mut SqliteConnection,
        term: &str,
        request: PageRequest,
    ) -> DbResult<SearchHits> {
        let total = SearchIndex::count_in(conn, term).await?;
        if request.offset() >= total {
            return Ok(SearchHits {
                items: Vec::new(),
                total,
            });
        }

        let items = SearchIndex::query_page_in(conn, term, request).await?;
        Ok(SearchHits { items, total })
    }
}

// =============================================================================
// Scan
// =============================================================================

const SCAN_FILTER: &str = r#"
    name LIKE ?1 ESCAPE '\'
    OR description LIKE ?1 ESCAPE '\'
    OR category LIKE ?1 ESCAPE '\'
    OR brand LIKE ?1 ESCAPE '\'
    OR sku LIKE ?1 ESCAPE '\'
"#;

/// Case-insensitive `LIKE` scan over every searchable column, ids ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringScan;

#[async_trait]
impl SearchStrategy for SubstringScan {
    fn path(&self) -> SearchPath {
        SearchPath::Scan
    }

    async fn search(
        &self,
        conn: &mut SqliteConnection,
        term: &str,
        request: PageRequest,
    ) -> DbResult<SearchHits> {
        let pattern = like_pattern(term);

        let count_sql = format!("SELECT COUNT(*) FROM products WHERE {SCAN_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(&mut *conn)
            .await?;

        if request.offset() >= total {
            return Ok(SearchHits {
                items: Vec::new(),
                total,
            });
        }

        let page_sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {SCAN_FILTER} \
             ORDER BY id ASC LIMIT ?2 OFFSET ?3"
        );
        let items = sqlx::query_as::<_, Product>(&page_sql)
            .bind(&pattern)
            .bind(request.limit() as i64)
            .bind(request.offset())
            .fetch_all(&mut *conn)
            .await?;

        Ok(SearchHits { items, total })
    }
}

/// `%term%` with the LIKE wildcards and the escape character escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Plan
// =============================================================================

/// Hits plus the strategy that produced them.
#[derive(Debug, Clone)]
pub struct PlannedHits {
    pub hits: SearchHits,
    /// `None` only for an empty plan.
    pub path: Option<SearchPath>,
}

/// Ordered list of strategies; the first non-empty answer wins.
#[derive(Debug)]
pub struct SearchPlan {
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl SearchPlan {
    pub fn new(strategies: Vec<Box<dyn SearchStrategy>>) -> Self {
        SearchPlan { strategies }
    }

    /// Index first, then substring scan.
    pub fn standard() -> Self {
        SearchPlan::new(vec![Box::new(IndexedSearch), Box::new(SubstringScan)])
    }

    pub fn index_only() -> Self {
        SearchPlan::new(vec![Box::new(IndexedSearch)])
    }

    pub fn scan_only() -> Self {
        SearchPlan::new(vec![Box::new(SubstringScan)])
    }

    pub fn paths(&self) -> Vec<SearchPath> {
        self.strategies.iter().map(|s| s.path()).collect()
    }

    pub(crate) async fn execute(
        &self,
        conn: &mut SqliteConnection,
        term: &str,
        request: PageRequest,
    ) -> DbResult<PlannedHits> {
        let last = self.strategies.len().saturating_sub(1);

        for (position, strategy) in self.strategies.iter().enumerate() {
            let hits = strategy.search(conn, term, request).await?;

            if hits.total > 0 || position == last {
                debug!(
                    term,
                    path = ?strategy.path(),
                    total = hits.total,
                    "Search served"
                );
                return Ok(PlannedHits {
                    hits,
                    path: Some(strategy.path()),
                });
            }

            debug!(term, path = ?strategy.path(), "No matches, trying next strategy");
        }

        Ok(PlannedHits {
            hits: SearchHits::default(),
            path: None,
        })
    }
}

impl Default for SearchPlan {
    fn default() -> Self {
        SearchPlan::standard()
    }
}
