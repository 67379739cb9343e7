//! # Domain Types
//!
//! Types shared by the store, the search index and the query engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   NewProduct    │   │    Product      │   │    Page<T>      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku            │──►│  id (store)     │──►│  items          │       │
//! │  │  name, brand .. │   │  sku, name ..   │   │  page, limit    │       │
//! │  │  price_cents    │   │  created_at     │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │    from generator        from store            from engine             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - `id`: assigned by the store, monotonically increasing, never reused
//! - `sku`: business identifier, unique across every generated batch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_limit, validate_page};
use crate::DEFAULT_LIMIT;

// =============================================================================
// Product
// =============================================================================

/// A persisted catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,

    /// Stock Keeping Unit, unique across the catalog.
    pub sku: String,

    pub name: String,

    pub description: String,

    pub category: String,

    pub brand: String,

    /// Price in cents. Carried on the wire as a decimal `price`
    /// (`1999` ⇄ `19.99`).
    #[serde(rename = "price", with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub price_cents: i64,

    /// Units on hand.
    pub stock: i64,

    /// When the product was inserted.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// The five text fields the search index covers, in index column order.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.description,
            &self.category,
            &self.brand,
            &self.sku,
        ]
    }

    /// Case-insensitive substring match against any searchable field.
    ///
    /// This is the reference semantics both search paths must honor.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Product attributes before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub price_cents: i64,
    pub stock: i64,
}

impl NewProduct {
    /// Attaches store-assigned identity.
    pub fn into_product(self, id: i64, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            category: self.category,
            brand: self.brand,
            price_cents: self.price_cents,
            stock: self.stock,
            created_at,
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// A validated page request.
///
/// ## Rules
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
///
/// Construct through [`PageRequest::new`] so both checks always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u32,
}

impl PageRequest {
    /// Validates raw caller input.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::PageRequest;
    ///
    /// let req = PageRequest::new(3, 20).unwrap();
    /// assert_eq!(req.offset(), 40);
    /// assert!(PageRequest::new(0, 20).is_err());
    /// assert!(PageRequest::new(1, 201).is_err());
    /// ```
    pub fn new(page: i64, limit: i64) -> Result<Self, ValidationError> {
        let page = validate_page(page)?;
        let limit = validate_limit(limit)?;
        Ok(PageRequest { page, limit })
    }

    #[inline]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[inline]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip. Saturates at `i64::MAX` for absurd page numbers, which
    /// still lands past the last row.
    #[inline]
    pub const fn offset(&self) -> i64 {
        ((self.page - 1) as i64).saturating_mul(self.limit as i64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the total match count.
///
/// `total` always comes from the same snapshot as `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Page {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
        }
    }
}

// =============================================================================
// Operation Results
// =============================================================================

/// Outcome of a `generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationResult {
    /// Products persisted and indexed.
    pub inserted: u32,
    /// First id assigned to the batch.
    pub first_id: Option<i64>,
    /// Last id assigned to the batch.
    pub last_id: Option<i64>,
}

/// Readiness of the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthReport {
    /// The store answered a query.
    pub ready: bool,
    /// Product count, when the store is reachable.
    pub products: Option<i64>,
    pub migrations_applied: u32,
    pub migrations_total: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================
