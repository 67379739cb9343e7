//! # Repository Module
//!
//! The two storage components the query engine reads from.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CatalogEngine                                                          │
//! │       │                                                                 │
//! │       │  generate ─────────────┐        list / search                   │
//! │       ▼                        ▼              │                         │
//! │  ProductRepository ──── one write txn ────────┤                         │
//! │  ├── insert_batch  ──┐                        │  one read txn           │
//! │  ├── get / count     │                        ▼                         │
//! │  └── scan            │   SearchIndex                                    │
//! │                      └─► ├── add_in  (same txn as the insert)          │
//! │                          ├── query / count_in / query_page_in          │
//! │                          └── rebuild / ensure_consistent               │
//! │                                                                         │
//! │  products (table) ◄──── rowid = id ────► products_fts (FTS5 trigram)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods ending in `_in` run on a caller-supplied connection so the
//! engine can compose them inside one transaction.

pub mod product;
pub mod search_index;

/// Column list shared by every query that materializes a `Product`.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, sku, name, description, category, brand, price_cents, stock, created_at";

/// Same columns, qualified with the `p` alias for joins.
pub(crate) const PRODUCT_COLUMNS_P: &str = "p.id, p.sku, p.name, p.description, p.category, \
     p.brand, p.price_cents, p.stock, p.created_at";
