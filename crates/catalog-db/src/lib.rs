//! # catalog-db: Storage and Query Engine for the Product Catalog
//!
//! SQLite-backed catalog store, trigram search index and the query engine
//! that answers generate, list and search requests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Product Catalog Data Flow                        │
//! │                                                                         │
//! │  HTTP handler / seed binary                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐   │   │
//! │  │   │ CatalogEngine │   │  Repositories  │   │  Migrations   │   │   │
//! │  │   │  (engine/)    │──►│  product.rs    │   │  (embedded)   │   │   │
//! │  │   │  SearchPlan   │   │  search_index  │   │ 001_products  │   │   │
//! │  │   └───────────────┘   └───────┬────────┘   │ 002_fts       │   │   │
//! │  │                               │            └───────────────┘   │   │
//! │  │   ┌───────────────────────────▼──────────────────────────────┐ │   │
//! │  │   │  Database (pool.rs): SqlitePool + write gate             │ │   │
//! │  │   └──────────────────────────────────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               SQLite file (products + products_fts)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog store and search index
//! - [`engine`] - List/search/generate operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//! let catalog = db.catalog();
//!
//! catalog.generate(100, Some(7)).await?;
//! let page = catalog.search("acme", 1, 20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ConfigError;
pub use engine::{CatalogEngine, SearchOutcome, SearchPath, SearchPlan};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::search_index::{IndexHit, SearchIndex};
