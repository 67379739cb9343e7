//! # catalog-core: Pure Logic for the Product Catalog
//!
//! Everything the catalog engine needs that does not touch storage:
//! domain types, pagination and count validation, the error taxonomy and
//! the seeded record generator.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Product Catalog Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             HTTP layer (outside this workspace)                 │   │
//! │  │     POST /products/generate   GET /products   GET /search       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               catalog-db (store, index, engine)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ generator │  │   money   │  │ validation│  │   │
//! │  │   │  Product  │  │  StdRng   │  │   Money   │  │ page/limit│  │   │
//! │  │   │   Page    │  │  BatchTag │  │           │  │   count   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, NewProduct, Page, PageRequest)
//! - [`generator`] - Seeded synthetic product generator
//! - [`money`] - Integer-cent price type
//! - [`error`] - Validation errors and the error-kind taxonomy
//! - [`validation`] - Input validation for the engine operations
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::generator::{BatchTag, ProductGenerator};
//!
//! let tag = BatchTag::random();
//! let batch = ProductGenerator::new(Some(7)).generate(3, &tag);
//! assert_eq!(batch.len(), 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod generator;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest batch a single `generate` call may create.
///
/// Bounds the cost of one request; the seeder splits larger runs into
/// batches of this size.
pub const MAX_GENERATE: u32 = 2000;

/// Batch size used when the caller does not give one.
pub const DEFAULT_GENERATE_COUNT: u32 = 100;

/// Largest page size for `list` and `search`.
pub const MAX_LIMIT: u32 = 200;

/// Page size used when the caller does not give one.
pub const DEFAULT_LIMIT: u32 = 50;
