//! # Validation Module
//!
//! Input checks for the engine operations. Every check here maps to
//! [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument).
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: HTTP layer                                                    │
//! │  └── Parses query/body values into integers and strings                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── count in 1..=MAX_GENERATE                                          │
//! │  ├── page >= 1, limit in 1..=MAX_LIMIT                                  │
//! │  └── search term non-empty after trimming                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  ├── UNIQUE (sku)                                                       │
//! │  └── CHECK (price_cents >= 0)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_GENERATE, MAX_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a generation batch size.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_generate_count;
///
/// assert_eq!(validate_generate_count(120).unwrap(), 120);
/// assert!(validate_generate_count(0).is_err());
/// assert!(validate_generate_count(2001).is_err());
/// ```
pub fn validate_generate_count(count: i64) -> ValidationResult<u32> {
    if !(1..=MAX_GENERATE as i64).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 1,
            max: MAX_GENERATE as i64,
        });
    }

    Ok(count as u32)
}

/// Validates a 1-based page number.
///
/// There is no upper bound: a page past the end is valid and comes back
/// empty with the true total.
pub fn validate_page(page: i64) -> ValidationResult<u64> {
    if page < 1 {
        return Err(ValidationError::TooSmall {
            field: "page".to_string(),
            min: 1,
        });
    }

    Ok(page as u64)
}

/// Validates a page size.
pub fn validate_limit(limit: i64) -> ValidationResult<u32> {
    if !(1..=MAX_LIMIT as i64).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_LIMIT as i64,
        });
    }

    Ok(limit as u32)
}

/// Validates a search term.
///
/// ## Returns
/// The trimmed term. Empty or whitespace-only input is rejected.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_search_term;
///
/// assert_eq!(validate_search_term("  Acme ").unwrap(), "Acme");
/// assert!(validate_search_term("   ").is_err());
/// ```
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.is_empty() {
        return Err(ValidationError::Required {
            field: "term".to_string(),
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
