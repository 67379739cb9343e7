//! # Error Types
//!
//! Validation errors and the machine-readable error taxonomy.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core (this file)                                              │
//! │  ├── ValidationError  - Bad count/page/limit/term                      │
//! │  └── ErrorKind        - What a caller sees: kind + status              │
//! │                                                                         │
//! │  catalog-db                                                            │
//! │  └── DbError          - Store/index failures, maps onto ErrorKind      │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → ErrorKind → HTTP response           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Always caller-fixable. Retrying the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is below its lower bound (no upper bound applies).
    #[error("{field} must be >= {min}")]
    TooSmall { field: String, min: i64 },
}

// =============================================================================
// Error Kind
// =============================================================================

/// Machine-readable error taxonomy shared by every engine operation.
///
/// ## Serialization
/// ```json
/// { "kind": "INVALID_ARGUMENT", "message": "limit must be between 1 and 200" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad count, page, limit or term (400).
    InvalidArgument,
    /// SKU collision on insert (409). Fatal to the batch.
    Conflict,
    /// Connection or storage failure (503). Retryable.
    StoreUnavailable,
    /// Lookup of a nonexistent id (404).
    NotFound,
}

impl ErrorKind {
    /// HTTP status an outer layer should answer with.
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidArgument => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::StoreUnavailable => 503,
        }
    }

    /// Whether retrying the identical call may succeed.
    pub const fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::StoreUnavailable)
    }
}

impl ValidationError {
    /// Validation failures are always [`ErrorKind::InvalidArgument`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
