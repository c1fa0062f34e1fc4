//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Catalog, basket, sale and ledger failures      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Terminal errors (in app)                                              │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Caller                 │
//! │        DbError ──────────┘ (as CoreError::Storage)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable: a failed operation leaves the catalog,
//! the basket and the ledger exactly as they were.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product matches the given name or id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product has no line in the current basket.
    #[error("{0} is not in the basket")]
    NotInBasket(String),

    /// Not enough stock to add or to commit.
    ///
    /// ## When This Occurs
    /// ```text
    /// add("Widget", 5) ──► catalog has 3 ──► InsufficientStock { 3, 5 }
    ///
    /// commit() ──► line "Widget" x5 ──► stock fell to 3 since the add
    ///                                   └──► whole commit aborted
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Commit was called with nothing in the basket.
    #[error("Basket is empty")]
    EmptyBasket,

    /// The operation would break a cross-record invariant
    /// (e.g. deleting a product that is still in the basket).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The storage backend failed. Details are logged where they occur.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn not_found(key: impl std::fmt::Display) -> Self {
        CoreError::ProductNotFound(key.to_string())
    }

    /// A merged quantity or running amount left its supported range.
    pub(crate) fn out_of_range(field: &str, min: i64, max: i64) -> Self {
        CoreError::Validation(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Not a usable number (NaN, infinite).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
