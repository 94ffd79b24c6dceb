//! # Error Types
//!
//! Domain-specific error types for medwear-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medwear-core errors (this file)                                       │
//! │  ├── CoreError        - Promo, checkout and catalog rule violations    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medwear-store errors (separate crate)                                 │
//! │  └── StoreError       - Local storage failures                         │
//! │                                                                         │
//! │  Storefront API errors (in app)                                        │
//! │  └── ApiError         - What the views see (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → View                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Cart mutations never fail. A quantity below one, or removing a line that
//! is not in the cart, is a silent no-op reported through the mutation's
//! return value. Only the flows around the cart (promo, checkout, catalog
//! administration) produce errors.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checkout was entered with nothing in the cart.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart page ──► "Proceed to Checkout" with 0 items
    ///      │
    ///      ▼
    /// EmptyCart
    ///      │
    ///      ▼
    /// View redirects back to /cart
    /// ```
    #[error("Cart is empty")]
    EmptyCart,

    /// A promotion is already applied to this order (single-shot).
    #[error("Promo code {applied} is already applied")]
    PromoAlreadyApplied { applied: String },

    /// The entered promo code is not recognized.
    #[error("Unknown promo code: {0}")]
    UnknownPromoCode(String),

    /// The checkout flow cannot perform `action` from step `from`.
    ///
    /// ## When This Occurs
    /// - Submitting payment while still on the shipping step
    /// - Going back from the confirmation step
    /// - Submitting shipping details twice
    #[error("Cannot {action} during the {from} step")]
    InvalidCheckoutTransition { from: String, action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
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

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
