//! # Validation Module
//!
//! Input validation utilities for the Medwear storefront.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront views                                             │
//! │  ├── Quantity selector capped at quantity_limit()                      │
//! │  └── Required-field markers on the checkout form                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands / checkout flow (Rust)                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field and selection rules                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart                                                         │
//! │  └── Quantity < 1 silently rejected (never an error)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart itself never calls these helpers. Color and size membership is
//! the caller's responsibility; [`validate_selection`] is offered for it.
//!
//! ## Usage
//! ```rust
//! use medwear_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("nurse@example.com").unwrap();
//! assert!(validate_quantity(11, 10).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::DEFAULT_QUANTITY_LIMIT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a form field is present.
///
/// Whitespace-only input counts as missing.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part and domain
/// - The domain contains a dot that is neither first nor last
/// - No whitespace
///
/// ## Example
/// ```rust
/// use medwear_core::validation::validate_email;
///
/// assert!(validate_email("nurse@example.com").is_ok());
/// assert!(validate_email("nurse@").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain @"))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use medwear_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Premium Lab Coat").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a catalog search string.
///
/// ## Rules
/// - Can be empty (no filtering)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// The largest quantity a shopper may select for a product.
///
/// Products with a stock figure are capped at it; the rest at
/// [`DEFAULT_QUANTITY_LIMIT`]. A stock figure of zero also falls back to
/// the default.
pub fn quantity_limit(product: &Product) -> u32 {
    match product.stock {
        Some(stock) if stock > 0 => stock,
        _ => DEFAULT_QUANTITY_LIMIT,
    }
}

/// Validates a quantity value against a per-product limit.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `limit` (see [`quantity_limit`])
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product page: quantity selector                                        │
/// │                                                                         │
/// │  User picks quantity: 5                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5, quantity_limit(&product)) ← THIS FUNCTION        │
/// │       │                                                                 │
/// │       ├── qty <= 0?     → Error: "quantity must be positive"           │
/// │       │                                                                 │
/// │       ├── qty > limit?  → Error: "quantity must be between 1 and 10"   │
/// │       │                                                                 │
/// │       └── OK → add_to_cart                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64, limit: u32) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > i64::from(limit) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(limit),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Must be non-negative (zero is allowed)
///
/// ## Example
/// ```rust
/// use medwear_core::money::Money;
/// use medwear_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_dollars(39.99)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_dollars(-1.0)).is_err());
/// assert!(validate_price(Money::from_dollars(f64::NAN)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Selection Validators
// =============================================================================

/// Validates that a color and size are among the product's options.
///
/// ## Example
/// ```rust
/// use medwear_core::money::Money;
/// use medwear_core::types::Product;
/// use medwear_core::validation::validate_selection;
///
/// let coat = Product::new("3", "Premium Lab Coat", Money::from_dollars(59.99), "Lab Coats")
///     .with_colors(["White"])
///     .with_sizes(["S", "M", "L", "XL"]);
///
/// assert!(validate_selection(&coat, "White", "M").is_ok());
/// assert!(validate_selection(&coat, "Navy", "M").is_err());
/// ```
pub fn validate_selection(product: &Product, color: &str, size: &str) -> ValidationResult<()> {
    if !product.has_color(color) {
        return Err(ValidationError::NotAllowed {
            field: "selectedColor".to_string(),
            allowed: product.colors.clone(),
        });
    }

    if !product.has_size(size) {
        return Err(ValidationError::NotAllowed {
            field: "selectedSize".to_string(),
            allowed: product.sizes.clone(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scrub_top() -> Product {
        Product::new(
            "1",
            "Classic V-Neck Scrub Top",
            Money::from_dollars(39.99),
            "Scrub Tops",
        )
        .with_colors(["Navy", "Light Blue", "Black"])
        .with_sizes(["XS", "S", "M", "L", "XL", "XXL"])
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("city", "Springfield").is_ok());
        assert!(validate_required("city", "").is_err());
        assert!(validate_required("city", "   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("nurse@example.com").is_ok());
        assert!(validate_email("  nurse@example.com ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("nurse").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("nurse@example").is_err());
        assert!(validate_email("nurse@example.").is_err());
        assert!(validate_email("nurse@@example.com").is_err());
        assert!(validate_email("nurse smith@example.com").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Premium Lab Coat").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  scrub ").unwrap(), "scrub");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_quantity_limit() {
        let mut product = scrub_top();
        assert_eq!(quantity_limit(&product), 10);

        product.stock = Some(3);
        assert_eq!(quantity_limit(&product), 3);

        product.stock = Some(0);
        assert_eq!(quantity_limit(&product), 10);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1, 10).is_ok());
        assert!(validate_quantity(10, 10).is_ok());

        assert!(validate_quantity(0, 10).is_err());
        assert!(validate_quantity(-1, 10).is_err());
        assert!(validate_quantity(11, 10).is_err());
        assert!(validate_quantity(4, 3).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_dollars(0.0)).is_ok());
        assert!(validate_price(Money::from_dollars(10.99)).is_ok());
        assert!(validate_price(Money::from_dollars(-0.01)).is_err());
        assert!(validate_price(Money::from_dollars(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(800).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_selection() {
        let product = scrub_top();
        assert!(validate_selection(&product, "Navy", "M").is_ok());

        let err = validate_selection(&product, "Teal", "M").unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { ref field, .. } if field == "selectedColor"));

        let err = validate_selection(&product, "Navy", "3XL").unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { ref field, .. } if field == "selectedSize"));
    }
}
