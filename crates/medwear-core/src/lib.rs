//! # medwear-core: Pure Business Logic for the Medwear Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart,
//! pricing and checkout rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Medwear Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront Views                             │   │
//! │  │    Product List ──► Cart Page ──► Checkout ──► Confirmation     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              apps/storefront (CartStore, checkout)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ medwear-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  money  │ │  cart   │ │ pricing │ │ checkout │ │catalog │  │   │
//! │  │   │  Money  │ │  Cart   │ │ Policy  │ │   Flow   │ │ Query  │  │   │
//! │  │   │ TaxRate │ │CartLine │ │ Totals  │ │  Steps   │ │  Sort  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 medwear-store (Local Storage)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and identifier types
//! - [`money`] - Money type (display-time rounding)
//! - [`cart`] - Cart lines keyed by product + color + size
//! - [`pricing`] - Discount, shipping and tax derivation
//! - [`checkout`] - Checkout step state machine
//! - [`catalog`] - Catalog query interface and in-memory catalog
//! - [`validation`] - Input validation helpers
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use medwear_core::money::Money;
//! use medwear_core::pricing::PricingPolicy;
//!
//! let policy = PricingPolicy::default();
//! let totals = policy.calculate(Money::from_dollars(100.0), Some("WELCOME10"));
//!
//! assert_eq!(totals.discount.to_string(), "$10.00");
//! assert!(totals.shipping.is_zero());
//! assert_eq!(totals.total.to_string(), "$97.20");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, CartLine, LineKey, NewCartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{OrderTotals, PricingPolicy, PromoSlot, Promotion};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_dollars(75.0);

/// Shipping fee charged below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::from_dollars(4.99);

/// Default sales tax: 8% (800 basis points).
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(800);

/// The storefront's welcome promotion code.
pub const WELCOME_PROMO_CODE: &str = "WELCOME10";

/// Discount granted by [`WELCOME_PROMO_CODE`]: 10% (1000 basis points).
pub const WELCOME_PROMO_BPS: u32 = 1000;

/// Largest quantity a shopper may pick when a product has no stock figure.
pub const DEFAULT_QUANTITY_LIMIT: u32 = 10;
