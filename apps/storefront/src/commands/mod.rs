//! # Commands Module
//!
//! All commands exposed to the storefront views (and the CLI).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Product listing, detail, similar, featured
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Promo codes, order summary, checkout steps
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  View                                                                   │
//! │  ────                                                                   │
//! │  const cart = await addToCart({ productId: "1", quantity: 2,            │
//! │                                 selectedColor: "Navy",                  │
//! │                                 selectedSize: "M" });                   │
//! │         │                                                               │
//! │         │ (JSON request)                                                │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  async fn add_to_cart(                                                  │
//! │      catalog: &dyn ProductCatalog,  ◄── Only the state it needs        │
//! │      cart: &CartStore,                                                  │
//! │      request: AddToCartRequest,     ◄── From the request body          │
//! │  ) -> Result<AddToCartResponse, ApiError>                               │
//! │         │                                                               │
//! │         │ (JSON serialization, camelCase)                               │
//! │         ▼                                                               │
//! │  View receives: AddToCartResponse                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! async fn get_cart(cart: &CartStore)
//!
//! // Needs catalog and cart
//! async fn add_to_cart(catalog: &dyn ProductCatalog, cart: &CartStore, ..)
//!
//! // Checkout needs the session, the cart and the pricing policy
//! async fn submit_payment(checkout: &CheckoutState, cart: &CartStore, policy: &PricingPolicy, ..)
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
