//! # State Module
//!
//! Storefront session state, one focused type per concern.
//!
//! Commands take exactly the state they need (`&CartStore`,
//! `&CheckoutState`, `&StorefrontConfig`), which keeps their signatures
//! honest and lets tests build only what a command touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Storefront (lib.rs)                        │   │
//! │  │  config   = StorefrontConfig::load(..)                          │   │
//! │  │  cart     = CartStore::hydrate(storage, config.cart_key)        │   │
//! │  │  checkout = CheckoutState::new()                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartStore   │  │CheckoutState │  │ StorefrontConfig │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Mutex<Cart> │  │  flow step   │  │  pricing         │              │
//! │  │  + storage   │  │  promo slot  │  │  storage, delay  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartStore: mutations serialized by a tokio Mutex                    │
//! │  • CheckoutState: flow and promo each behind a tokio Mutex             │
//! │  • StorefrontConfig: read-only after initialization                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod checkout;
mod config;

pub use cart::CartStore;
pub use checkout::{CheckoutState, OrderConfirmation};
pub use config::{CheckoutSettings, PricingSettings, StorageSettings, StorefrontConfig};
