//! # medwear-store: Local Storage for the Medwear Storefront
//!
//! This crate provides the durable key/value storage the storefront keeps
//! its client-side state in. The cart is persisted here as one JSON value
//! under a fixed key.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Medwear Storefront Data Flow                        │
//! │                                                                         │
//! │  CartStore mutation (add_to_cart, clear_cart, ...)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   medwear-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ LocalStorage  │    │   Backends    │    │  Migrations  │   │   │
//! │  │   │   (trait)     │    │               │    │  (embedded)  │   │   │
//! │  │   │               │◄───│ MemoryStorage │    │              │   │   │
//! │  │   │ get_item      │    │ SqliteStorage │    │ 001_local_   │   │   │
//! │  │   │ set_item      │    │               │    │   storage    │   │   │
//! │  │   │ remove_item   │    └───────┬───────┘    └──────────────┘   │   │
//! │  │   └───────────────┘            │                               │   │
//! │  └────────────────────────────────┼───────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/medwear/storefront.db                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use medwear_store::{Database, DbConfig, LocalStorage};
//!
//! # async fn example() -> Result<(), medwear_store::StoreError> {
//! let db = Database::new(DbConfig::new("./storefront.db")).await?;
//! let storage = db.local_storage();
//!
//! storage.set_item("cart", "[]").await?;
//! assert_eq!(storage.get_item("cart").await?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod storage;

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use storage::{LocalStorage, MemoryStorage, SqliteStorage};
