//! # Local Storage
//!
//! The key/value contract the storefront persists client state through,
//! with two backends.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    LocalStorage Implementations                         │
//! │                                                                         │
//! │  Arc<dyn LocalStorage>                                                 │
//! │       │                                                                 │
//! │       ├── MemoryStorage   map behind a tokio Mutex                     │
//! │       │                   (tests, throwaway sessions)                  │
//! │       │                                                                 │
//! │       └── SqliteStorage   local_storage table                          │
//! │                           (survives restarts)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings. Callers own the encoding (the cart uses JSON).

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Durable string key/value storage.
///
/// Object-safe so the storefront can hold an `Arc<dyn LocalStorage>`.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Reads a value. `Ok(None)` when the key is absent.
    async fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes a key. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> StoreResult<()>;
}
