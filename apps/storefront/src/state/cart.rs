//! # Cart Store
//!
//! The single source of truth for the shopper's cart, kept in step with
//! local storage.
//!
//! ## Concurrency
//! The cart sits behind a `tokio::sync::Mutex` that is held across the
//! mutation and the write to storage. Mutations are serialized, and the
//! persisted value always reflects a complete mutation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  View Action             Store Method              Persisted State      │
//! │  ───────────             ────────────              ───────────────      │
//! │                                                                         │
//! │  "Add to Cart" ─────────► add_to_cart() ─────────► set_item(key, json)  │
//! │                                                                         │
//! │  Quantity +/- ──────────► update_quantity() ─────► set_item(key, json)  │
//! │                                                                         │
//! │  Trash icon ────────────► remove_from_cart() ────► set_item / remove    │
//! │                                                                         │
//! │  "Clear Cart" ──────────► clear_cart() ──────────► remove_item(key)     │
//! │                                                                         │
//! │  Page load ─────────────► hydrate() ◄──────────── get_item(key)         │
//! │                                                                         │
//! │  Empty cart ⇒ key removed. Non-empty ⇒ full line list as JSON.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! - Unreadable storage at startup: `warn!`, start empty
//! - Corrupted JSON at startup: `warn!`, discard the key, start empty
//! - Duplicate or zero-quantity lines at startup: merged or dropped, and
//!   the cleaned cart is written back once
//! - Failed write after a mutation: `error!`, the in-memory cart stays
//!   authoritative and the mutation still succeeds

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use medwear_core::{AddOutcome, Cart, CartLine, LineKey, Money, NewCartLine};
use medwear_store::LocalStorage;

/// The active cart and its persistence.
pub struct CartStore {
    cart: Mutex<Cart>,
    storage: Arc<dyn LocalStorage>,
    key: String,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Builds the store from whatever is persisted under `key`.
    ///
    /// Never fails; see the failure policy in the module docs.
    pub async fn hydrate(storage: Arc<dyn LocalStorage>, key: impl Into<String>) -> Self {
        let key = key.into();

        let mut normalized = false;
        let cart = match storage.get_item(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => {
                    let cart = Cart::from_lines(lines.clone());
                    normalized = cart.lines() != lines.as_slice();
                    info!(key = %key, lines = cart.len(), normalized, "Cart restored from storage");
                    cart
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding corrupted cart");
                    if let Err(e) = storage.remove_item(&key).await {
                        error!(key = %key, error = %e, "Failed to remove corrupted cart");
                    }
                    Cart::new()
                }
            },
            Ok(None) => {
                debug!(key = %key, "No saved cart");
                Cart::new()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read saved cart, starting empty");
                Cart::new()
            }
        };

        let store = CartStore {
            cart: Mutex::new(cart),
            storage,
            key,
        };

        if normalized {
            let cart = store.cart.lock().await;
            store.persist(&cart).await;
        }

        store
    }

    /// The storage key this cart persists under.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// A copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Runs `f` with read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Adds a selection, merging into an existing line with the same key.
    pub async fn add_to_cart(&self, item: NewCartLine) -> AddOutcome {
        let mut cart = self.cart.lock().await;
        let outcome = cart.add(item);
        if outcome.changed() {
            self.persist(&cart).await;
        }
        outcome
    }

    /// Removes a line. Returns whether one was removed.
    pub async fn remove_from_cart(&self, key: &LineKey) -> bool {
        let mut cart = self.cart.lock().await;
        let removed = cart.remove(key);
        if removed {
            self.persist(&cart).await;
        }
        removed
    }

    /// Sets a line's quantity. Below 1 is a no-op. Returns whether a line changed.
    pub async fn update_quantity(&self, key: &LineKey, quantity: i64) -> bool {
        let mut cart = self.cart.lock().await;
        let updated = cart.update_quantity(key, quantity);
        if updated {
            self.persist(&cart).await;
        }
        updated
    }

    /// Empties the cart and removes the persisted key.
    pub async fn clear_cart(&self) {
        let mut cart = self.cart.lock().await;
        cart.clear();
        self.persist(&cart).await;
    }

    /// Empties the cart and returns what it held, in one step.
    ///
    /// Used on order completion so the totals come from exactly the lines
    /// that were cleared.
    pub async fn take(&self) -> Cart {
        let mut cart = self.cart.lock().await;
        let taken = std::mem::take(&mut *cart);
        self.persist(&cart).await;
        taken
    }

    /// Σ(unit price × quantity).
    pub async fn cart_total(&self) -> Money {
        self.cart.lock().await.cart_total()
    }

    /// Σ quantity.
    pub async fn item_count(&self) -> u64 {
        self.cart.lock().await.item_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.cart.lock().await.is_empty()
    }

    /// Writes the cart to storage. Called with the cart lock held.
    async fn persist(&self, cart: &Cart) {
        let result = if cart.is_empty() {
            self.storage.remove_item(&self.key).await
        } else {
            match serde_json::to_string(cart) {
                Ok(json) => self.storage.set_item(&self.key, &json).await,
                Err(e) => {
                    error!(key = %self.key, error = %e, "Failed to serialize cart");
                    return;
                }
            }
        };

        if let Err(e) = result {
            error!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medwear_core::Product;
    use medwear_store::{Database, DbConfig, MemoryStorage, StoreError, StoreResult};

    /// Storage where every call fails.
    struct FailingStorage;

    #[async_trait]
    impl LocalStorage for FailingStorage {
        async fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Internal("disk full".to_string()))
        }

        async fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Internal("disk full".to_string()))
        }

        async fn remove_item(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Internal("disk full".to_string()))
        }
    }

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

    #[tokio::test]
    async fn test_mutations_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::hydrate(storage.clone(), "cart").await;

        store
            .add_to_cart(NewCartLine::new(scrub_top(), 2, "Navy", "M"))
            .await;
        let saved = storage.get_item("cart").await.unwrap().unwrap();
        let saved: Cart = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved.item_count(), 2);

        let key = LineKey::new("1", "Navy", "M");
        assert!(store.update_quantity(&key, 5).await);
        let saved: Cart = serde_json::from_str(&storage.get_item("cart").await.unwrap().unwrap()).unwrap();
        assert_eq!(saved.item_count(), 5);

        assert!(store.remove_from_cart(&key).await);
        assert_eq!(storage.get_item("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::hydrate(storage.clone(), "cart").await;
        store
            .add_to_cart(NewCartLine::new(scrub_top(), 1, "Black", "L"))
            .await;

        store.clear_cart().await;

        assert!(store.is_empty().await);
        assert!(store.cart_total().await.is_zero());
        assert_eq!(store.item_count().await, 0);
        assert_eq!(storage.get_item("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_add_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::hydrate(storage.clone(), "cart").await;

        let outcome = store
            .add_to_cart(NewCartLine::new(scrub_top(), 0, "Navy", "M"))
            .await;

        assert_eq!(outcome, AddOutcome::Rejected);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_hydrate_restores_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let first = CartStore::hydrate(storage.clone(), "cart").await;
        first
            .add_to_cart(NewCartLine::new(scrub_top(), 2, "Navy", "M"))
            .await;
        first
            .add_to_cart(NewCartLine::new(scrub_top(), 1, "Black", "XL"))
            .await;
        let before = first.snapshot().await;
        drop(first);

        let second = CartStore::hydrate(storage, "cart").await;
        assert_eq!(second.snapshot().await, before);
        assert_eq!(second.item_count().await, 3);
    }

    #[tokio::test]
    async fn test_hydrate_writes_back_cleaned_lines() {
        let mut cart = Cart::new();
        cart.add(NewCartLine::new(scrub_top(), 2, "Navy", "M"));
        cart.add(NewCartLine::new(scrub_top(), 1, "Black", "L"));
        let navy = cart.lines()[0].clone();
        let mut empty_black = cart.lines()[1].clone();
        empty_black.quantity = 0;

        let raw = serde_json::to_string(&vec![navy.clone(), navy, empty_black]).unwrap();
        let storage = Arc::new(MemoryStorage::with_item("cart", raw));
        let store = CartStore::hydrate(storage.clone(), "cart").await;

        assert_eq!(store.item_count().await, 4);
        let saved: Vec<CartLine> =
            serde_json::from_str(&storage.get_item("cart").await.unwrap().unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_hydrate_leaves_clean_cart_untouched() {
        let mut cart = Cart::new();
        cart.add(NewCartLine::new(scrub_top(), 2, "Navy", "M"));
        let raw = serde_json::to_string(&cart).unwrap();

        let storage = Arc::new(MemoryStorage::with_item("cart", raw.clone()));
        CartStore::hydrate(storage.clone(), "cart").await;

        assert_eq!(storage.get_item("cart").await.unwrap(), Some(raw));
    }

    #[tokio::test]
    async fn test_corrupted_cart_discarded() {
        let storage = Arc::new(MemoryStorage::with_item("cart", "{not json"));
        let store = CartStore::hydrate(storage.clone(), "cart").await;

        assert!(store.is_empty().await);
        assert_eq!(storage.get_item("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_custom_key() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::hydrate(storage.clone(), "cart-v2").await;
        store
            .add_to_cart(NewCartLine::new(scrub_top(), 1, "Navy", "S"))
            .await;

        assert_eq!(store.storage_key(), "cart-v2");
        assert!(storage.get_item("cart-v2").await.unwrap().is_some());
        assert_eq!(storage.get_item("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_storage_failures_are_soft() {
        let store = CartStore::hydrate(Arc::new(FailingStorage), "cart").await;
        assert!(store.is_empty().await);

        let outcome = store
            .add_to_cart(NewCartLine::new(scrub_top(), 1, "Navy", "M"))
            .await;
        assert_eq!(outcome, AddOutcome::Inserted);
        assert_eq!(store.item_count().await, 1);
    }

    #[tokio::test]
    async fn test_take_returns_cleared_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::hydrate(storage.clone(), "cart").await;
        store
            .add_to_cart(NewCartLine::new(scrub_top(), 3, "Navy", "M"))
            .await;

        let taken = store.take().await;
        assert_eq!(taken.item_count(), 3);
        assert!(store.is_empty().await);
        assert_eq!(storage.get_item("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let store = CartStore::hydrate(Arc::new(db.local_storage()), "cart").await;
        store
            .add_to_cart(NewCartLine::new(scrub_top(), 2, "Light Blue", "XS"))
            .await;
        let before = store.snapshot().await;
        drop(store);
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let store = CartStore::hydrate(Arc::new(db.local_storage()), "cart").await;
        assert_eq!(store.snapshot().await, before);
    }
}
