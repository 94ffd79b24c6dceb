//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  Steps   │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       submit_payment                     │
//! │                   update_item       (checkout.rs)                      │
//! │                   remove_item            │                              │
//! │                        │                 └──► cart cleared              │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Removing or updating a line that is not in the cart is a silent no-op,
//! and so is a quantity below 1. The response always carries the current
//! cart, so the view simply re-renders it.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use medwear_core::catalog::ProductCatalog;
use medwear_core::validation::{quantity_limit, validate_quantity, validate_selection};
use medwear_core::{AddOutcome, Cart, CartLine, LineKey, Money, NewCartLine, ProductId};

use crate::error::{ApiError, ApiResult};
use crate::state::CartStore;

/// Derived cart figures shown in the header badge and the cart page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Σ quantity.
    pub item_count: u64,

    /// Σ(unit price × quantity), before discount, shipping and tax.
    pub cart_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            cart_total: cart.cart_total(),
        }
    }
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Response to an add: what happened plus the resulting cart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddToCartResponse {
    pub outcome: AddOutcome,
    pub cart: CartResponse,
}

/// Add-to-cart request from a product card or product page.
///
/// Color and size default to the product's first option, which is what the
/// quick-add button on product cards does.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddToCartRequest {
    pub product_id: ProductId,

    #[serde(default)]
    #[ts(optional)]
    pub quantity: Option<i64>,

    #[serde(default)]
    #[ts(optional)]
    pub selected_color: Option<String>,

    #[serde(default)]
    #[ts(optional)]
    pub selected_size: Option<String>,
}

impl AddToCartRequest {
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        AddToCartRequest {
            product_id: product_id.into(),
            quantity: None,
            selected_color: None,
            selected_size: None,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn selection(mut self, color: impl Into<String>, size: impl Into<String>) -> Self {
        self.selected_color = Some(color.into());
        self.selected_size = Some(size.into());
        self
    }
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart Page                                                              │
/// │                                                                         │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  SHOPPING CART                                     3 items     │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Classic V-Neck Scrub Top  Navy / M     x2         $79.98     │    │
/// │  │  Jogger-Style Scrub Pants  Black / S    x1         $42.99     │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Subtotal                                          $122.97    │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// │                                                                         │
/// │  get_cart() → { lines: [...], totals: { itemCount, cartTotal } }       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn get_cart(cart: &CartStore) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c)).await
}

/// Adds a product selection to the cart.
///
/// ## Behavior
/// - Same product, color and size already in cart: quantities add up
/// - Otherwise: appended as a new line
/// - The product record is copied into the line, so later catalog price
///   changes do not reach the cart
/// - Quantity below 1: nothing changes (`Rejected`)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Shopper picks Navy / M, quantity 2, clicks "Add to Cart"               │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  add_to_cart({ productId: "1", quantity: 2,                            │
/// │                selectedColor: "Navy", selectedSize: "M" })             │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  1. Look up the product in the catalog                        │    │
/// │  │  2. Check color/size are offered and quantity ≤ limit         │    │
/// │  │  3. Merge into the matching line, or append                   │    │
/// │  │  4. Persist and return the updated cart                       │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn add_to_cart(
    catalog: &dyn ProductCatalog,
    cart: &CartStore,
    request: AddToCartRequest,
) -> ApiResult<AddToCartResponse> {
    let quantity = request.quantity.unwrap_or(1);
    debug!(product_id = %request.product_id, quantity = %quantity, "add_to_cart command");

    let product = catalog
        .get(&request.product_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Product", request.product_id.as_str()))?;

    let (color, size) = match (request.selected_color, request.selected_size) {
        (Some(color), Some(size)) => (color, size),
        (color, size) => {
            let (default_color, default_size) = product.default_selection().ok_or_else(|| {
                ApiError::cart(format!("{} has no color or size options", product.name))
            })?;
            (
                color.unwrap_or_else(|| default_color.to_string()),
                size.unwrap_or_else(|| default_size.to_string()),
            )
        }
    };
    validate_selection(&product, &color, &size)?;

    // Below 1 is passed through and rejected by the cart without an error.
    if quantity >= 1 {
        validate_quantity(quantity, quantity_limit(&product))?;
    }
    let quantity = u32::try_from(quantity).unwrap_or(0);

    let outcome = cart
        .add_to_cart(NewCartLine::new(product, quantity, color, size))
        .await;

    Ok(AddToCartResponse {
        outcome,
        cart: get_cart(cart).await,
    })
}

/// Sets the quantity of a cart line.
///
/// ## Behavior
/// - Quantity below 1: ignored (the trash icon is the way to remove)
/// - Line not in cart: ignored
pub async fn update_cart_item(cart: &CartStore, key: LineKey, quantity: i64) -> CartResponse {
    debug!(item = %key.item_identifier(), quantity = %quantity, "update_cart_item command");

    cart.update_quantity(&key, quantity).await;
    get_cart(cart).await
}

/// Removes a line from the cart.
pub async fn remove_from_cart(cart: &CartStore, key: LineKey) -> CartResponse {
    debug!(item = %key.item_identifier(), "remove_from_cart command");

    cart.remove_from_cart(&key).await;
    get_cart(cart).await
}

/// Clears all lines from the cart.
///
/// ## When Used
/// - Shopper clicks "Clear Cart"
///
/// ## Returns
/// Empty cart
pub async fn clear_cart(cart: &CartStore) -> CartResponse {
    debug!("clear_cart command");

    cart.clear_cart().await;
    get_cart(cart).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::fixtures::fixture_catalog;
    use medwear_store::MemoryStorage;
    use std::sync::Arc;

    async fn empty_cart() -> CartStore {
        CartStore::hydrate(Arc::new(MemoryStorage::new()), "cart").await
    }

    #[tokio::test]
    async fn test_add_merges_same_selection() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;

        let first = add_to_cart(&catalog, &cart, AddToCartRequest::new("1").selection("Navy", "M"))
            .await
            .unwrap();
        assert_eq!(first.outcome, AddOutcome::Inserted);

        let second = add_to_cart(
            &catalog,
            &cart,
            AddToCartRequest::new("1").selection("Navy", "M").quantity(2),
        )
        .await
        .unwrap();
        assert_eq!(second.outcome, AddOutcome::Merged { quantity: 3 });
        assert_eq!(second.cart.lines.len(), 1);
        assert_eq!(second.cart.totals.item_count, 3);
    }

    #[tokio::test]
    async fn test_distinct_selections_are_distinct_lines() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;

        add_to_cart(&catalog, &cart, AddToCartRequest::new("1").selection("Navy", "M"))
            .await
            .unwrap();
        let response = add_to_cart(
            &catalog,
            &cart,
            AddToCartRequest::new("1").selection("Black", "M").quantity(2),
        )
        .await
        .unwrap();

        assert_eq!(response.cart.lines.len(), 2);
        assert_eq!(response.cart.totals.item_count, 3);
    }

    #[tokio::test]
    async fn test_add_defaults_to_first_options() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;

        let response = add_to_cart(&catalog, &cart, AddToCartRequest::new("1"))
            .await
            .unwrap();

        let line = &response.cart.lines[0];
        assert_eq!(line.selected_color, "Navy");
        assert_eq!(line.selected_size, "XS");
        assert_eq!(line.quantity, 1);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;

        let missing = add_to_cart(&catalog, &cart, AddToCartRequest::new("999"))
            .await
            .unwrap_err();
        assert_eq!(missing.code, ErrorCode::NotFound);

        let bad_color = add_to_cart(
            &catalog,
            &cart,
            AddToCartRequest::new("1").selection("Purple", "M"),
        )
        .await
        .unwrap_err();
        assert_eq!(bad_color.code, ErrorCode::ValidationError);

        let too_many = add_to_cart(
            &catalog,
            &cart,
            AddToCartRequest::new("1").selection("Navy", "M").quantity(26),
        )
        .await
        .unwrap_err();
        assert_eq!(too_many.code, ErrorCode::ValidationError);

        assert!(cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_zero_quantity_add_is_silent() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;

        let response = add_to_cart(
            &catalog,
            &cart,
            AddToCartRequest::new("1").selection("Navy", "M").quantity(0),
        )
        .await
        .unwrap();

        assert_eq!(response.outcome, AddOutcome::Rejected);
        assert!(response.cart.lines.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;
        add_to_cart(&catalog, &cart, AddToCartRequest::new("1").selection("Navy", "M"))
            .await
            .unwrap();
        let key = LineKey::new("1", "Navy", "M");

        let response = update_cart_item(&cart, key.clone(), 4).await;
        assert_eq!(response.totals.item_count, 4);

        let response = update_cart_item(&cart, key.clone(), 0).await;
        assert_eq!(response.totals.item_count, 4);

        let response = remove_from_cart(&cart, LineKey::new("1", "Navy", "L")).await;
        assert_eq!(response.lines.len(), 1);

        let response = remove_from_cart(&cart, key).await;
        assert!(response.lines.is_empty());
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let catalog = fixture_catalog();
        let cart = empty_cart().await;
        add_to_cart(&catalog, &cart, AddToCartRequest::new("2").quantity(3))
            .await
            .unwrap();

        let response = clear_cart(&cart).await;

        assert!(response.lines.is_empty());
        assert_eq!(response.totals.item_count, 0);
        assert!(response.totals.cart_total.is_zero());
    }

    #[test]
    fn test_request_accepts_numeric_id() {
        let request: AddToCartRequest =
            serde_json::from_str(r#"{"productId": 3, "selectedColor": "White"}"#).unwrap();
        assert_eq!(request.product_id.as_str(), "3");
        assert_eq!(request.quantity, None);
        assert_eq!(request.selected_size, None);
    }
}
