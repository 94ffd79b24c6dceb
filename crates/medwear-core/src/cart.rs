//! # Cart Module
//!
//! The shopping cart: an ordered list of lines, each a product copy plus the
//! shopper's color, size and quantity.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Line per Key                                   │
//! │                                                                         │
//! │  LineKey = (productId, selectedColor, selectedSize)                     │
//! │                                                                         │
//! │  add(#1 Navy M ×2) ──► [ #1 Navy M ×2 ]                     Inserted    │
//! │  add(#1 Navy M ×1) ──► [ #1 Navy M ×3 ]                     Merged      │
//! │  add(#1 Black M ×1) ─► [ #1 Navy M ×3, #1 Black M ×1 ]      Inserted    │
//! │  add(#2 Gray S ×0) ──► (unchanged)                          Rejected    │
//! │                                                                         │
//! │  update(#1 Navy M, 0) ──► (unchanged, quantity stays 3)                 │
//! │  remove(#9 Red XL)    ──► (unchanged, silent no-op)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Layout
//! The cart serializes as a bare JSON array of lines. Each line flattens the
//! product fields next to `selectedColor`, `selectedSize`, `quantity` and
//! `itemIdentifier`. Deserializing runs the same normalization as
//! [`Cart::from_lines`].
//!
//! ## Derived Values
//! [`Cart::cart_total`] and [`Cart::item_count`] are computed from the lines
//! on every call. Nothing derived is stored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, ProductId};

// =============================================================================
// Line Key
// =============================================================================

/// Identity of a cart line: product plus selected color and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineKey {
    pub product_id: ProductId,
    pub selected_color: String,
    pub selected_size: String,
}

impl LineKey {
    pub fn new(
        product_id: impl Into<ProductId>,
        selected_color: impl Into<String>,
        selected_size: impl Into<String>,
    ) -> Self {
        LineKey {
            product_id: product_id.into(),
            selected_color: selected_color.into(),
            selected_size: selected_size.into(),
        }
    }

    /// Renders the key as `"{productId}-{color}-{size}"`.
    ///
    /// The rendered form is persisted for compatibility only. It is not
    /// unique when ids or options contain hyphens, so lookups always go
    /// through the structured key.
    pub fn item_identifier(&self) -> String {
        format!(
            "{}-{}-{}",
            self.product_id, self.selected_color, self.selected_size
        )
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A product in the cart with its selection and quantity.
///
/// ## Price Freezing
/// The product is copied when the line is created. Later catalog price
/// changes are not reflected in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,

    pub selected_color: String,

    pub selected_size: String,

    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,

    /// Rendered [`LineKey::item_identifier`]; rebuilt on normalization.
    #[serde(default)]
    pub item_identifier: String,
}

impl CartLine {
    /// Returns the identity key of this line.
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.product.id.clone(),
            self.selected_color.clone(),
            self.selected_size.clone(),
        )
    }

    /// Checks whether this line has the given key without allocating.
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id
            && self.selected_color == key.selected_color
            && self.selected_size == key.selected_size
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

/// An add-to-cart request: the product payload plus the shopper's selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCartLine {
    pub product: Product,
    pub quantity: u32,
    pub selected_color: String,
    pub selected_size: String,
}

impl NewCartLine {
    pub fn new(
        product: Product,
        quantity: u32,
        selected_color: impl Into<String>,
        selected_size: impl Into<String>,
    ) -> Self {
        NewCartLine {
            product,
            quantity,
            selected_color: selected_color.into(),
            selected_size: selected_size.into(),
        }
    }

    fn key(&self) -> LineKey {
        LineKey::new(
            self.product.id.clone(),
            self.selected_color.clone(),
            self.selected_size.clone(),
        )
    }
}

/// What an add request did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum AddOutcome {
    /// A new line was appended.
    Inserted,
    /// An existing line absorbed the quantity; `quantity` is its new value.
    Merged { quantity: u32 },
    /// Quantity was zero; nothing changed.
    Rejected,
}

impl AddOutcome {
    /// Whether the cart changed.
    pub fn changed(&self) -> bool {
        !matches!(self, AddOutcome::Rejected)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Every line has quantity ≥ 1
/// - No two lines share a [`LineKey`]
/// - Lines keep insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Builds a cart from raw lines, restoring the invariants.
    ///
    /// Lines sharing a key are merged into the first occurrence with their
    /// quantities summed. Lines with quantity 0 are dropped. Every
    /// `itemIdentifier` is re-rendered from its key.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for mut line in lines {
            if line.quantity == 0 {
                continue;
            }
            let key = line.key();
            match cart.position(&key) {
                Some(idx) => {
                    let existing = &mut cart.lines[idx];
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => {
                    line.item_identifier = key.item_identifier();
                    cart.lines.push(line);
                }
            }
        }
        cart
    }

    /// Adds a product selection to the cart.
    ///
    /// ## Behavior
    /// - Quantity 0: nothing changes ([`AddOutcome::Rejected`])
    /// - Key already present: quantity incremented ([`AddOutcome::Merged`])
    /// - Otherwise: line appended ([`AddOutcome::Inserted`])
    ///
    /// Color and size are not checked against the product's options.
    pub fn add(&mut self, item: NewCartLine) -> AddOutcome {
        if item.quantity == 0 {
            return AddOutcome::Rejected;
        }

        let key = item.key();
        if let Some(idx) = self.position(&key) {
            let line = &mut self.lines[idx];
            line.quantity = line.quantity.saturating_add(item.quantity);
            return AddOutcome::Merged {
                quantity: line.quantity,
            };
        }

        self.lines.push(CartLine {
            item_identifier: key.item_identifier(),
            product: item.product,
            selected_color: item.selected_color,
            selected_size: item.selected_size,
            quantity: item.quantity,
        });
        AddOutcome::Inserted
    }

    /// Removes the line with this key. Returns whether a line was removed.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        match self.position(key) {
            Some(idx) => {
                self.lines.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Sets the quantity of the line with this key.
    ///
    /// Quantities below 1 are rejected and the line keeps its quantity.
    /// Values past `u32::MAX` saturate. Returns whether a line was updated.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        if quantity < 1 {
            return false;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        match self.position(key) {
            Some(idx) => {
                self.lines[idx].quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(key))
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ(unit price × quantity), unrounded.
    pub fn cart_total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|l| l.matches(key))
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Cart::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
