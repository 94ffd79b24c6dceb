//! # Domain Types
//!
//! Core domain types shared by the cart, the catalog and the pricing rules.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   ProductId     │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  opaque text    │   │  bps (u32)      │       │
//! │  │  name, image    │   │  "1", "42"...   │   │  800 = 8%       │       │
//! │  │  price (Money)  │   └─────────────────┘   └─────────────────┘       │
//! │  │  colors, sizes  │                                                    │
//! │  │  category       │   A Product is owned by the catalog; the cart     │
//! │  │  rating, stock  │   copies it into a CartLine when it is added.     │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (the storefront's flat sales tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Returns the rate as a multiplier: 800 bps → 0.08.
    #[inline]
    pub fn fraction(&self) -> f64 {
        f64::from(self.0) / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::DEFAULT_TAX_RATE
    }
}

// =============================================================================
// Product Identifier
// =============================================================================

/// Opaque product identifier.
///
/// Catalog fixtures use short strings (`"1"`, `"2"`...). Persisted carts
/// written by older storefront builds may carry the id as a JSON number, so
/// deserialization accepts both and always yields text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, TS)]
#[ts(export)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ProductIdVisitor;

        impl Visitor<'_> for ProductIdVisitor {
            type Value = ProductId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a product id string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ProductId, E> {
                Ok(ProductId::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ProductId, E> {
                Ok(ProductId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }
        }

        deserializer.deserialize_any(ProductIdVisitor)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the storefront catalog.
///
/// Field names serialize in camelCase because the same records are persisted
/// inside cart lines and read by the storefront views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name shown on product cards and in the cart.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Primary image URL.
    pub image: String,

    /// Available colors, in display order.
    pub colors: Vec<String>,

    /// Available sizes, in display order.
    pub sizes: Vec<String>,

    /// Category name ("Scrub Tops", "Lab Coats", ...).
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,

    /// Shown with a "New" badge; drives the `newest` sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_new: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_featured: Option<bool>,

    /// Average review score, 0-5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub rating: Option<f64>,

    /// Units on hand, when the catalog tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub stock: Option<u32>,
}

impl Product {
    /// Creates a product with the required fields; optional fields are unset.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            category: category.into(),
            description: None,
            is_new: None,
            is_featured: None,
            rating: None,
            stock: None,
        }
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the available colors.
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the available sizes.
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Checks whether the product is offered in this color.
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// Checks whether the product is offered in this size.
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// The first color and size, used by quick "add to cart" buttons.
    pub fn default_selection(&self) -> Option<(&str, &str)> {
        let color = self.colors.first()?;
        let size = self.sizes.first()?;
        Some((color.as_str(), size.as_str()))
    }

    /// Whether the product carries the "New" badge.
    pub fn is_new(&self) -> bool {
        self.is_new.unwrap_or(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
