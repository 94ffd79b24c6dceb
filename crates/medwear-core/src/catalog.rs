//! # Catalog Module
//!
//! Read access to product records: filtering, sorting, lookup and "similar
//! products". The storefront injects a [`ProductCatalog`]; the bundled
//! [`InMemoryCatalog`] is seeded from fixture data.
//!
//! ## Query Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ProductQuery                                       │
//! │                                                                         │
//! │  categories: [Scrub Tops, Lab Coats]   ─┐                               │
//! │  colors:     [Navy]                     ├─ any-of within a facet        │
//! │  sizes:      []   (no filter)          ─┘   AND across facets           │
//! │  price:      $30.00 ..= $60.00              inclusive bounds            │
//! │  search:     "coat"                         case-insensitive on name    │
//! │  sort:       price-asc                      stable                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::{validate_price, validate_product_name};

// =============================================================================
// Sort Order
// =============================================================================

/// Product listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    /// Highest rating first; unrated products count as 0.
    Rating,
    /// New products first, otherwise catalog order.
    Newest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 7] = [
        SortOrder::Featured,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::Rating,
        SortOrder::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Featured => "featured",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::Rating => "rating",
            SortOrder::Newest => "newest",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Featured => Ordering::Equal,
            SortOrder::PriceAsc => a.price.dollars().total_cmp(&b.price.dollars()),
            SortOrder::PriceDesc => b.price.dollars().total_cmp(&a.price.dollars()),
            SortOrder::NameAsc => compare_names(a, b),
            SortOrder::NameDesc => compare_names(b, a),
            SortOrder::Rating => rating(b).total_cmp(&rating(a)),
            SortOrder::Newest => b.is_new().cmp(&a.is_new()),
        }
    }
}

fn rating(product: &Product) -> f64 {
    product.rating.unwrap_or(0.0)
}

fn compare_names(a: &Product, b: &Product) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortOrder::ALL.iter().map(|o| o.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Product Query
// =============================================================================

/// Filter and sort options for a product listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductQuery {
    pub categories: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl ProductQuery {
    pub fn new() -> Self {
        ProductQuery::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.colors.push(color.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.sizes.push(size.into());
        self
    }

    pub fn price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether a product passes every filter.
    pub fn matches(&self, product: &Product) -> bool {
        let in_category =
            self.categories.is_empty() || self.categories.iter().any(|c| *c == product.category);
        let in_color = self.colors.is_empty() || self.colors.iter().any(|c| product.has_color(c));
        let in_size = self.sizes.is_empty() || self.sizes.iter().any(|s| product.has_size(s));
        let above_min = self.min_price.map_or(true, |min| product.price >= min);
        let below_max = self.max_price.map_or(true, |max| product.price <= max);
        let named = match self.search.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => product
                .name
                .to_lowercase()
                .contains(&text.to_lowercase()),
            _ => true,
        };

        in_category && in_color && in_size && above_min && below_max && named
    }
}

// =============================================================================
// Catalog Trait
// =============================================================================

/// Source of product records.
///
/// Implementors supply the records in catalog order; filtering, sorting and
/// "similar products" come for free.
pub trait ProductCatalog: Send + Sync {
    /// All products, in catalog order.
    fn products(&self) -> &[Product];

    /// Looks up one product.
    fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products().iter().find(|p| p.id == *id)
    }

    /// Filters and sorts the catalog. Sorting is stable.
    fn query(&self, query: &ProductQuery) -> Vec<Product> {
        let mut found: Vec<Product> = self
            .products()
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        found.sort_by(|a, b| query.sort.compare(a, b));
        found
    }

    /// Up to `limit` products in the same category, excluding the product itself.
    fn similar(&self, id: &ProductId, limit: usize) -> Vec<Product> {
        let Some(product) = self.get(id) else {
            return Vec::new();
        };
        self.products()
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Distinct categories, in order of first appearance.
    fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in self.products() {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// A catalog held in memory, editable the way the admin console edits it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        InMemoryCatalog { products }
    }

    /// Inserts a product, or replaces the one with the same id in place.
    ///
    /// ## Rules
    /// - Name 1-200 characters
    /// - Price finite and non-negative
    /// - At least one color and one size
    pub fn upsert(&mut self, product: Product) -> CoreResult<()> {
        validate_product_name(&product.name)?;
        validate_price(product.price)?;
        if product.colors.is_empty() {
            return Err(ValidationError::Required {
                field: "colors".to_string(),
            }
            .into());
        }
        if product.sizes.is_empty() {
            return Err(ValidationError::Required {
                field: "sizes".to_string(),
            }
            .into());
        }

        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
        Ok(())
    }

    /// Removes a product and returns it.
    pub fn remove(&mut self, id: &ProductId) -> CoreResult<Product> {
        let idx = self
            .products
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(self.products.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn products(&self) -> &[Product] {
        &self.products
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, price: f64, category: &str) -> Product {
        Product::new(id, name, Money::from_dollars(price), category)
            .with_colors(["Navy", "Black"])
            .with_sizes(["S", "M", "L"])
    }

    fn catalog() -> InMemoryCatalog {
        let mut top = product("1", "Classic V-Neck Scrub Top", 39.99, "Scrub Tops");
        top.is_new = Some(true);
        top.rating = Some(4.8);

        let mut pants = product("2", "Jogger-Style Scrub Pants", 42.99, "Scrub Bottoms");
        pants.rating = Some(4.9);

        let mut coat = product("3", "Premium Lab Coat", 59.99, "Lab Coats")
            .with_colors(["White"]);
        coat.rating = Some(4.7);

        let mut fitted = product("4", "Fitted Scrub Top", 34.99, "Scrub Tops")
            .with_colors(["Teal", "Pink"]);
        fitted.is_new = Some(true);

        let core = product("7", "Core Stretch Scrub Top", 36.99, "Scrub Tops");

        InMemoryCatalog::new(vec![top, pants, coat, fitted, core])
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_featured_keeps_catalog_order() {
        let found = catalog().query(&ProductQuery::new());
        assert_eq!(ids(&found), ["1", "2", "3", "4", "7"]);
    }

    #[test]
    fn test_sort_orders() {
        let catalog = catalog();
        let sorted = |sort| catalog.query(&ProductQuery::new().sort(sort));

        assert_eq!(ids(&sorted(SortOrder::PriceAsc)), ["4", "7", "1", "2", "3"]);
        assert_eq!(ids(&sorted(SortOrder::PriceDesc)), ["3", "2", "1", "7", "4"]);
        assert_eq!(ids(&sorted(SortOrder::NameAsc)), ["1", "7", "4", "2", "3"]);
        assert_eq!(ids(&sorted(SortOrder::NameDesc)), ["3", "2", "4", "7", "1"]);
        // unrated 4 and 7 rank as 0 and keep their relative order
        assert_eq!(ids(&sorted(SortOrder::Rating)), ["2", "1", "3", "4", "7"]);
        assert_eq!(ids(&sorted(SortOrder::Newest)), ["1", "4", "2", "3", "7"]);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert!("cheapest".parse::<SortOrder>().is_err());

        for order in SortOrder::ALL {
            assert_eq!(order.to_string().parse::<SortOrder>().unwrap(), order);
        }
    }

    #[test]
    fn test_facet_filters() {
        let catalog = catalog();

        let tops = catalog.query(&ProductQuery::new().category("Scrub Tops"));
        assert_eq!(ids(&tops), ["1", "4", "7"]);

        let either = catalog.query(&ProductQuery::new().category("Lab Coats").category("Scrub Bottoms"));
        assert_eq!(ids(&either), ["2", "3"]);

        // AND across facets
        let teal_tops = catalog.query(&ProductQuery::new().category("Scrub Tops").color("Teal"));
        assert_eq!(ids(&teal_tops), ["4"]);

        let white_or_pink = catalog.query(&ProductQuery::new().color("White").color("Pink"));
        assert_eq!(ids(&white_or_pink), ["3", "4"]);

        assert!(catalog.query(&ProductQuery::new().size("XXL")).is_empty());
    }

    #[test]
    fn test_price_range_inclusive() {
        let found = catalog().query(&ProductQuery::new().price_range(
            Some(Money::from_dollars(36.99)),
            Some(Money::from_dollars(42.99)),
        ));
        assert_eq!(ids(&found), ["1", "2", "7"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let found = catalog().query(&ProductQuery::new().search("SCRUB top"));
        assert_eq!(ids(&found), ["1", "4", "7"]);

        let all = catalog().query(&ProductQuery::new().search("   "));
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_similar_products() {
        let catalog = catalog();

        let similar = catalog.similar(&ProductId::new("1"), 4);
        assert_eq!(ids(&similar), ["4", "7"]);

        assert_eq!(ids(&catalog.similar(&ProductId::new("1"), 1)), ["4"]);
        assert!(catalog.similar(&ProductId::new("3"), 4).is_empty());
        assert!(catalog.similar(&ProductId::new("99"), 4).is_empty());
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            catalog().categories(),
            ["Scrub Tops", "Scrub Bottoms", "Lab Coats"]
        );
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut catalog = catalog();

        let mut updated = product("3", "Premium Lab Coat", 54.99, "Lab Coats");
        updated.colors = vec!["White".to_string()];
        catalog.upsert(updated).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.get(&ProductId::new("3")).map(|p| p.price.rounded_cents()),
            Some(5499)
        );

        catalog
            .upsert(product("8", "Medical Stethoscope", 89.99, "Accessories"))
            .unwrap();
        assert_eq!(catalog.len(), 6);

        let removed = catalog.remove(&ProductId::new("8")).unwrap();
        assert_eq!(removed.name, "Medical Stethoscope");
        assert!(matches!(
            catalog.remove(&ProductId::new("8")),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_upsert_validates() {
        let mut catalog = InMemoryCatalog::default();

        assert!(catalog.upsert(product("1", "", 10.0, "Scrub Tops")).is_err());
        assert!(catalog.upsert(product("1", "Top", -1.0, "Scrub Tops")).is_err());

        let mut no_sizes = product("1", "Top", 10.0, "Scrub Tops");
        no_sizes.sizes.clear();
        assert!(catalog.upsert(no_sizes).is_err());

        assert!(catalog.is_empty());
    }
}
