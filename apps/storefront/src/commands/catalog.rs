//! # Catalog Commands
//!
//! Product listing, product pages and the "You may also like" row.
//!
//! ## Listing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Listing Flow                                 │
//! │                                                                         │
//! │  Shopper ticks "Scrub Tops", "Navy", sorts by "Price: Low to High"     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  list_products({ categories: ["Scrub Tops"], colors: ["Navy"],         │
//! │                  sort: "price-asc" })                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  1. Trim and length-check the search text │                         │
//! │  │  2. Filter: any-of per facet, AND across  │                         │
//! │  │  3. Stable sort                           │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { products: [...], total: 2, categories: [...] }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};
use ts_rs::TS;

use medwear_core::catalog::{ProductCatalog, ProductQuery};
use medwear_core::validation::{quantity_limit, validate_search_query};
use medwear_core::{Product, ProductId};

use crate::error::{ApiError, ApiResult};

/// How many products the "You may also like" row shows.
pub const SIMILAR_PRODUCTS_LIMIT: usize = 4;

/// How many products the home page features.
pub const FEATURED_PRODUCTS_LIMIT: usize = 4;

/// A page of products plus the facets the filter sidebar needs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductListResponse {
    pub products: Vec<Product>,

    /// "Showing {total} products"
    pub total: usize,

    /// Every category in the catalog, for the filter sidebar.
    pub categories: Vec<String>,
}

/// Everything a product page needs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDetail {
    pub product: Product,

    /// Upper bound for the quantity picker.
    pub quantity_limit: u32,
}

/// Lists products matching a query.
///
/// ## Arguments
/// * `query` - Filters and sort order; an empty query lists everything in
///   featured order
///
/// ## Returns
/// Matching products and the catalog's categories
pub fn list_products(catalog: &dyn ProductCatalog, mut query: ProductQuery) -> ApiResult<ProductListResponse> {
    let start = Instant::now();

    if let Some(search) = query.search.take() {
        let search = validate_search_query(&search)?;
        query.search = (!search.is_empty()).then_some(search);
    }

    debug!(
        categories = ?query.categories,
        search = ?query.search,
        sort = %query.sort,
        "list_products command"
    );

    let products = catalog.query(&query);

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = products.len(),
        "list_products complete"
    );

    Ok(ProductListResponse {
        total: products.len(),
        products,
        categories: catalog.categories(),
    })
}

/// Gets a single product for its detail page.
///
/// ## Returns
/// The product if found, or `NOT_FOUND`
pub fn get_product(catalog: &dyn ProductCatalog, id: &ProductId) -> ApiResult<ProductDetail> {
    debug!(id = %id, "get_product command");

    let product = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Product", id.as_str()))?;

    Ok(ProductDetail {
        quantity_limit: quantity_limit(&product),
        product,
    })
}

/// Products in the same category, excluding the one being viewed.
///
/// ## Arguments
/// * `id` - Product being viewed
/// * `limit` - Maximum results (default: 4)
pub fn similar_products(
    catalog: &dyn ProductCatalog,
    id: &ProductId,
    limit: Option<usize>,
) -> ApiResult<Vec<Product>> {
    let limit = limit.unwrap_or(SIMILAR_PRODUCTS_LIMIT);
    debug!(id = %id, limit = %limit, "similar_products command");

    if catalog.get(id).is_none() {
        return Err(ApiError::not_found("Product", id.as_str()));
    }

    Ok(catalog.similar(id, limit))
}

/// Products flagged for the home page, in catalog order.
pub fn featured_products(catalog: &dyn ProductCatalog) -> Vec<Product> {
    debug!("featured_products command");

    catalog
        .products()
        .iter()
        .filter(|p| p.is_featured.unwrap_or(false))
        .take(FEATURED_PRODUCTS_LIMIT)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::fixtures::fixture_catalog;
    use medwear_core::catalog::SortOrder;
    use medwear_core::Money;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_list_everything() {
        let response = list_products(&fixture_catalog(), ProductQuery::new()).unwrap();
        assert_eq!(response.total, 8);
        assert_eq!(ids(&response.products), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(response.categories.len(), 4);
    }

    #[test]
    fn test_facets_and_sort() {
        let query = ProductQuery::new()
            .category("Scrub Tops")
            .color("Navy")
            .sort(SortOrder::PriceAsc);

        let response = list_products(&fixture_catalog(), query).unwrap();

        // Fitted Scrub Top has no Navy
        assert_eq!(ids(&response.products), vec!["7", "1"]);
    }

    #[test]
    fn test_price_range_inclusive() {
        let query = ProductQuery::new()
            .price_range(Some(Money::from_dollars(42.99)), Some(Money::from_dollars(59.99)))
            .sort(SortOrder::PriceDesc);

        let response = list_products(&fixture_catalog(), query).unwrap();
        assert_eq!(ids(&response.products), vec!["3", "5", "2"]);
    }

    #[test]
    fn test_search_is_trimmed() {
        let response =
            list_products(&fixture_catalog(), ProductQuery::new().search("  LAB coat ")).unwrap();
        assert_eq!(ids(&response.products), vec!["3", "6"]);

        let blank = list_products(&fixture_catalog(), ProductQuery::new().search("   ")).unwrap();
        assert_eq!(blank.total, 8);
    }

    #[test]
    fn test_search_too_long() {
        let err = list_products(&fixture_catalog(), ProductQuery::new().search("x".repeat(101)))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_rating_sort_is_stable() {
        let query = ProductQuery::new().sort(SortOrder::Rating);
        let response = list_products(&fixture_catalog(), query).unwrap();
        assert_eq!(&ids(&response.products)[..3], &["2", "6", "8"]);
    }

    #[test]
    fn test_get_product() {
        let catalog = fixture_catalog();

        let detail = get_product(&catalog, &ProductId::new("2")).unwrap();
        assert_eq!(detail.product.name, "Jogger-Style Scrub Pants");
        assert_eq!(detail.quantity_limit, 18);

        let err = get_product(&catalog, &ProductId::new("42")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_similar_products() {
        let catalog = fixture_catalog();

        let similar = similar_products(&catalog, &ProductId::new("1"), None).unwrap();
        assert_eq!(ids(&similar), vec!["4", "7"]);

        let one = similar_products(&catalog, &ProductId::new("1"), Some(1)).unwrap();
        assert_eq!(ids(&one), vec!["4"]);

        let alone = similar_products(&catalog, &ProductId::new("8"), None).unwrap();
        assert!(alone.is_empty());

        assert!(similar_products(&catalog, &ProductId::new("42"), None).is_err());
    }

    #[test]
    fn test_featured_products() {
        let featured = featured_products(&fixture_catalog());
        assert_eq!(ids(&featured), vec!["1", "2", "3", "4"]);
    }
}
