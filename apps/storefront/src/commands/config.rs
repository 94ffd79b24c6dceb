//! # Config Commands
//!
//! Commands for retrieving storefront configuration.

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use medwear_core::PricingPolicy;

use crate::state::StorefrontConfig;

/// The settings the views display. Storage details stay on the backend.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConfigResponse {
    pub store_name: String,
    pub currency_symbol: String,
    pub pricing: PricingPolicy,
    pub payment_delay_ms: u64,
}

/// Gets the current storefront configuration.
///
/// ## When Used
/// - App startup (header, currency formatting)
/// - "Free shipping on orders over $75" banners
///
/// ## Returns
/// Display-relevant configuration (read-only)
pub fn get_config(config: &StorefrontConfig) -> ConfigResponse {
    debug!("get_config command");

    ConfigResponse {
        store_name: config.store_name.clone(),
        currency_symbol: config.currency_symbol.clone(),
        pricing: config.pricing_policy(),
        payment_delay_ms: config.checkout.payment_delay_ms,
    }
}
