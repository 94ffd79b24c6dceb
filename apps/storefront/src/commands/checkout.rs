//! # Checkout Commands
//!
//! Order summary, promo codes and the three checkout steps.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use ts_rs::TS;

use medwear_core::checkout::{CheckoutStep, PaymentDetails, ShippingDetails};
use medwear_core::{OrderTotals, PricingPolicy};

use crate::error::ApiResult;
use crate::state::{CartStore, CheckoutState, OrderConfirmation};

/// Figures for the order summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSummary {
    pub item_count: u64,
    pub totals: OrderTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StepResponse {
    pub step: CheckoutStep,

    /// 1-based, for the progress indicator.
    pub step_number: u8,
}

impl From<CheckoutStep> for StepResponse {
    fn from(step: CheckoutStep) -> Self {
        StepResponse {
            step,
            step_number: step.number(),
        }
    }
}

/// Where the checkout page stands when it loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutStatus {
    #[ts(optional)]
    pub step: Option<CheckoutStep>,

    /// The cart is empty and no order was just placed: go back to the cart.
    pub requires_redirect: bool,
}

/// Current totals for the cart and the applied promo.
pub async fn order_summary(
    checkout: &CheckoutState,
    cart: &CartStore,
    policy: &PricingPolicy,
) -> OrderSummary {
    debug!("order_summary command");

    OrderSummary {
        item_count: cart.item_count().await,
        totals: checkout.totals(cart, policy).await,
    }
}

/// Applies a promo code and returns the updated summary.
///
/// ## Errors
/// - `PROMO_ERROR`: unknown code, or a code is already applied
/// - `VALIDATION_ERROR`: blank input
pub async fn apply_promo(
    checkout: &CheckoutState,
    cart: &CartStore,
    policy: &PricingPolicy,
    code: &str,
) -> ApiResult<OrderSummary> {
    debug!(code = %code, "apply_promo command");

    checkout.apply_promo(policy, code).await?;
    Ok(order_summary(checkout, cart, policy).await)
}

pub async fn checkout_status(checkout: &CheckoutState, cart: &CartStore) -> CheckoutStatus {
    debug!("checkout_status command");

    CheckoutStatus {
        step: checkout.step().await,
        requires_redirect: checkout.requires_redirect(cart).await,
    }
}

/// Enters checkout at the shipping step. Fails with `CHECKOUT_ERROR` when
/// the cart is empty.
pub async fn start_checkout(checkout: &CheckoutState, cart: &CartStore) -> ApiResult<StepResponse> {
    debug!("start_checkout command");

    Ok(checkout.start(cart).await?.into())
}

/// Accepts the shipping form. Fails with `CHECKOUT_ERROR` when the cart
/// was emptied after checkout started.
pub async fn submit_shipping(
    checkout: &CheckoutState,
    cart: &CartStore,
    details: ShippingDetails,
) -> ApiResult<StepResponse> {
    debug!(email = %details.email, country = %details.country, "submit_shipping command");

    Ok(checkout.submit_shipping(cart, details).await?.into())
}

pub async fn back_to_shipping(checkout: &CheckoutState) -> ApiResult<StepResponse> {
    debug!("back_to_shipping command");

    Ok(checkout.back_to_shipping().await?.into())
}

/// Places the order.
///
/// Resolves after the simulated payment delay with the order confirmation.
/// The cart and the promo code are cleared.
pub async fn submit_payment(
    checkout: &CheckoutState,
    cart: &CartStore,
    policy: &PricingPolicy,
    details: PaymentDetails,
    delay: Duration,
) -> ApiResult<OrderConfirmation> {
    debug!(method = ?details.method, "submit_payment command");

    let confirmation = checkout
        .submit_payment(cart, policy, &details, delay)
        .await?;

    info!(order_number = %confirmation.order_number, "submit_payment complete");
    Ok(confirmation)
}
