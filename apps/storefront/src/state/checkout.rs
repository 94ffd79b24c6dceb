//! # Checkout State
//!
//! Session state for the order in progress: the step machine and the
//! applied promo code.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Lifecycle                              │
//! │                                                                         │
//! │   start()          submit_shipping()       submit_payment()             │
//! │      │                    │                       │                     │
//! │      ▼                    ▼                       ▼                     │
//! │  ┌──────────┐  valid  ┌──────────┐  valid  ┌──────────────┐            │
//! │  │ Shipping │────────►│ Payment  │────────►│ (delay 1.5s) │            │
//! │  │   Info   │◄────────│          │         └──────┬───────┘            │
//! │  └──────────┘  back   └──────────┘                │                     │
//! │                                                   ▼                     │
//! │                                          ┌──────────────┐               │
//! │                                          │ Confirmation │ cart cleared  │
//! │                                          │  (terminal)  │ promo cleared │
//! │                                          └──────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flow lock is held across the payment delay, so a second payment
//! submitted while the first is pending waits and then fails with an
//! invalid transition instead of placing a second order.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use medwear_core::checkout::{
    CheckoutFlow, CheckoutStep, PaymentDetails, PaymentMethod, ShippingDetails,
};
use medwear_core::{CoreError, CoreResult, OrderTotals, PricingPolicy, PromoSlot, Promotion};

use super::cart::CartStore;

/// Receipt for a completed order.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderConfirmation {
    /// Shown to the shopper, e.g. "KM482913".
    pub order_number: String,

    #[ts(type = "string")]
    pub placed_at: DateTime<Utc>,

    /// Figures for the lines that were ordered.
    pub totals: OrderTotals,

    pub item_count: u64,

    pub payment_method: PaymentMethod,
}

/// The order in progress.
#[derive(Debug, Default)]
pub struct CheckoutState {
    flow: Mutex<Option<CheckoutFlow>>,
    promo: Mutex<PromoSlot>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState::default()
    }

    // =========================================================================
    // Promo Code
    // =========================================================================

    /// Applies a promo code to the current order.
    pub async fn apply_promo(&self, policy: &PricingPolicy, code: &str) -> CoreResult<Promotion> {
        let mut slot = self.promo.lock().await;
        let promotion = slot.apply(policy, code)?.clone();
        info!(code = %promotion.code, bps = promotion.discount_bps, "Promo code applied");
        Ok(promotion)
    }

    /// The applied promo code, if any.
    pub async fn promo_code(&self) -> Option<String> {
        self.promo.lock().await.applied().map(str::to_string)
    }

    /// Current totals for the cart with the applied promo.
    pub async fn totals(&self, cart: &CartStore, policy: &PricingPolicy) -> OrderTotals {
        let promo = self.promo_code().await;
        policy.calculate(cart.cart_total().await, promo.as_deref())
    }

    // =========================================================================
    // Steps
    // =========================================================================

    /// Enters checkout at the shipping step, replacing any previous flow.
    pub async fn start(&self, cart: &CartStore) -> CoreResult<CheckoutStep> {
        let flow = cart.with_cart(CheckoutFlow::start).await?;
        let step = flow.step();
        *self.flow.lock().await = Some(flow);
        debug!("Checkout started");
        Ok(step)
    }

    /// The current step, or `None` outside checkout.
    pub async fn step(&self) -> Option<CheckoutStep> {
        self.flow.lock().await.as_ref().map(CheckoutFlow::step)
    }

    /// Shipping details accepted so far, for pre-filling the form.
    pub async fn shipping(&self) -> Option<ShippingDetails> {
        self.flow
            .lock()
            .await
            .as_ref()
            .and_then(|flow| flow.shipping().cloned())
    }

    /// Whether a checkout view should send the shopper back to the cart.
    pub async fn requires_redirect(&self, cart: &CartStore) -> bool {
        let flow = self.flow.lock().await;
        match flow.as_ref() {
            Some(flow) => cart.with_cart(|c| flow.requires_redirect(c)).await,
            None => cart.is_empty().await,
        }
    }

    pub async fn submit_shipping(
        &self,
        cart: &CartStore,
        details: ShippingDetails,
    ) -> CoreResult<CheckoutStep> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_started("submit shipping details"))?;
        if cart.is_empty().await {
            return Err(CoreError::EmptyCart);
        }
        flow.submit_shipping(details)?;
        Ok(flow.step())
    }

    pub async fn back_to_shipping(&self) -> CoreResult<CheckoutStep> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_started("go back to shipping"))?;
        flow.back_to_shipping()?;
        Ok(flow.step())
    }

    /// Runs the simulated payment and places the order.
    ///
    /// ## Sequence
    /// 1. Check the payment details against the Payment step
    /// 2. Refuse an empty cart
    /// 3. Wait `delay` (nothing is charged)
    /// 4. Drain the cart and total exactly what was drained
    /// 5. Move to Confirmation and clear the promo slot
    ///
    /// A cart emptied during the delay fails with `EmptyCart` and the flow
    /// stays at Payment.
    pub async fn submit_payment(
        &self,
        cart: &CartStore,
        policy: &PricingPolicy,
        details: &PaymentDetails,
        delay: Duration,
    ) -> CoreResult<OrderConfirmation> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_started("submit payment"))?;

        flow.authorize_payment(details)?;
        if cart.is_empty().await {
            return Err(CoreError::EmptyCart);
        }

        debug!(delay_ms = delay.as_millis() as u64, "Processing payment");
        tokio::time::sleep(delay).await;

        let ordered = cart.take().await;
        if ordered.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        flow.complete(details)?;

        let mut promo = self.promo.lock().await;
        let totals = policy.calculate(ordered.cart_total(), promo.applied());
        promo.clear();

        let confirmation = OrderConfirmation {
            order_number: order_number(),
            placed_at: Utc::now(),
            totals,
            item_count: ordered.item_count(),
            payment_method: details.method,
        };

        info!(
            order_number = %confirmation.order_number,
            items = confirmation.item_count,
            total = %confirmation.totals.total,
            "Order placed"
        );

        Ok(confirmation)
    }

}

fn not_started(action: &'static str) -> impl FnOnce() -> CoreError {
    move || CoreError::InvalidCheckoutTransition {
        from: "cart".to_string(),
        action: action.to_string(),
    }
}

/// "KM" followed by six digits.
fn order_number() -> String {
    format!("KM{:06}", Uuid::new_v4().as_u128() % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwear_core::{Money, NewCartLine, Product};
    use medwear_store::{LocalStorage, MemoryStorage};
    use std::sync::Arc;

    fn lab_coat() -> Product {
        Product::new("5", "Professional Lab Coat", Money::from_dollars(50.0), "Lab Coats")
            .with_colors(["White"])
            .with_sizes(["S", "M", "L"])
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            email: "nurse@example.com".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Rivera".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
            phone: "555-0100".to_string(),
            same_as_shipping: true,
        }
    }

    fn card() -> PaymentDetails {
        PaymentDetails {
            method: PaymentMethod::Card,
            card_number: "4242 4242 4242 4242".to_string(),
            card_name: "Sam Rivera".to_string(),
            card_expiry: "12/30".to_string(),
            card_cvc: "123".to_string(),
        }
    }

    async fn cart_with(storage: Arc<MemoryStorage>, qty: u32) -> CartStore {
        let cart = CartStore::hydrate(storage, "cart").await;
        cart.add_to_cart(NewCartLine::new(lab_coat(), qty, "White", "M"))
            .await;
        cart
    }

    #[tokio::test]
    async fn test_start_requires_items() {
        let cart = CartStore::hydrate(Arc::new(MemoryStorage::new()), "cart").await;
        let checkout = CheckoutState::new();

        assert!(matches!(checkout.start(&cart).await, Err(CoreError::EmptyCart)));
        assert_eq!(checkout.step().await, None);
        assert!(checkout.requires_redirect(&cart).await);
    }

    #[tokio::test]
    async fn test_forward_and_back() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();

        assert_eq!(checkout.start(&cart).await.unwrap(), CheckoutStep::ShippingInfo);
        assert_eq!(
            checkout.submit_shipping(&cart, shipping()).await.unwrap(),
            CheckoutStep::Payment
        );
        assert_eq!(
            checkout.back_to_shipping().await.unwrap(),
            CheckoutStep::ShippingInfo
        );
        assert_eq!(checkout.shipping().await.unwrap().city, "Springfield");
        assert!(checkout.back_to_shipping().await.is_err());
    }

    #[tokio::test]
    async fn test_steps_before_start_fail() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        let err = checkout.submit_shipping(&cart, shipping()).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidCheckoutTransition { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_places_order() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = cart_with(storage.clone(), 2).await;
        let checkout = CheckoutState::new();
        let policy = PricingPolicy::default();

        checkout.apply_promo(&policy, "welcome10").await.unwrap();
        checkout.start(&cart).await.unwrap();
        checkout.submit_shipping(&cart, shipping()).await.unwrap();

        let before = tokio::time::Instant::now();
        let confirmation = checkout
            .submit_payment(&cart, &policy, &card(), Duration::from_millis(1500))
            .await
            .unwrap();
        assert!(before.elapsed() >= Duration::from_millis(1500));

        // 100.00 - 10% = 90.00, free shipping, 8% tax on 90.00
        assert_eq!(confirmation.item_count, 2);
        assert_eq!(confirmation.totals.total.to_string(), "$97.20");
        assert_eq!(confirmation.totals.promo_code.as_deref(), Some("WELCOME10"));
        assert!(confirmation.order_number.starts_with("KM"));
        assert_eq!(confirmation.order_number.len(), 8);

        assert_eq!(checkout.step().await, Some(CheckoutStep::Confirmation));
        assert!(!checkout.requires_redirect(&cart).await);
        assert!(cart.is_empty().await);
        assert_eq!(storage.get_item("cart").await.unwrap(), None);
        assert_eq!(checkout.promo_code().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_payment_keeps_cart() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        checkout.start(&cart).await.unwrap();
        checkout.submit_shipping(&cart, shipping()).await.unwrap();

        let mut details = card();
        details.card_cvc.clear();
        let result = checkout
            .submit_payment(&cart, &PricingPolicy::default(), &details, Duration::from_millis(1500))
            .await;

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(checkout.step().await, Some(CheckoutStep::Payment));
        assert_eq!(cart.item_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_emptied_during_checkout() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        let policy = PricingPolicy::default();
        let key = medwear_core::LineKey::new("5", "White", "M");
        checkout.start(&cart).await.unwrap();

        cart.remove_from_cart(&key).await;
        assert!(matches!(
            checkout.submit_shipping(&cart, shipping()).await,
            Err(CoreError::EmptyCart)
        ));
        assert!(checkout.requires_redirect(&cart).await);

        cart.add_to_cart(NewCartLine::new(lab_coat(), 1, "White", "M")).await;
        checkout.submit_shipping(&cart, shipping()).await.unwrap();
        cart.clear_cart().await;

        let result = checkout
            .submit_payment(&cart, &policy, &PaymentDetails::paypal(), Duration::from_millis(1500))
            .await;
        assert!(matches!(result, Err(CoreError::EmptyCart)));
        assert_eq!(checkout.step().await, Some(CheckoutStep::Payment));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_emptied_while_paying() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        let policy = PricingPolicy::default();
        checkout.start(&cart).await.unwrap();
        checkout.submit_shipping(&cart, shipping()).await.unwrap();

        let details = card();
        let (result, _) = tokio::join!(
            checkout.submit_payment(&cart, &policy, &details, Duration::from_millis(1500)),
            async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                cart.clear_cart().await;
            },
        );

        assert!(matches!(result, Err(CoreError::EmptyCart)));
        assert_eq!(checkout.step().await, Some(CheckoutStep::Payment));
        assert_eq!(checkout.promo_code().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paypal_skips_card_fields() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        checkout.start(&cart).await.unwrap();
        checkout.submit_shipping(&cart, shipping()).await.unwrap();

        let confirmation = checkout
            .submit_payment(
                &cart,
                &PricingPolicy::default(),
                &PaymentDetails::paypal(),
                Duration::from_millis(1500),
            )
            .await
            .unwrap();

        assert_eq!(confirmation.payment_method, PaymentMethod::PayPal);
        // 50.00 is under the free shipping threshold
        assert_eq!(confirmation.totals.total.to_string(), "$58.99");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_payment_rejected() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        let policy = PricingPolicy::default();
        checkout.start(&cart).await.unwrap();
        checkout.submit_shipping(&cart, shipping()).await.unwrap();

        let delay = Duration::from_millis(1500);
        let (details_a, details_b) = (card(), card());
        let (first, second) = tokio::join!(
            checkout.submit_payment(&cart, &policy, &details_a, delay),
            checkout.submit_payment(&cart, &policy, &details_b, delay),
        );

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(CoreError::InvalidCheckoutTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_promo_single_shot() {
        let checkout = CheckoutState::new();
        let policy = PricingPolicy::default();

        assert!(matches!(
            checkout.apply_promo(&policy, "SAVE50").await,
            Err(CoreError::UnknownPromoCode(_))
        ));
        assert!(matches!(
            checkout.apply_promo(&policy, " welcome10 ").await,
            Err(CoreError::UnknownPromoCode(_))
        ));
        assert_eq!(checkout.promo_code().await, None);

        checkout.apply_promo(&policy, "Welcome10").await.unwrap();
        assert!(matches!(
            checkout.apply_promo(&policy, "welcome10").await,
            Err(CoreError::PromoAlreadyApplied { .. })
        ));
        assert_eq!(checkout.promo_code().await.as_deref(), Some("WELCOME10"));
    }

    #[tokio::test]
    async fn test_totals_follow_cart() {
        let cart = cart_with(Arc::new(MemoryStorage::new()), 1).await;
        let checkout = CheckoutState::new();
        let policy = PricingPolicy::default();

        let totals = checkout.totals(&cart, &policy).await;
        assert_eq!(totals.shipping.to_string(), "$4.99");

        cart.update_quantity(&medwear_core::LineKey::new("5", "White", "M"), 2)
            .await;
        let totals = checkout.totals(&cart, &policy).await;
        assert!(totals.shipping.is_zero());
    }
}
