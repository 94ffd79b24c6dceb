//! # Pricing Module
//!
//! Derives the order totals from the cart total and an optional promo code.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Totals Pipeline                              │
//! │                                                                         │
//! │  cartTotal ─────────────────────────────────────────► subtotal          │
//! │      │                                                                  │
//! │      ├── promo matches? ── × discount bps ──────────► discount          │
//! │      │                                                                  │
//! │      ├── cartTotal ≥ threshold? ── 0 : flat fee ────► shipping          │
//! │      │   (pre-discount)                                                 │
//! │      │                                                                  │
//! │      └── (cartTotal − discount) × tax rate ─────────► tax               │
//! │          (post-discount)                                                │
//! │                                                                         │
//! │  total = subtotal − discount + shipping + tax                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shipping eligibility looks at the total before the discount while tax is
//! charged on the total after it. An order of $80 with WELCOME10 ships free
//! even though the shopper pays $72 for the goods.
//!
//! Nothing here rounds. See [`crate::money`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::TaxRate;
use crate::{
    DEFAULT_TAX_RATE, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, WELCOME_PROMO_BPS,
    WELCOME_PROMO_CODE,
};

// =============================================================================
// Promotions
// =============================================================================

/// A promo code and the share of the cart total it takes off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promotion {
    /// Code as entered by shoppers; matched case-insensitively.
    pub code: String,

    /// Discount in basis points (1000 = 10%).
    #[serde(alias = "discount_bps")]
    pub discount_bps: u32,
}

impl Promotion {
    pub fn new(code: impl Into<String>, discount_bps: u32) -> Self {
        Promotion {
            code: code.into(),
            discount_bps,
        }
    }

    /// The storefront's welcome promotion: WELCOME10, 10% off.
    pub fn welcome() -> Self {
        Promotion::new(WELCOME_PROMO_CODE, WELCOME_PROMO_BPS)
    }

    /// Case-insensitive match against an entered code.
    pub fn matches(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.to_lowercase()
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// The business constants the totals are derived from.
///
/// ## Defaults
/// | Setting                 | Value              |
/// |-------------------------|--------------------|
/// | free shipping threshold | $75.00             |
/// | flat shipping fee       | $4.99              |
/// | tax rate                | 8% (800 bps)       |
/// | promotions              | WELCOME10 → 10%    |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingPolicy {
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
    pub tax_rate: TaxRate,
    pub promotions: Vec<Promotion>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: FLAT_SHIPPING_FEE,
            tax_rate: DEFAULT_TAX_RATE,
            promotions: vec![Promotion::welcome()],
        }
    }
}

impl PricingPolicy {
    /// Finds the promotion an entered code refers to.
    pub fn find_promotion(&self, code: &str) -> Option<&Promotion> {
        self.promotions.iter().find(|p| p.matches(code))
    }

    /// Shipping fee, decided on the pre-discount total.
    pub fn shipping(&self, cart_total: Money) -> Money {
        if cart_total >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_fee
        }
    }

    /// Derives all order totals.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    /// use medwear_core::pricing::PricingPolicy;
    ///
    /// let totals = PricingPolicy::default().calculate(Money::from_dollars(50.0), None);
    /// assert_eq!(totals.shipping.to_string(), "$4.99");
    /// assert_eq!(totals.tax.to_string(), "$4.00");
    /// assert_eq!(totals.total.to_string(), "$58.99");
    /// ```
    pub fn calculate(&self, cart_total: Money, promo_code: Option<&str>) -> OrderTotals {
        let promotion = promo_code.and_then(|code| self.find_promotion(code));
        let discount = promotion
            .map(|promo| cart_total.portion_bps(promo.discount_bps))
            .unwrap_or_default();
        let shipping = self.shipping(cart_total);
        let tax = (cart_total - discount).calculate_tax(self.tax_rate);

        OrderTotals {
            subtotal: cart_total,
            discount,
            shipping,
            tax,
            total: cart_total - discount + shipping + tax,
            promo_code: promotion.map(|p| p.code.clone()),
        }
    }
}

/// Derives order totals with the default policy.
pub fn calculate_totals(cart_total: Money, promo_code: Option<&str>) -> OrderTotals {
    PricingPolicy::default().calculate(cart_total, promo_code)
}

// =============================================================================
// Order Totals
// =============================================================================

/// Derived order figures. Recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,

    /// Canonical code of the promotion that applied, if any.
    pub promo_code: Option<String>,
}

// =============================================================================
// Promo Slot
// =============================================================================

/// Holds the promo code applied to the current order.
///
/// Single-shot: once a code is applied, further codes are refused until the
/// slot is cleared (which happens when the order completes).
///
/// ## User Workflow
/// ```text
/// Cart page: "Promo code" field
///      │
///      ▼
/// apply("welcome10")
///      │
///      ├── slot occupied?  → PromoAlreadyApplied
///      ├── blank input?    → Validation(Required)
///      ├── unknown code?   → UnknownPromoCode (slot stays empty)
///      │
///      └── OK → slot holds "WELCOME10"; totals show the discount
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoSlot {
    applied: Option<String>,
}

impl PromoSlot {
    pub fn new() -> Self {
        PromoSlot::default()
    }

    /// Applies an entered code. Returns the promotion that now applies.
    pub fn apply<'p>(&mut self, policy: &'p PricingPolicy, code: &str) -> CoreResult<&'p Promotion> {
        if let Some(applied) = &self.applied {
            return Err(CoreError::PromoAlreadyApplied {
                applied: applied.clone(),
            });
        }

        if code.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "promoCode".to_string(),
            }
            .into());
        }

        let promotion = policy
            .find_promotion(code)
            .ok_or_else(|| CoreError::UnknownPromoCode(code.to_string()))?;

        self.applied = Some(promotion.code.clone());
        Ok(promotion)
    }

    /// The applied code, if any.
    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    pub fn is_applied(&self) -> bool {
        self.applied.is_some()
    }

    pub fn clear(&mut self) {
        self.applied = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_promo_with_free_shipping() {
        let totals = calculate_totals(Money::from_dollars(100.0), Some("WELCOME10"));

        assert_eq!(totals.subtotal.rounded_cents(), 10000);
        assert_eq!(totals.discount.rounded_cents(), 1000);
        assert!(totals.shipping.is_zero());
        assert_eq!(totals.tax.rounded_cents(), 720);
        assert_eq!(totals.total.rounded_cents(), 9720);
        assert_eq!(totals.promo_code.as_deref(), Some("WELCOME10"));
    }

    #[test]
    fn test_below_threshold_no_promo() {
        let totals = calculate_totals(Money::from_dollars(50.0), None);

        assert!(totals.discount.is_zero());
        assert_eq!(totals.shipping.rounded_cents(), 499);
        assert_eq!(totals.tax.rounded_cents(), 400);
        assert_eq!(totals.total.rounded_cents(), 5899);
        assert_eq!(totals.promo_code, None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let totals = calculate_totals(Money::from_dollars(75.0), None);
        assert!(totals.shipping.is_zero());

        let totals = calculate_totals(Money::from_dollars(74.99), None);
        assert_eq!(totals.shipping.rounded_cents(), 499);
    }

    #[test]
    fn test_shipping_uses_pre_discount_total() {
        // $80 - 10% = $72 for the goods, still ships free
        let totals = calculate_totals(Money::from_dollars(80.0), Some("welcome10"));
        assert!(totals.shipping.is_zero());
        assert_eq!(totals.tax.rounded_cents(), 576);
    }

    #[test]
    fn test_promo_case_insensitive() {
        for code in ["welcome10", "WELCOME10", "Welcome10", "wElCoMe10"] {
            let totals = calculate_totals(Money::from_dollars(100.0), Some(code));
            assert_eq!(totals.discount.rounded_cents(), 1000, "code {code}");
        }

        for code in ["welcome", "WELCOME20", "", " welcome10"] {
            let totals = calculate_totals(Money::from_dollars(100.0), Some(code));
            assert!(totals.discount.is_zero(), "code {code:?}");
        }
    }

    #[test]
    fn test_empty_cart() {
        let totals = calculate_totals(Money::zero(), Some("WELCOME10"));

        assert!(totals.discount.is_zero());
        assert_eq!(totals.shipping.rounded_cents(), 499);
        assert!(totals.tax.is_zero());
        assert_eq!(totals.total.rounded_cents(), 499);
    }

    #[test]
    fn test_full_precision_until_display() {
        let totals = calculate_totals(Money::from_dollars(29.99), Some("WELCOME10"));

        // tax is charged on 26.991, not on a rounded 26.99
        assert!((totals.tax.dollars() - 26.991 * 0.08).abs() < 1e-9);
        assert_eq!(totals.total.to_string(), "$34.14");
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            free_shipping_threshold: Money::from_dollars(50.0),
            flat_shipping_fee: Money::from_dollars(7.5),
            tax_rate: TaxRate::zero(),
            promotions: vec![Promotion::new("STAFF25", 2500)],
        };

        let totals = policy.calculate(Money::from_dollars(40.0), Some("staff25"));
        assert_eq!(totals.discount.rounded_cents(), 1000);
        assert_eq!(totals.shipping.rounded_cents(), 750);
        assert!(totals.tax.is_zero());
        assert_eq!(totals.total.rounded_cents(), 3750);

        assert!(policy.calculate(Money::from_dollars(40.0), Some("WELCOME10")).discount.is_zero());
    }

    #[test]
    fn test_promo_slot_single_shot() {
        let policy = PricingPolicy::default();
        let mut slot = PromoSlot::new();

        let promo = slot.apply(&policy, "welcome10").unwrap();
        assert_eq!(promo.code, "WELCOME10");
        assert_eq!(slot.applied(), Some("WELCOME10"));

        let err = slot.apply(&policy, "WELCOME10").unwrap_err();
        assert!(matches!(err, CoreError::PromoAlreadyApplied { .. }));

        slot.clear();
        assert!(!slot.is_applied());
    }

    #[test]
    fn test_promo_slot_rejects_bad_codes() {
        let policy = PricingPolicy::default();
        let mut slot = PromoSlot::new();

        let err = slot.apply(&policy, "   ").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));

        let err = slot.apply(&policy, "FREESTUFF").unwrap_err();
        assert!(matches!(err, CoreError::UnknownPromoCode(_)));
        assert!(!slot.is_applied());
    }

    #[test]
    fn test_promo_slot_matches_like_calculate() {
        let policy = PricingPolicy::default();
        let mut slot = PromoSlot::new();

        // Padding is not stripped, same as calculate()
        let err = slot.apply(&policy, " welcome10 ").unwrap_err();
        assert!(matches!(err, CoreError::UnknownPromoCode(code) if code == " welcome10 "));
        assert!(!slot.is_applied());

        let totals = policy.calculate(Money::from_dollars(100.0), Some(" welcome10 "));
        assert!(totals.discount.is_zero());
    }
}
