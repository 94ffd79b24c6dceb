//! # Checkout Module
//!
//! The three-step checkout state machine and the forms submitted at each
//! step. The simulated payment delay and the cart clearing live in the
//! storefront app; this module only decides which moves are legal.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Flow                                      │
//! │                                                                         │
//! │   start (cart not empty)                                               │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   ┌──────────────┐  submit_shipping   ┌──────────────┐                  │
//! │   │ ShippingInfo │ ─────────────────► │   Payment    │                  │
//! │   │              │ ◄───────────────── │              │                  │
//! │   └──────────────┘  back_to_shipping  └──────┬───────┘                  │
//! │                                              │ complete                 │
//! │                                              ▼                          │
//! │                                       ┌──────────────┐                  │
//! │                                       │ Confirmation │  (terminal)      │
//! │                                       └──────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_email, validate_required};

// =============================================================================
// Steps
// =============================================================================

/// Where the shopper is in the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutStep {
    ShippingInfo,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// 1-based position shown in the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::ShippingInfo => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStep::ShippingInfo => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Forms
// =============================================================================

fn default_country() -> String {
    "US".to_string()
}

fn default_true() -> bool {
    true
}

/// Contact and delivery details from the first checkout step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    #[serde(default = "default_country")]
    pub country: String,

    pub phone: String,

    /// Billing address is the shipping address.
    #[serde(default = "default_true")]
    pub same_as_shipping: bool,
}

impl ShippingDetails {
    /// Checks required fields and the email format.
    pub fn validate(&self) -> CoreResult<()> {
        validate_email(&self.email)?;

        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("phone", &self.phone),
        ];
        for (field, value) in required {
            validate_required(field, value)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Card,
    PayPal,
}

/// Payment form from the second checkout step.
///
/// Card fields are only required when paying by card. Nothing is charged;
/// the details are checked and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentDetails {
    #[serde(default)]
    pub method: PaymentMethod,

    #[serde(default)]
    pub card_number: String,

    #[serde(default)]
    pub card_name: String,

    #[serde(default)]
    pub card_expiry: String,

    #[serde(default)]
    pub card_cvc: String,
}

impl PaymentDetails {
    pub fn paypal() -> Self {
        PaymentDetails {
            method: PaymentMethod::PayPal,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.method == PaymentMethod::Card {
            validate_required("cardNumber", &self.card_number)?;
            validate_required("cardName", &self.card_name)?;
            validate_required("cardExpiry", &self.card_expiry)?;
            validate_required("cardCvc", &self.card_cvc)?;
        }
        Ok(())
    }
}

// =============================================================================
// Checkout Flow
// =============================================================================

/// The checkout state machine for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    shipping: Option<ShippingDetails>,
    payment_method: Option<PaymentMethod>,
}

impl CheckoutFlow {
    /// Enters checkout. Fails with [`CoreError::EmptyCart`] for an empty cart.
    pub fn start(cart: &Cart) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(CheckoutFlow {
            step: CheckoutStep::ShippingInfo,
            shipping: None,
            payment_method: None,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Shipping details accepted in the first step.
    pub fn shipping(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Confirmation
    }

    /// Whether a checkout view should send the shopper back to the cart.
    ///
    /// An empty cart is expected on the confirmation step, since completing
    /// the order clears it.
    pub fn requires_redirect(&self, cart: &Cart) -> bool {
        cart.is_empty() && self.step != CheckoutStep::Confirmation
    }

    /// ShippingInfo → Payment.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> CoreResult<()> {
        self.expect_step(CheckoutStep::ShippingInfo, "submit shipping details")?;
        details.validate()?;

        self.shipping = Some(details);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Payment → ShippingInfo. Keeps the submitted details for editing.
    pub fn back_to_shipping(&mut self) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment, "go back to shipping")?;
        self.step = CheckoutStep::ShippingInfo;
        Ok(())
    }

    /// Checks a payment submission without moving the flow.
    ///
    /// The app calls this before the simulated payment delay, then
    /// [`CheckoutFlow::complete`] once the delay has elapsed.
    pub fn authorize_payment(&self, details: &PaymentDetails) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment, "submit payment")?;
        details.validate()
    }

    /// Payment → Confirmation.
    pub fn complete(&mut self, details: &PaymentDetails) -> CoreResult<()> {
        self.authorize_payment(details)?;
        self.payment_method = Some(details.method);
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }

    fn expect_step(&self, expected: CheckoutStep, action: &str) -> CoreResult<()> {
        if self.step != expected {
            return Err(CoreError::InvalidCheckoutTransition {
                from: self.step.to_string(),
                action: action.to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
