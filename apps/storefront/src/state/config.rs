//! # Storefront Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Load Order (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`medwear.toml` in the platform config dir, or `--config`)
//! 3. Environment variables (`MEDWEAR_*`)
//! 4. `validate()`
//!
//! ## Example `medwear.toml`
//! ```toml
//! store_name = "Medwear"
//! currency_symbol = "$"
//!
//! [storage]
//! database_path = "/var/lib/medwear/storefront.db"
//! cart_key = "cart"
//!
//! [pricing]
//! free_shipping_threshold = 75.0
//! flat_shipping_fee = 4.99
//! tax_rate_bps = 800
//!
//! [[pricing.promotions]]
//! code = "WELCOME10"
//! discount_bps = 1000
//!
//! [checkout]
//! payment_delay_ms = 1500
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use medwear_core::validation::{validate_price, validate_required, validate_tax_rate_bps};
use medwear_core::{
    Money, PricingPolicy, Promotion, TaxRate, CART_STORAGE_KEY, DEFAULT_TAX_RATE,
    FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD,
};

use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "medwear.toml";
const DATABASE_FILE_NAME: &str = "storefront.db";

// =============================================================================
// Sections
// =============================================================================

/// Where client state is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. `None` uses the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Key the cart is persisted under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            cart_key: default_cart_key(),
        }
    }
}

/// Pricing constants, in plain numbers so the file stays readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: f64,

    #[serde(default = "default_flat_shipping_fee")]
    pub flat_shipping_fee: f64,

    /// 800 = 8%
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    #[serde(default = "default_promotions")]
    pub promotions: Vec<Promotion>,
}

fn default_free_shipping_threshold() -> f64 {
    FREE_SHIPPING_THRESHOLD.dollars()
}

fn default_flat_shipping_fee() -> f64 {
    FLAT_SHIPPING_FEE.dollars()
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE.bps()
}

fn default_promotions() -> Vec<Promotion> {
    vec![Promotion::welcome()]
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_fee: default_flat_shipping_fee(),
            tax_rate_bps: default_tax_rate_bps(),
            promotions: default_promotions(),
        }
    }
}

/// Simulated checkout behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// How long "processing payment" takes.
    #[serde(default = "default_payment_delay_ms")]
    pub payment_delay_ms: u64,
}

fn default_payment_delay_ms() -> u64 {
    1500
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            payment_delay_ms: default_payment_delay_ms(),
        }
    }
}

// =============================================================================
// Storefront Config
// =============================================================================

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Shown in the header and on order confirmations.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

fn default_store_name() -> String {
    "Medwear".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            store_name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            storage: StorageSettings::default(),
            pricing: PricingSettings::default(),
            checkout: CheckoutSettings::default(),
        }
    }
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_required("store_name", &self.store_name)?;
        validate_required("storage.cart_key", &self.storage.cart_key)?;

        validate_price(Money::from_dollars(self.pricing.free_shipping_threshold))?;
        validate_price(Money::from_dollars(self.pricing.flat_shipping_fee))?;
        validate_tax_rate_bps(self.pricing.tax_rate_bps)?;

        let mut seen: Vec<String> = Vec::new();
        for promo in &self.pricing.promotions {
            validate_required("promotion code", &promo.code)?;
            if promo.discount_bps > 10_000 {
                return Err(ConfigError::Invalid(format!(
                    "promotion {} discounts more than 100%",
                    promo.code
                )));
            }
            let code = promo.code.to_lowercase();
            if seen.contains(&code) {
                return Err(ConfigError::Invalid(format!(
                    "promotion {} is listed twice",
                    promo.code
                )));
            }
            seen.push(code);
        }

        Ok(())
    }

    /// Applies `MEDWEAR_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("MEDWEAR_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("MEDWEAR_CART_KEY") {
            self.storage.cart_key = key;
        }

        if let Some(name) = lookup("MEDWEAR_STORE_NAME") {
            self.store_name = name;
        }

        // Percent, e.g. "8" or "8.25"
        if let Some(rate) = lookup("MEDWEAR_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) if pct.is_finite() && pct >= 0.0 => {
                    debug!(rate = pct, "Overriding tax rate from environment");
                    self.pricing.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid MEDWEAR_TAX_RATE"),
            }
        }

        if let Some(delay) = lookup("MEDWEAR_PAYMENT_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.checkout.payment_delay_ms = ms,
                Err(_) => warn!(delay = %delay, "Ignoring invalid MEDWEAR_PAYMENT_DELAY_MS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "medwear", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The pricing policy these settings describe.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: Money::from_dollars(self.pricing.free_shipping_threshold),
            flat_shipping_fee: Money::from_dollars(self.pricing.flat_shipping_fee),
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps),
            promotions: self.pricing.promotions.clone(),
        }
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.checkout.payment_delay_ms)
    }

    /// The SQLite file to open.
    ///
    /// Without an explicit path this is `storefront.db` in the platform data
    /// dir, which is created if missing.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("com", "medwear", "storefront")
            .ok_or(ConfigError::NoConfigDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// Formats money with the configured symbol, rounded to cents.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::Money;
    /// use medwear_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(Money::from_dollars(97.2)), "$97.20");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.rounded_cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            cents.abs() / 100,
            cents.abs() % 100
        )
    }
}
