//! CLI argument structures
//!
//! The `medwear` binary drives the same commands the storefront views call.
//! The cart lives in the SQLite database, so it carries over between
//! invocations.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use medwear_core::checkout::{PaymentDetails, PaymentMethod, ShippingDetails};

/// Medwear storefront from the command line
#[derive(Debug, Parser)]
#[command(name = "medwear")]
#[command(about = "medwear - browse scrubs, manage the cart and place orders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to medwear.toml in the platform config dir)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep the cart in memory only, for this invocation
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print JSON responses instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List products
    #[command(name = "products")]
    Products {
        /// Only these categories (repeatable)
        #[arg(long)]
        category: Vec<String>,

        /// Only products offered in these colors (repeatable)
        #[arg(long)]
        color: Vec<String>,

        /// Only products offered in these sizes (repeatable)
        #[arg(long)]
        size: Vec<String>,

        /// Lowest price, inclusive
        #[arg(long)]
        min_price: Option<f64>,

        /// Highest price, inclusive
        #[arg(long)]
        max_price: Option<f64>,

        /// Case-insensitive text in the product name
        #[arg(short, long)]
        search: Option<String>,

        /// featured, price-asc, price-desc, name-asc, name-desc, rating or newest
        #[arg(long, default_value = "featured")]
        sort: String,
    },

    /// Show one product with similar products
    #[command(name = "product")]
    Product {
        /// Product id
        id: String,
    },

    /// List featured products
    #[command(name = "featured")]
    Featured,

    /// Show the store configuration
    #[command(name = "config")]
    Config,

    /// Manage the cart
    #[command(name = "cart")]
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },

    /// Show the order summary
    #[command(name = "summary")]
    Summary {
        /// Promo code to apply
        #[arg(long)]
        promo: Option<String>,
    },

    /// Check out the cart
    #[command(name = "checkout")]
    Checkout(CheckoutArgs),
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add a product (color and size default to the first option)
    Add {
        product_id: String,

        #[arg(short = 'q', long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,
    },

    /// Set the quantity of a line
    Update {
        #[command(flatten)]
        line: LineArgs,

        #[arg(short = 'q', long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line
    Remove {
        #[command(flatten)]
        line: LineArgs,
    },

    /// Empty the cart
    Clear,
}

/// Identifies a cart line.
#[derive(Debug, Args)]
pub struct LineArgs {
    pub product_id: String,

    #[arg(long)]
    pub color: String,

    #[arg(long)]
    pub size: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaymentArg {
    Card,
    Paypal,
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub zip_code: String,

    #[arg(long, default_value = "US")]
    pub country: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long, value_enum, default_value = "card")]
    pub payment: PaymentArg,

    #[arg(long, default_value = "")]
    pub card_number: String,

    #[arg(long, default_value = "")]
    pub card_name: String,

    #[arg(long, default_value = "")]
    pub card_expiry: String,

    #[arg(long, default_value = "")]
    pub card_cvc: String,

    /// Promo code to apply before paying
    #[arg(long)]
    pub promo: Option<String>,
}

impl CheckoutArgs {
    pub fn shipping_details(&self) -> ShippingDetails {
        ShippingDetails {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
            same_as_shipping: true,
        }
    }

    pub fn payment_details(&self) -> PaymentDetails {
        match self.payment {
            PaymentArg::Paypal => PaymentDetails::paypal(),
            PaymentArg::Card => PaymentDetails {
                method: PaymentMethod::Card,
                card_number: self.card_number.clone(),
                card_name: self.card_name.clone(),
                card_expiry: self.card_expiry.clone(),
                card_cvc: self.card_cvc.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "medwear", "cart", "add", "1", "-q", "2", "--color", "Navy", "--size", "M",
        ])
        .unwrap();

        match cli.command {
            Commands::Cart {
                command: CartCommand::Add { product_id, quantity, color, size },
            } => {
                assert_eq!(product_id, "1");
                assert_eq!(quantity, 2);
                assert_eq!(color.as_deref(), Some("Navy"));
                assert_eq!(size.as_deref(), Some("M"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_products_with_global_flags() {
        let cli = Cli::try_parse_from([
            "medwear", "products", "--category", "Lab Coats", "--sort", "price-desc", "--json",
            "--ephemeral",
        ])
        .unwrap();

        assert!(cli.json);
        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command,
            Commands::Products { ref category, ref sort, .. }
                if category == &["Lab Coats".to_string()] && sort == "price-desc"
        ));
    }

    #[test]
    fn test_checkout_paypal_details() {
        let cli = Cli::try_parse_from([
            "medwear", "checkout", "--email", "a@b.co", "--first-name", "A", "--last-name", "B",
            "--address", "1 St", "--city", "C", "--state", "S", "--zip-code", "1", "--phone", "5",
            "--payment", "paypal",
        ])
        .unwrap();

        let Commands::Checkout(args) = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(args.payment_details().method, PaymentMethod::PayPal);
        assert_eq!(args.shipping_details().country, "US");
    }
}
