//! # Medwear Storefront Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        medwear (binary)                                 │
//! │                                                                         │
//! │  main.rs ────► parse args, set up logging, print the result            │
//! │                                                                         │
//! │  lib.rs ─────► load config, open storage, dispatch                     │
//! │                                                                         │
//! │  commands/ ──► list_products, add_to_cart, apply_promo, submit_payment │
//! │                                                                         │
//! │  state/ ─────► CartStore, CheckoutState, StorefrontConfig              │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  storefront.db (local file, WAL mode, local_storage table)       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//! ```text
//! medwear products --category "Scrub Tops" --sort price-asc
//! medwear cart add 1 -q 2 --color Navy --size M
//! medwear summary --promo welcome10
//! medwear checkout --email sam@example.com --first-name Sam ... --payment paypal
//! ```

use clap::Parser;
use tracing::{debug, error};

use medwear_storefront::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    medwear_storefront::init_tracing(cli.verbose);

    debug!(?cli, "medwear started");

    match medwear_storefront::run(cli).await {
        Ok(output) => print!("{output}"),
        Err(e) => {
            error!(code = ?e.code, "Command failed: {}", e.message);
            eprintln!("Error: {}", e.message);
            std::process::exit(1);
        }
    }
}
