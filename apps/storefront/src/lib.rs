//! # Medwear Storefront Library
//!
//! Application layer for the Medwear storefront: the cart store, the
//! checkout session, configuration and the command layer the views call.
//!
//! ## Module Organization
//! ```text
//! medwear_storefront/
//! ├── lib.rs          ◄─── You are here (startup, Storefront, CLI dispatch)
//! ├── cli.rs          ◄─── clap argument structures
//! ├── fixtures.rs     ◄─── Built-in product catalog
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore (Mutex + local storage)
//! │   ├── checkout.rs ◄─── CheckoutState (step machine + promo slot)
//! │   └── config.rs   ◄─── StorefrontConfig
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Product listing and detail commands
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── checkout.rs ◄─── Promo, summary and checkout commands
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Startup                                │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,medwear=debug,sqlx=warn; RUST_LOG overrides         │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → medwear.toml → MEDWEAR_* → validate                    │
//! │                                                                         │
//! │  3. Open Local Storage ───────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │     • Linux: ~/.local/share/storefront/storefront.db                    │
//! │     • --ephemeral: in-memory map instead                                │
//! │                                                                         │
//! │  4. Hydrate State ────────────────────────────────────────────────────► │
//! │     • CartStore from the persisted cart key                             │
//! │     • CheckoutState empty, catalog from fixtures                        │
//! │                                                                         │
//! │  5. Dispatch the CLI command                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod fixtures;
pub mod state;

use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medwear_core::catalog::{InMemoryCatalog, ProductQuery, SortOrder};
use medwear_core::{LineKey, Money, PricingPolicy, ProductId};
use medwear_store::{Database, DbConfig, LocalStorage, MemoryStorage};

use cli::{CartCommand, CheckoutArgs, Cli, Commands};
use commands::cart::{AddToCartRequest, CartResponse};
use error::ApiResult;
use state::{CartStore, CheckoutState, StorefrontConfig};

// =============================================================================
// Storefront
// =============================================================================

/// Everything one storefront session needs, wired together.
pub struct Storefront {
    pub config: StorefrontConfig,
    pub policy: PricingPolicy,
    pub catalog: InMemoryCatalog,
    pub cart: CartStore,
    pub checkout: CheckoutState,
    db: Option<Database>,
}

impl Storefront {
    /// Opens the SQLite database from the config and hydrates the cart.
    pub async fn open(config: StorefrontConfig) -> ApiResult<Self> {
        let db_path = config.database_path()?;
        info!(?db_path, "Opening storefront database");

        let db = Database::new(DbConfig::new(db_path)).await?;
        let storage: Arc<dyn LocalStorage> = Arc::new(db.local_storage());

        let mut storefront = Self::with_storage(config, storage).await;
        storefront.db = Some(db);
        Ok(storefront)
    }

    /// A session whose cart lives only in memory.
    pub async fn ephemeral(config: StorefrontConfig) -> Self {
        Self::with_storage(config, Arc::new(MemoryStorage::new())).await
    }

    pub async fn with_storage(config: StorefrontConfig, storage: Arc<dyn LocalStorage>) -> Self {
        let cart = CartStore::hydrate(storage, config.storage.cart_key.clone()).await;

        Storefront {
            policy: config.pricing_policy(),
            catalog: fixtures::fixture_catalog(),
            cart,
            checkout: CheckoutState::new(),
            db: None,
            config,
        }
    }

    /// Closes the database, if one is open.
    pub async fn close(self) {
        if let Some(db) = self.db {
            db.close().await;
        }
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - `-v`: debug for everything, `-vv`: trace
/// - Default: `info,medwear=debug,sqlx=warn`
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("info,medwear=debug,sqlx=warn"),
        1 => EnvFilter::new("debug,sqlx=info"),
        _ => EnvFilter::new("trace"),
    });

    // Logs go to stderr so command output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

/// Runs one CLI invocation and returns what to print.
pub async fn run(cli: Cli) -> ApiResult<String> {
    let config = StorefrontConfig::load(cli.config.clone())?;

    let storefront = if cli.ephemeral {
        Storefront::ephemeral(config).await
    } else {
        Storefront::open(config).await?
    };

    let output = dispatch(&storefront, cli.command, cli.json).await;
    storefront.close().await;
    output
}

async fn dispatch(sf: &Storefront, command: Commands, json: bool) -> ApiResult<String> {
    match command {
        Commands::Products {
            category,
            color,
            size,
            min_price,
            max_price,
            search,
            sort,
        } => {
            let query = ProductQuery {
                categories: category,
                colors: color,
                sizes: size,
                min_price: min_price.map(Money::from_dollars),
                max_price: max_price.map(Money::from_dollars),
                search,
                sort: sort.parse::<SortOrder>()?,
            };

            let response = commands::catalog::list_products(&sf.catalog, query)?;
            if json {
                return to_json(&response);
            }

            let mut out = format!("Showing {} products\n", response.total);
            for p in &response.products {
                writeln!(
                    out,
                    "  [{}] {:<28} {:>9}  {}{}",
                    p.id,
                    p.name,
                    sf.config.format_currency(p.price),
                    p.category,
                    if p.is_new() { "  (new)" } else { "" }
                )?;
            }
            Ok(out)
        }

        Commands::Product { id } => {
            let id = ProductId::new(id);
            let detail = commands::catalog::get_product(&sf.catalog, &id)?;
            let similar = commands::catalog::similar_products(&sf.catalog, &id, None)?;
            if json {
                return to_json(&serde_json::json!({ "detail": detail, "similar": similar }));
            }

            let p = &detail.product;
            let mut out = format!("{} ({})\n", p.name, sf.config.format_currency(p.price));
            writeln!(out, "  Category: {}", p.category)?;
            writeln!(out, "  Colors:   {}", p.colors.join(", "))?;
            writeln!(out, "  Sizes:    {}", p.sizes.join(", "))?;
            writeln!(out, "  Max qty:  {}", detail.quantity_limit)?;
            if let Some(description) = &p.description {
                writeln!(out, "  {}", description)?;
            }
            if !similar.is_empty() {
                let names: Vec<&str> = similar.iter().map(|s| s.name.as_str()).collect();
                writeln!(out, "  You may also like: {}", names.join(", "))?;
            }
            Ok(out)
        }

        Commands::Featured => {
            let products = commands::catalog::featured_products(&sf.catalog);
            if json {
                return to_json(&products);
            }

            let mut out = String::from("Featured\n");
            for p in &products {
                writeln!(out, "  [{}] {:<28} {:>9}", p.id, p.name, sf.config.format_currency(p.price))?;
            }
            Ok(out)
        }

        Commands::Config => {
            let response = commands::config::get_config(&sf.config);
            if json {
                return to_json(&response);
            }

            let p = &response.pricing;
            let mut out = format!("{}\n", response.store_name);
            writeln!(
                out,
                "  Free shipping over {} (otherwise {})",
                sf.config.format_currency(p.free_shipping_threshold),
                sf.config.format_currency(p.flat_shipping_fee)
            )?;
            writeln!(out, "  Payment delay: {} ms", response.payment_delay_ms)?;
            Ok(out)
        }

        Commands::Cart { command } => {
            let response = run_cart_command(sf, command).await?;
            if json {
                return to_json(&response);
            }
            render_cart(sf, &response)
        }

        Commands::Summary { promo } => {
            if let Some(code) = promo {
                commands::checkout::apply_promo(&sf.checkout, &sf.cart, &sf.policy, &code).await?;
            }
            let summary = commands::checkout::order_summary(&sf.checkout, &sf.cart, &sf.policy).await;
            if json {
                return to_json(&summary);
            }

            let t = &summary.totals;
            let money = |m: Money| sf.config.format_currency(m);
            let mut out = format!("Order summary ({} items)\n", summary.item_count);
            writeln!(out, "  Subtotal  {:>10}", money(t.subtotal))?;
            if let Some(code) = &t.promo_code {
                writeln!(out, "  Discount  {:>10}  ({})", format!("-{}", money(t.discount)), code)?;
            }
            let shipping = if t.shipping.is_zero() {
                "Free".to_string()
            } else {
                money(t.shipping)
            };
            writeln!(out, "  Shipping  {:>10}", shipping)?;
            writeln!(out, "  Tax       {:>10}", money(t.tax))?;
            writeln!(out, "  Total     {:>10}", money(t.total))?;
            Ok(out)
        }

        Commands::Checkout(args) => run_checkout(sf, args, json).await,
    }
}

async fn run_cart_command(sf: &Storefront, command: CartCommand) -> ApiResult<CartResponse> {
    let response = match command {
        CartCommand::Show => commands::cart::get_cart(&sf.cart).await,
        CartCommand::Add {
            product_id,
            quantity,
            color,
            size,
        } => {
            let request = AddToCartRequest {
                product_id: ProductId::new(product_id),
                quantity: Some(quantity),
                selected_color: color,
                selected_size: size,
            };
            commands::cart::add_to_cart(&sf.catalog, &sf.cart, request)
                .await?
                .cart
        }
        CartCommand::Update { line, quantity } => {
            let key = LineKey::new(line.product_id, line.color, line.size);
            commands::cart::update_cart_item(&sf.cart, key, quantity).await
        }
        CartCommand::Remove { line } => {
            let key = LineKey::new(line.product_id, line.color, line.size);
            commands::cart::remove_from_cart(&sf.cart, key).await
        }
        CartCommand::Clear => commands::cart::clear_cart(&sf.cart).await,
    };
    Ok(response)
}

async fn run_checkout(sf: &Storefront, args: CheckoutArgs, json: bool) -> ApiResult<String> {
    if let Some(code) = &args.promo {
        commands::checkout::apply_promo(&sf.checkout, &sf.cart, &sf.policy, code).await?;
    }

    commands::checkout::start_checkout(&sf.checkout, &sf.cart).await?;
    commands::checkout::submit_shipping(&sf.checkout, &sf.cart, args.shipping_details()).await?;
    let confirmation = commands::checkout::submit_payment(
        &sf.checkout,
        &sf.cart,
        &sf.policy,
        args.payment_details(),
        sf.config.payment_delay(),
    )
    .await?;

    if json {
        return to_json(&confirmation);
    }

    Ok(format!(
        "Thank you for your order!\n  Order number: {}\n  Items: {}\n  Total charged: {}\n  Confirmation sent to {}\n",
        confirmation.order_number,
        confirmation.item_count,
        sf.config.format_currency(confirmation.totals.total),
        args.email,
    ))
}

fn render_cart(sf: &Storefront, response: &CartResponse) -> ApiResult<String> {
    if response.lines.is_empty() {
        return Ok("Your cart is empty\n".to_string());
    }

    let mut out = format!("Shopping cart ({} items)\n", response.totals.item_count);
    for line in &response.lines {
        writeln!(
            out,
            "  {:<28} {} / {:<4} x{:<3} {:>9}",
            line.product.name,
            line.selected_color,
            line.selected_size,
            line.quantity,
            sf.config.format_currency(line.line_total()),
        )?;
    }
    writeln!(
        out,
        "  Subtotal {:>9}",
        sf.config.format_currency(response.totals.cart_total)
    )?;
    Ok(out)
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult<String> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| error::ApiError::internal(e.to_string()))
}
