//! # Cart Inspector
//!
//! Shows or resets a persisted cart in the local database.
//!
//! ## Usage
//! ```bash
//! # Show the shared browser cart
//! cargo run -p aegyptus-store --bin cart-inspect -- show
//!
//! # Show an account's cart in a specific database
//! cargo run -p aegyptus-store --bin cart-inspect -- --db ./bazaar.db --scope account:42 show
//!
//! # Reset a guest cart to []
//! cargo run -p aegyptus-store --bin cart-inspect -- --scope guest:<uuid> clear
//!
//! # List every stored cart key
//! cargo run -p aegyptus-store --bin cart-inspect -- list
//!
//! # Check the database and its migrations
//! cargo run -p aegyptus-store --bin cart-inspect -- status
//! ```
//!
//! `show` never modifies the stored value, even when it is malformed.

use std::env;
use std::path::PathBuf;

use aegyptus_core::{Cart, CartScope, CartTotals, OrderSummary, ShippingMethod};
use aegyptus_store::{BazaarConfig, CartPersistence, Database, DbConfig, KeyValueStore, SqliteStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show,
    Clear,
    List,
    Status,
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    db_path: Option<PathBuf>,
    scope: CartScope,
    command: Command,
}

fn print_usage() {
    println!("AEGYPTUS Bazaar Cart Inspector");
    println!();
    println!("Usage: cart-inspect [OPTIONS] <show|clear|list|status>");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>       Database file path (default: from bazaar.toml)");
    println!("  -s, --scope <SCOPE>   global | guest:<uuid> | account:<id> (default: global)");
    println!("  -h, --help            Show this help message");
}

/// Parses the arguments after the program name. `Ok(None)` means help was
/// requested.
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        db_path: None,
        scope: CartScope::Global,
        command: Command::Show,
    };

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                let path = args.next().ok_or_else(|| format!("{} requires a path", arg))?;
                options.db_path = Some(PathBuf::from(path));
            }
            "--scope" | "-s" => {
                let scope = args.next().ok_or_else(|| format!("{} requires a scope", arg))?;
                options.scope = scope.parse().map_err(|e| format!("{}", e))?;
            }
            "show" => options.command = Command::Show,
            "clear" => options.command = Command::Clear,
            "list" => options.command = Command::List,
            "status" => options.command = Command::Status,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(Some(options))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!();
            print_usage();
            return Err(message.into());
        }
    };

    let config = BazaarConfig::load(None)?;
    let db_path = options
        .db_path
        .unwrap_or_else(|| config.database_path().clone());

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let persistence =
        CartPersistence::for_scope(db.cart_store(), config.key_prefix(), &options.scope);

    println!("Database: {}", db_path.display());

    match options.command {
        Command::Status => {
            let healthy = db.health_check().await;
            println!("Healthy:  {}", if healthy { "yes" } else { "no" });
            let (total, applied) = db.migration_status().await?;
            println!("Migrations: {}/{} applied", applied, total);
            if applied < total {
                println!("⚠ {} pending migration(s)", total - applied);
            }
        }
        Command::Show => {
            print_scope(&options.scope, &persistence);
            show(&persistence, &config).await?;
        }
        Command::Clear => {
            print_scope(&options.scope, &persistence);
            persistence.try_save(&Cart::new()).await?;
            println!("✓ Cart cleared");
        }
        Command::List => {
            println!();
            let keys = persistence.store().keys_with_prefix(config.key_prefix()).await?;
            println!("{} stored cart(s)", keys.len());
            for key in keys {
                println!("  {}", key);
            }
        }
    }

    db.close().await;
    Ok(())
}

fn print_scope(scope: &CartScope, persistence: &CartPersistence<SqliteStore>) {
    println!("Scope:    {} (key \"{}\")", scope, persistence.key());
    println!();
}

async fn show(
    persistence: &CartPersistence<SqliteStore>,
    config: &BazaarConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(updated) = persistence.store().updated_at(persistence.key()).await? {
        println!("Last written: {}", updated.to_rfc3339());
        println!();
    }

    let cart = match persistence.peek().await {
        Ok(Some(cart)) => cart,
        Ok(None) => {
            println!("No cart stored.");
            return Ok(());
        }
        Err(e) => {
            println!("✗ Stored value is not a valid cart: {}", e);
            if let Some(raw) = persistence.store().get(persistence.key()).await? {
                println!();
                println!("Raw value:");
                println!("  {}", raw);
            }
            return Ok(());
        }
    };

    if cart.is_empty() {
        println!("Cart is empty.");
        return Ok(());
    }

    for item in cart.items() {
        println!(
            "  #{:<6} {:<32} {:>3} × {:>9} = {:>10}{}",
            item.product_id.get(),
            item.name,
            item.quantity,
            item.unit_price.to_string(),
            item.line_total().to_string(),
            if item.at_stock_limit() { "  (max stock)" } else { "" }
        );
    }

    let totals = CartTotals::from(&cart);
    let summary = OrderSummary::compute(&cart, &config.checkout_policy(), ShippingMethod::Standard);
    println!();
    println!(
        "Items: {} ({} distinct)",
        totals.item_count, totals.distinct_items
    );
    println!("Subtotal:            {}", summary.subtotal);
    println!("Shipping (standard): {}", summary.shipping);
    println!("Tax:                 {}", summary.tax);
    println!("Total:               {}", summary.total);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aegyptus=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// =============================================================================
// Unit Tests
// =============================================================================
