//! # Seed Data Generator
//!
//! Stocks a development database through the regular restock path, so
//! the totals ledger carries the matching cost.
//!
//! ## Usage
//! ```bash
//! # Restock 100 products (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount
//! cargo run -p stockroom-db --bin seed -- --count 40
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! Each product gets:
//! - A name built from a base item and a size: `"Coffee 12oz"`
//! - Price: $1.99 - $9.99 plus a size addon
//! - Cost: a margin of 25% - 80% over cost
//! - Stock: 1 - 100

use std::env;

use stockroom_core::{CostInput, Money, Percentage, PointOfSale};
use stockroom_db::{Database, DbConfig};

const ITEMS: &[&str] = &[
    "Coffee",
    "Green Tea",
    "Orange Juice",
    "Sparkling Water",
    "Potato Chips",
    "Pretzels",
    "Dark Chocolate",
    "Granola Bar",
    "Cheddar Cheese",
    "Greek Yogurt",
    "Whole Milk",
    "Butter",
    "Pasta Penne",
    "White Rice",
    "Canned Beans",
    "Peanut Butter",
    "Honey",
    "Oatmeal",
    "Flour",
    "Sugar",
];

/// Size variants and their price addon in cents.
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Large", 200),
    ("12oz", 0),
    ("2L", 150),
    ("6-Pack", 300),
];

/// Margins in basis points.
const MARGINS: &[u32] = &[2500, 4000, 6000, 8000];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 100;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to restock (default: 100)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let pos = PointOfSale::new(db.clone());

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = pos.catalog().list_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed; delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Restocking products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (item_idx, item) in ITEMS.iter().enumerate() {
        for (size_idx, (size, addon)) in SIZES.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let seed = item_idx * SIZES.len() + size_idx;
            let name = format!("{} {}", item, size);
            let price = Money::from_cents(199 + ((seed * 17) % 800) as i64 + addon);
            let margin = Percentage::from_bps(MARGINS[seed % MARGINS.len()]);
            let quantity = 1 + (seed % 100) as i64;

            if let Err(e) = pos
                .catalog()
                .restock(&name, quantity, price, CostInput::Margin(margin))
                .await
            {
                eprintln!("Failed to restock {}: {}", name, e);
                continue;
            }

            generated += 1;
        }
    }

    let elapsed = start.elapsed();
    let report = pos.ledger().report().await?;

    println!();
    println!("✓ Restocked {} products in {:?}", generated, elapsed);
    println!("  Stock value: {}", report.stock_value);
    println!("  Ledger cost: {}", report.cost);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
