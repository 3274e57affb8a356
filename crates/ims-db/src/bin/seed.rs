//! # Seed Data Generator
//!
//! Populates the database with a realistic catalogue and a week of sales
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./inventory.db with 7 days of sales (default)
//! cargo run -p ims-db --bin seed
//!
//! # Specify database path and sales history length
//! cargo run -p ims-db --bin seed -- --db ./data/inventory.db --sales-days 14
//! ```
//!
//! ## What Gets Generated
//! - Products in the default categories, created through the ledger so
//!   every initial stock level has an "Initial stock" log row
//! - 5-15 sales per day for the last N days via `record_sale_at`
//! - A supplier restock for each product that ends up low on stock
//!
//! Values are derived from the product index, so two runs against empty
//! databases produce the same data. Seeding is skipped when products
//! already exist; sales and stock logs are never cleared.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::env;
use tracing_subscriber::EnvFilter;

use ims_core::{CoreError, NewProduct, ProductFilter};
use ims_db::{Database, DbConfig, DbError};

/// Catalogue grouped by category name, with prices in cents.
const CATALOGUE: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Electronics",
        "ELEC",
        &[
            ("Mechanical Keyboard (RGB)", 12999),
            ("Wireless Ergonomic Mouse", 5999),
            ("4K Ultra HD Monitor (27-inch)", 29999),
            ("USB-C Docking Station", 8999),
            ("Noise Cancelling Headphones", 19999),
            ("Portable SSD (1TB)", 8999),
            ("Smart Wi-Fi Plug", 2499),
            ("Webcam (1080p)", 6999),
            ("Bluetooth Speaker (Waterproof)", 7999),
            ("Wireless Charging Pad", 1999),
            ("Power Bank (20,000 mAh)", 3499),
            ("HDMI 2.1 Cable (6ft)", 1499),
        ],
    ),
    (
        "Home & Garden",
        "HOME",
        &[
            ("Air Fryer 5.5L", 8999),
            ("Electric Kettle (1.7L)", 3499),
            ("Memory Foam Pillow", 2999),
            ("Digital Food Scale", 1999),
            ("French Press Coffee Maker", 2499),
            ("Bamboo Cutting Board", 1899),
            ("Cast Iron Skillet (12-inch)", 4999),
            ("Dish Drying Rack", 2799),
        ],
    ),
    (
        "Sports & Outdoors",
        "SPRT",
        &[
            ("Yoga Mat (6mm)", 2999),
            ("Adjustable Dumbbells (Pair)", 14999),
            ("Resistance Bands Set", 1999),
            ("Insulated Water Bottle", 2499),
            ("Camping Lantern (LED)", 2799),
            ("Jump Rope (Speed)", 1299),
        ],
    ),
    (
        "Health & Beauty",
        "HLTH",
        &[
            ("Electric Toothbrush", 4999),
            ("Digital Thermometer", 1499),
            ("Facial Cleansing Brush", 3499),
            ("Hair Dryer (Ionic)", 5999),
        ],
    ),
    (
        "Books",
        "BOOK",
        &[
            ("The Pragmatic Programmer", 4499),
            ("Designing Data-Intensive Applications", 5299),
            ("Atomic Habits", 1899),
        ],
    ),
    (
        "Clothing",
        "CLTH",
        &[
            ("Cotton Crew T-Shirt", 1599),
            ("Waterproof Rain Jacket", 7999),
            ("Wool Beanie", 1999),
        ],
    ),
];

/// Builds one product with values derived from `seed`.
fn generate_product(category_id: i64, code: &str, name: &str, price_cents: i64, seed: usize) -> NewProduct {
    // Cost is 60-79% of price, so the margin is always positive
    let cost_pct = 60 + (seed * 7 % 20) as i64;
    let purchasing_price_cents = price_cents * cost_pct / 100;

    NewProduct {
        name: name.to_string(),
        sku: format!("{}-{:03}", code, seed + 1),
        category_id,
        price_cents,
        purchasing_price_cents,
        stock_quantity: (seed * 37 % 101) as i64,
        min_stock_level: Some(5 + (seed * 3 % 16) as i64),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,ims_db=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut sales_days: i64 = 7;
    let mut db_path = String::from("./inventory.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales-days" | "-s" => {
                if i + 1 < args.len() {
                    sales_days = args[i + 1].parse().unwrap_or(7);
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
                println!("Smart-IMS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: ./inventory.db)");
                println!("  -s, --sales-days <N>    Days of sales history (default: 7)");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Smart-IMS Seed Data Generator");
    println!("================================");
    println!("Database:   {}", db_path);
    println!("Sales days: {}", sales_days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let category_ids: HashMap<String, i64> = db
        .categories()
        .list()
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    // Products
    println!();
    println!("Creating products...");

    let mut product_ids = Vec::new();
    let mut seed = 0usize;
    for (category, code, items) in CATALOGUE {
        let Some(&category_id) = category_ids.get(*category) else {
            eprintln!("  Category '{}' missing, skipping its products", category);
            continue;
        };

        for (name, price_cents) in items.iter() {
            let product = generate_product(category_id, code, name, *price_cents, seed);
            seed += 1;

            match db.products().create(&product).await {
                Ok(created) => product_ids.push(created.id),
                Err(e) => eprintln!("  Failed to create {}: {}", product.sku, e),
            }
        }
    }
    println!("✓ Created {} products", product_ids.len());

    // Sales, oldest day first so the ledger reads chronologically
    println!();
    println!("Recording sales...");

    let now = Utc::now();
    let mut recorded = 0;
    let mut skipped = 0;
    let mut tick = 0usize;
    for day_offset in (0..sales_days.max(0)).rev() {
        let sales_today = 5 + (day_offset as usize * 7 % 11);

        for n in 0..sales_today {
            tick += 1;
            if product_ids.is_empty() {
                break;
            }
            let product_id = product_ids[(tick * 13) % product_ids.len()];
            let quantity = 1 + (tick % 5) as i64;
            let minutes = (n as i64 * 47) % 60;
            let sold_at = now - Duration::days(day_offset) - Duration::minutes(minutes + n as i64 * 30);

            match db.ledger().record_sale_at(product_id, quantity, sold_at).await {
                Ok(_) => recorded += 1,
                Err(DbError::Domain(CoreError::InsufficientStock { .. })) => skipped += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
    println!("✓ Recorded {} sales ({} skipped for lack of stock)", recorded, skipped);

    // Supplier restocks for whatever ran low
    println!();
    println!("Restocking low products...");

    let low = db
        .products()
        .list(&ProductFilter {
            search: None,
            low_stock_only: true,
        })
        .await?;
    for product in low.iter().take(5) {
        let quantity = product.min_stock_level * 3;
        db.ledger()
            .restock(product.id, quantity, Some("Supplier delivery"))
            .await?;
    }
    println!("✓ Restocked {} of {} low-stock products", low.len().min(5), low.len());

    let stats = db.stats().dashboard().await?;
    println!();
    println!("Dashboard:");
    println!("  Inventory value: {}", ims_core::Money::from_cents(stats.total_value_cents));
    println!("  Realized profit: {}", ims_core::Money::from_cents(stats.total_profit_cents));
    println!("  Orders:          {}", stats.total_orders);
    println!("  Low stock:       {}", stats.low_stock_count);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
