//! # Seed Data Generator
//!
//! Populates the store with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./bijak.db)
//! cargo run -p bijak-store --bin seed
//!
//! # Specify a database path
//! cargo run -p bijak-store --bin seed -- --db ./data/bijak.db
//! ```
//!
//! Writes a merchant config, a handful of customers and a set of local
//! products with plausible usage counts, so the item form has something
//! to suggest on a fresh checkout.

use std::env;

use bijak_core::{Customer, MerchantConfig, Product, ProductOrigin};
use bijak_store::{keys, Store, StoreConfig};
use uuid::Uuid;

/// (name, unit price cents, unit, usage count)
const PRODUCTS: &[(&str, i64, &str, u32)] = &[
    ("Milk", 5000, "liter", 24),
    ("Paneer", 50000, "kg", 18),
    ("Yogurt", 8000, "kg", 12),
    ("Butter", 30000, "kg", 9),
    ("Eggs", 12000, "dozen", 7),
    ("Cream", 15000, "liter", 5),
    ("Lassi", 6000, "liter", 3),
    ("Ghee", 95000, "kg", 2),
];

const CUSTOMERS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("Ali Traders", Some("0300-1234567"), Some("Shop 4, Anarkali Bazaar")),
    ("Bismillah Store", Some("0321-7654321"), None),
    ("Cafe Nukta", None, Some("12-C Gulberg III")),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db_path = parse_db_arg().unwrap_or_else(|| "./bijak.db".to_string());
    tracing::info!(path = %db_path, "Seeding store");

    let store = Store::open(StoreConfig::new(&db_path)).await?;

    let products: Vec<Product> = PRODUCTS
        .iter()
        .map(|&(name, price, unit, usage)| Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            unit_price_cents: price,
            unit: unit.to_string(),
            default_quantity: None,
            usage_count: usage,
            origin: ProductOrigin::Local,
        })
        .collect();
    store.write(keys::PRODUCTS, &products).await?;

    let customers: Vec<Customer> = CUSTOMERS
        .iter()
        .map(|&(name, phone, address)| {
            Customer::new(name, phone.map(String::from), address.map(String::from))
        })
        .collect();
    store.write(keys::CUSTOMERS, &customers).await?;

    let merchant = MerchantConfig {
        business_name: "Bijak Dairy Demo".to_string(),
        address_line1: "Main Market, Block H".to_string(),
        address_line2: "Lahore".to_string(),
        phone: "042-35761234".to_string(),
        email: Some("demo@bijak.example".to_string()),
        tax_id: Some("NTN 1234567-8".to_string()),
        catalog_source_id: None,
    };
    store.write(keys::MERCHANT_CONFIG, &merchant).await?;

    tracing::info!(
        products = products.len(),
        customers = customers.len(),
        "Seed complete"
    );

    store.close().await;
    Ok(())
}

/// Pulls `--db <path>` out of argv. No clap for a two-flag dev tool.
fn parse_db_arg() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
