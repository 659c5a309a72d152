//! # Seed Data
//!
//! Populates the database with the demo catalogue.
//!
//! ## Usage
//! ```bash
//! # Seed ./cashier.db
//! cargo run -p cashier-db --bin seed
//!
//! # Specify database path
//! cargo run -p cashier-db --bin seed -- --db ./data/cashier.db
//! ```
//!
//! Skips seeding if the database already has products.

use std::env;

use cashier_core::{CategoryDraft, ProductDraft};
use cashier_db::migrations::migration_status;
use cashier_db::{Database, DbConfig};

/// (category, description, [(product, price, stock)])
const CATALOGUE: &[(&str, &str, &[(&str, i64, i64)])] = &[
    (
        "Makanan",
        "Makanan instan dan siap saji",
        &[("Indomie Godog", 3500, 10)],
    ),
    ("Minuman", "Air mineral dan minuman ringan", &[("Vit 1000ml", 3000, 40)]),
    ("Bumbu", "Kecap, saus dan bumbu dapur", &[("kecap", 12000, 20)]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./cashier.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(path) = args.get(i + 1) {
                    db_path = path.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cashier Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cashier.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Cashier Seed Data");
    println!("=================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    let (embedded, applied) = migration_status(db.pool()).await?;
    println!("✓ Migrations applied ({}/{})", applied, embedded);

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut created = 0;
    for (category_name, description, products) in CATALOGUE {
        let category = db
            .categories()
            .create(&CategoryDraft {
                name: category_name.to_string(),
                description: description.to_string(),
            })
            .await?;

        for (name, price, stock) in products.iter() {
            let product = db
                .products()
                .create(&ProductDraft {
                    name: name.to_string(),
                    price: *price,
                    stock: *stock,
                    category_id: Some(category.id),
                })
                .await?;
            println!(
                "  + {:<16} price {:>6}  stock {:>3}  [{}]",
                product.name, product.price, product.stock, category.name
            );
            created += 1;
        }
    }

    println!();
    println!("✓ Seeded {} categories and {} products", CATALOGUE.len(), created);

    db.close().await;
    Ok(())
}
