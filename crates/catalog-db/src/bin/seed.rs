//! # Seed Data Generator
//!
//! Populates a catalog file with synthetic products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 100 products (default) into $CATALOG_DB_PATH or ./products.db
//! cargo run -p catalog-db --bin seed
//!
//! # Reproducible run with a custom amount
//! cargo run -p catalog-db --bin seed -- --count 10000 --seed 42
//!
//! # Specify database path and the verification search term
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db --search globex
//! ```
//!
//! Counts above `MAX_GENERATE` are split into several batches. Each batch is
//! atomic; a seeded run derives one seed per batch so the whole run stays
//! reproducible.

use std::env;
use std::time::Instant;

use catalog_core::{DEFAULT_GENERATE_COUNT, MAX_GENERATE};
use catalog_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Product Catalog Seed Data Generator

Usage: seed [OPTIONS]

Options:
  -c, --count <N>      Number of products to generate (default: 100)
  -s, --seed <S>       RNG seed for reproducible data
  -d, --db <PATH>      Database file path (default: $CATALOG_DB_PATH or ./products.db)
  -q, --search <TERM>  Term for the verification search (default: acme)
  -h, --help           Show this help message";

#[derive(Debug)]
struct Args {
    count: u64,
    seed: Option<i64>,
    db_path: Option<String>,
    search: String,
}

fn parse_args() -> Result<Option<Args>, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut parsed = Args {
        count: DEFAULT_GENERATE_COUNT as u64,
        seed: None,
        db_path: None,
        search: String::from("acme"),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };

        match arg.as_str() {
            "--count" | "-c" => {
                let raw = value(arg)?;
                parsed.count = raw
                    .parse()
                    .map_err(|_| format!("invalid --count value: {raw}"))?;
            }
            "--seed" | "-s" => {
                let raw = value(arg)?;
                parsed.seed = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --seed value: {raw}"))?,
                );
            }
            "--db" | "-d" => parsed.db_path = Some(value(arg)?),
            "--search" | "-q" => parsed.search = value(arg)?,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    if parsed.count == 0 {
        return Err(String::from("--count must be at least 1"));
    }

    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let mut config = DbConfig::from_env()?;
    if let Some(path) = &args.db_path {
        config.database_path = path.into();
    }

    println!("🌱 Product Catalog Seed Data Generator");
    println!("======================================");
    println!("Database: {}", config.database_path.display());
    println!("Products: {}", args.count);
    if let Some(seed) = args.seed {
        println!("Seed:     {}", seed);
    }
    println!();

    let db = Database::new(config).await?;
    let catalog = db.catalog();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("ℹ Database already has {} products; appending", existing);
    }

    println!();
    println!("Generating products...");

    let start = Instant::now();
    let mut remaining = args.count;
    let mut generated: u64 = 0;
    let mut batch_index: i64 = 0;

    while remaining > 0 {
        let size = remaining.min(MAX_GENERATE as u64);
        let batch_seed = args.seed.map(|seed| seed.wrapping_add(batch_index));

        let result = catalog.generate(size as i64, batch_seed).await?;

        generated += result.inserted as u64;
        remaining -= size;
        batch_index += 1;

        println!(
            "  Batch {}: ids {}..={} ({} total)",
            batch_index,
            result.first_id.unwrap_or_default(),
            result.last_id.unwrap_or_default(),
            generated
        );
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} products/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    // Verify search
    println!();
    println!("Verifying search index...");
    let outcome = catalog.search_detailed(&args.search, 1, 10).await?;
    println!(
        "  Search '{}': {} matches (served by {:?})",
        args.search, outcome.page.total, outcome.path
    );
    for product in &outcome.page.items {
        println!("    #{} {} [{}] {}", product.id, product.sku, product.brand, product.price());
    }

    let health = catalog.health().await;
    println!();
    println!(
        "✓ Seed complete! {} products, migrations {}/{}",
        health.products.unwrap_or_default(),
        health.migrations_applied,
        health.migrations_total
    );

    db.close().await;
    Ok(())
}
