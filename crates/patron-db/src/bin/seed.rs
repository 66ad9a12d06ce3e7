//! # Seed Data Generator
//!
//! Populates the database with companies, customer types and customers for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 customers (default)
//! cargo run -p patron-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p patron-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p patron-db --bin seed -- --db ./data/patron.db
//! ```
//!
//! ## Generated Customers
//! Names are combined from a prefix and a line of business
//! ("Abarrotes Norte", "Ferretería Central", ...). Each customer gets:
//! - Tax id: `{PREFIX}{LINE}{INDEX}` with no spaces
//! - Email on roughly two thirds of rows
//! - A company and customer type picked round-robin
//!
//! Everything is written in a single transaction: a failure leaves the
//! database untouched.

use std::env;

use patron_core::{CustomerQuery, NewCompany, NewCustomer, NewCustomerType};
use patron_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const COMPANIES: &[(&str, &str)] = &[
    ("UM", "Universidad de Montemorelos"),
    ("HLC", "Hospital La Carlota"),
    ("ACME", "Acme Distribuciones S.A. de C.V."),
];

const CUSTOMER_TYPES: &[(&str, &str)] = &[
    ("Retail", "Walk-in and small accounts"),
    ("Wholesale", "Volume buyers with credit terms"),
    ("Government", "Public institutions"),
];

const PREFIXES: &[&str] = &[
    "Abarrotes",
    "Ferretería",
    "Farmacia",
    "Papelería",
    "Panadería",
    "Refaccionaria",
    "Distribuidora",
    "Comercial",
];

const LINES: &[&str] = &[
    "Norte", "Central", "del Valle", "San José", "La Paz", "Acme", "Linares", "Monterrey",
    "Allende", "Cadereyta",
];

const CONTACTS: &[&str] = &[
    "Laura Ortiz",
    "Miguel Treviño",
    "Ana Garza",
    "José Salinas",
    "Rocío Cantú",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./patron_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("Patron Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of customers to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./patron_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    println!("Patron Seed Data Generator");
    println!("==========================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let customers = db.customers();

    let mut tx = db.begin().await?;

    let existing = customers.count(&mut tx, &CustomerQuery::new()).await?;
    if existing > 0 {
        println!("Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut company_ids = Vec::with_capacity(COMPANIES.len());
    for (name, full_name) in COMPANIES {
        let company = db
            .companies()
            .insert(
                &mut tx,
                &NewCompany {
                    name: name.to_string(),
                    full_name: full_name.to_string(),
                },
            )
            .await?;
        company_ids.push(company.id);
    }

    let mut type_ids = Vec::with_capacity(CUSTOMER_TYPES.len());
    for (name, description) in CUSTOMER_TYPES {
        let customer_type = db
            .customer_types()
            .insert(
                &mut tx,
                &NewCustomerType {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                },
            )
            .await?;
        type_ids.push(customer_type.id);
    }

    info!(
        companies = company_ids.len(),
        customer_types = type_ids.len(),
        "Lookup tables seeded"
    );

    let start = std::time::Instant::now();

    for seed in 0..count {
        let customer = generate_customer(
            seed,
            company_ids[seed % company_ids.len()],
            type_ids[seed % type_ids.len()],
        );
        customers.create(&mut tx, customer, None).await?;

        if (seed + 1) % 100 == 0 {
            println!("  Generated {} customers...", seed + 1);
        }
    }

    tx.commit().await?;

    let elapsed = start.elapsed();
    println!();
    println!("Generated {} customers in {:?}", count, elapsed);

    // Verify search
    println!();
    println!("Verifying search...");
    let mut conn = db.acquire().await?;

    let page = customers
        .list(&mut conn, &CustomerQuery::new().filter("acme").max(5))
        .await?;
    println!("  Filter 'acme': {} matches, showing {}", page.count, page.customers.len());
    for customer in &page.customers {
        println!("    #{} {} <{}>", customer.id, customer.name, customer.tax_id);
    }

    let page = customers
        .list(&mut conn, &CustomerQuery::new().company(company_ids[0]))
        .await?;
    println!("  Company '{}': {} customers", COMPANIES[0].0, page.count);

    println!();
    println!("Seed complete!");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,patron=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds one customer from the name tables.
fn generate_customer(seed: usize, company_id: i64, customer_type_id: i64) -> NewCustomer {
    let prefix = PREFIXES[seed % PREFIXES.len()];
    let line = LINES[(seed / PREFIXES.len()) % LINES.len()];
    let name = format!("{} {}", prefix, line);

    let slug: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();

    let tax_id = format!("{}{:05}", slug.to_uppercase().chars().take(12).collect::<String>(), seed);

    let email = (seed % 3 != 0).then(|| format!("contacto{}@{}.mx", seed, slug));
    let contact = (seed % 2 == 0).then(|| CONTACTS[seed % CONTACTS.len()].to_string());

    NewCustomer {
        name,
        full_name: format!("{} {} S.A. de C.V.", prefix, line),
        tax_id,
        email,
        contact,
        company_id,
        customer_type_id,
    }
}
