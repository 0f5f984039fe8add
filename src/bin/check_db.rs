//! Database setup verification for the climate service.
//!
//! Checks, in order: connection, the `climate` schema, both tables, row
//! counts, and the latest measurement date. Run this after loading the
//! archive to confirm the service can start.
//!
//! Usage: cargo run --bin check_db

use postgres::{Client, NoTls};
use std::env;

fn main() {
    dotenv::dotenv().ok();
    let db_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    println!("Connecting to: {}", db_url);

    let mut client = Client::connect(&db_url, NoTls)
        .expect("Failed to connect");

    println!("✓ Connected successfully");

    // Check 1: climate schema exists
    let result = client.query_one(
        "SELECT EXISTS (SELECT FROM information_schema.schemata WHERE schema_name = 'climate')",
        &[]
    );

    match result {
        Ok(row) => {
            let exists: bool = row.get(0);
            println!("✓ climate schema exists: {}", exists);
        }
        Err(e) => println!("✗ Error checking schema: {}", e),
    }

    // Check 2: measurement and station tables exist
    for table in ["measurement", "station"] {
        let result = client.query_one(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'climate'
                AND table_name = $1
            )",
            &[&table]
        );

        match result {
            Ok(row) => {
                let exists: bool = row.get(0);
                println!("✓ climate.{} table exists: {}", table, exists);
            }
            Err(e) => println!("✗ Error checking table {}: {}", table, e),
        }
    }

    // Check 3: row counts
    for table in ["measurement", "station"] {
        let result = client.query_one(
            &format!("SELECT COUNT(*) FROM climate.{}", table),
            &[]
        );

        match result {
            Ok(row) => {
                let count: i64 = row.get(0);
                println!("✓ climate.{} rows: {}", table, count);
            }
            Err(e) => println!("✗ Error counting {} rows: {}", table, e),
        }
    }

    // Check 4: latest measurement date (the service refuses to start without one)
    let result = client.query(
        "SELECT date FROM climate.measurement ORDER BY date DESC LIMIT 1",
        &[]
    );

    match result {
        Ok(rows) => match rows.first() {
            Some(row) => {
                let date: String = row.get(0);
                println!("✓ Latest measurement date: {}", date);
            }
            None => println!("✗ measurement table is empty - the service will not start"),
        },
        Err(e) => println!("✗ Error querying latest date: {}", e),
    }
}
