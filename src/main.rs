//! Climate Observation Service
//!
//! A read-only HTTP API over an archived set of climate observations:
//! precipitation and temperature readings keyed by date and weather
//! station, stored in PostgreSQL. The archive is pre-populated and is
//! never written by this service.
//!
//! Startup sequence:
//! 1. Validate the database connection and the `climate` schema
//! 2. Cache the most recent measurement date (it anchors the reporting
//!    window for the fixed routes)
//! 3. Serve the query routes until stopped
//!
//! Usage:
//!   cargo run --release                # Serve on the default port (5000)
//!   cargo run --release -- --port 8080 # Serve on port 8080
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string

use chrono::NaiveDate;
use climate_service::db;
use climate_service::endpoint;
use climate_service::queries;
use std::env;

fn main() {
    println!("🌡️ Climate Observation Service");
    println!("==============================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port: u16 = 5000;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(p) => port = p,
                        Err(_) => {
                            eprintln!("Error: invalid port number '{}'", args[i + 1]);
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Validate the database and the climate schema before serving anything
    println!("📊 Validating database setup...");
    let mut client = match db::connect_and_verify(&["climate"]) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("\n❌ Database validation failed: {}\n", e);
            eprintln!("Run setup validation: cargo run --bin check_db\n");
            std::process::exit(1);
        }
    };
    println!("✓ Database validated");

    // Cache the most recent measurement date. The reporting window for
    // the fixed routes is derived from this one value on every request.
    let latest = match queries::latest_date(&mut client) {
        Ok(date) => date,
        Err(e) => {
            eprintln!("\n❌ Failed to determine latest measurement date: {}\n", e);
            std::process::exit(1);
        }
    };

    let latest = match NaiveDate::parse_from_str(&latest, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            eprintln!("\n❌ Latest measurement date '{}' is not YYYY-MM-DD: {}\n", latest, e);
            std::process::exit(1);
        }
    };

    println!("✓ Latest measurement date: {}", latest);
    println!("✓ Reporting window starts: {}\n", queries::reporting_window_start(latest));

    // The startup connection was only needed for the checks above;
    // request handlers open their own short-lived connections.
    drop(client);

    println!("🚀 Starting HTTP endpoint...");
    if let Err(e) = endpoint::start_endpoint_server(port, latest) {
        eprintln!("\n❌ Endpoint server error: {}\n", e);
        std::process::exit(1);
    }
}
