/// Fixed query set over the measurement archive
///
/// This is the whole of the service's data access layer. The archive is
/// read-only and pre-populated, so there are exactly five operations:
/// the latest recorded date plus the four retrievals behind the API
/// routes. Every operation is a single SQL statement against
/// `climate.measurement`; no transactions, no retries. A connectivity
/// failure propagates to the caller as an error.
///
/// Dates are stored as TEXT in "YYYY-MM-DD" form, so the SQL `>=`/`<=`
/// filters below are plain lexicographic string comparisons; "most
/// recent date" and range filtering stay well-defined for any string
/// the caller supplies, valid date or not.

use chrono::{Duration, NaiveDate};
use postgres::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a data access operation.
#[derive(Debug)]
pub enum QueryError {
    /// The underlying database call failed (connectivity or SQL error).
    Db(postgres::Error),
    /// The climate.measurement table has no rows, so there is no latest
    /// date to anchor the reporting window on.
    NoMeasurements,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Db(e) => write!(f, "Database query failed: {}", e),
            QueryError::NoMeasurements => {
                write!(f, "The climate.measurement table is empty. ")?;
                write!(f, "Load the archive before starting the service (see sql/001_initial_schema.sql).")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl From<postgres::Error> for QueryError {
    fn from(e: postgres::Error) -> Self {
        QueryError::Db(e)
    }
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One precipitation reading inside the reporting window.
#[derive(Debug, Serialize, Deserialize)]
pub struct PrcpRecord {
    /// Calendar day, string-sortable "YYYY-MM-DD".
    pub date: String,
    /// Precipitation amount; null when the station reported no value.
    pub prcp: Option<f64>,
    /// Identifier of the station the reading came from.
    pub station: String,
}

// ---------------------------------------------------------------------------
// Reporting window
// ---------------------------------------------------------------------------

/// First day of the reporting window: exactly 365 calendar days before
/// the given date.
///
/// Not leap-year-aware: subtracting 365 days across a leap day lands
/// one calendar day later than the same day last year. This matches the
/// window definition the archive has always used.
pub fn reporting_window_start(latest: NaiveDate) -> String {
    (latest - Duration::days(365)).format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the most recent date in the measurement archive.
///
/// Fails with `NoMeasurements` when the table is empty; the service
/// cannot define a reporting window without at least one row.
pub fn latest_date(client: &mut Client) -> Result<String, QueryError> {
    let row = client.query_opt(
        "SELECT date FROM climate.measurement ORDER BY date DESC LIMIT 1",
        &[],
    )?;

    match row {
        Some(row) => Ok(row.get(0)),
        None => Err(QueryError::NoMeasurements),
    }
}

/// All precipitation readings on or after `cutoff`, one record per row.
pub fn precipitation_since(
    client: &mut Client,
    cutoff: &str,
) -> Result<Vec<PrcpRecord>, QueryError> {
    let rows = client.query(
        "SELECT date, prcp, station FROM climate.measurement WHERE date >= $1",
        &[&cutoff],
    )?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let date: String = row.get(0);
        let prcp: Option<Decimal> = row.get(1);
        let station: String = row.get(2);

        records.push(PrcpRecord {
            date,
            prcp: prcp.map(decimal_to_f64),
            station,
        });
    }

    Ok(records)
}

/// Flat list of (date, prcp, station) values on or after `cutoff`,
/// interleaved in row order.
///
/// Despite the name, this reports measurement tuples rather than station
/// metadata: the stations feed has served the precipitation filter in
/// flattened form since the first release, and downstream consumers
/// depend on that shape. The climate.station table is untouched here.
pub fn stations_since(client: &mut Client, cutoff: &str) -> Result<Vec<Value>, QueryError> {
    let rows = client.query(
        "SELECT date, prcp, station FROM climate.measurement WHERE date >= $1",
        &[&cutoff],
    )?;

    let mut flat = Vec::with_capacity(rows.len() * 3);
    for row in rows {
        let date: String = row.get(0);
        let prcp: Option<Decimal> = row.get(1);
        let station: String = row.get(2);

        flat.push(Value::String(date));
        flat.push(serde_json::json!(prcp.map(decimal_to_f64)));
        flat.push(Value::String(station));
    }

    Ok(flat)
}

/// Flat list of (date, station, tobs) values on or after `cutoff`,
/// interleaved in row order.
pub fn temperature_observations_since(
    client: &mut Client,
    cutoff: &str,
) -> Result<Vec<Value>, QueryError> {
    let rows = client.query(
        "SELECT date, station, tobs FROM climate.measurement WHERE date >= $1",
        &[&cutoff],
    )?;

    let mut flat = Vec::with_capacity(rows.len() * 3);
    for row in rows {
        let date: String = row.get(0);
        let station: String = row.get(1);
        let tobs: Decimal = row.get(2);

        flat.push(Value::String(date));
        flat.push(Value::String(station));
        flat.push(serde_json::json!(decimal_to_f64(tobs)));
    }

    Ok(flat)
}

/// `[min, avg, max]` of temperature observations with `date >= start`,
/// restricted to `date <= end` when an end date is given.
///
/// Empty-safe: SQL MIN/AVG/MAX over zero rows are NULL, so a range that
/// matches nothing yields `[None, None, None]` rather than an error.
pub fn temperature_stats(
    client: &mut Client,
    start: &str,
    end: Option<&str>,
) -> Result<[Option<f64>; 3], QueryError> {
    let row = match end {
        Some(end) => client.query_one(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM climate.measurement \
             WHERE date >= $1 AND date <= $2",
            &[&start, &end],
        )?,
        None => client.query_one(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM climate.measurement \
             WHERE date >= $1",
            &[&start],
        )?,
    };

    let min: Option<Decimal> = row.get(0);
    let avg: Option<Decimal> = row.get(1);
    let max: Option<Decimal> = row.get(2);

    Ok([
        min.map(decimal_to_f64),
        avg.map(decimal_to_f64),
        max.map(decimal_to_f64),
    ])
}

/// Convert a NUMERIC reading to f64 for JSON output.
fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
