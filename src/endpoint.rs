/// HTTP endpoint for the fixed climate query routes
///
/// A thin router over the data access layer: each route maps to one
/// query and serializes the result list as a JSON array. There is no
/// write path and no route beyond the fixed set.
///
/// Endpoints:
/// - GET /                            - Plain-text route listing
/// - GET /api/v1.0/precipitation      - Last year of precipitation records
/// - GET /api/v1.0/stations           - Flattened last-year measurement tuples
/// - GET /api/v1.0/tobs               - Last year of temperature observations
/// - GET /api/v1.0/temp/{start}       - Min/avg/max tobs from a start date
/// - GET /api/v1.0/temp/{start}/{end} - Min/avg/max tobs over a date range

use crate::db;
use crate::queries;
use chrono::NaiveDate;

/// Help text served at `/`. Static; it reflects the route table, never
/// the database.
const HELP_TEXT: &str = "\
Climate Analysis API

Available routes:
  /api/v1.0/precipitation
  /api/v1.0/stations
  /api/v1.0/tobs
  /api/v1.0/temp/<start>
  /api/v1.0/temp/<start>/<end>

Dates are YYYY-MM-DD.
";

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the HTTP server on the specified port and serve requests until
/// the process is stopped.
///
/// `latest` is the most recent measurement date, cached once at startup;
/// the window routes derive "one year before latest" from it on every
/// request. Each request that reads data opens a fresh database
/// connection, released when the handler scope ends.
pub fn start_endpoint_server(port: u16, latest: NaiveDate) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /                       - API help");
    println!("   GET /api/v1.0/precipitation - Last year of precipitation");
    println!("   GET /api/v1.0/stations      - Flattened measurement tuples");
    println!("   GET /api/v1.0/tobs          - Last year of temperature obs");
    println!("   GET /api/v1.0/temp/{{start}}[/{{end}}] - Temperature min/avg/max\n");

    for request in server.incoming_requests() {
        let response = route_request(request.url(), latest);

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Map a request path to its handler.
fn route_request(url: &str, latest: NaiveDate) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    if url == "/" {
        handle_index()
    } else if url == "/api/v1.0/precipitation" {
        handle_precipitation(latest)
    } else if url == "/api/v1.0/stations" {
        handle_stations(latest)
    } else if url == "/api/v1.0/tobs" {
        handle_tobs(latest)
    } else if let Some((start, end)) = parse_temp_params(url) {
        handle_temp_stats(&start, end.as_deref())
    } else {
        create_response(
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": [
                    "/",
                    "/api/v1.0/precipitation",
                    "/api/v1.0/stations",
                    "/api/v1.0/tobs",
                    "/api/v1.0/temp/{start}",
                    "/api/v1.0/temp/{start}/{end}"
                ]
            }),
        )
    }
}

/// Extract `{start}` and optional `{end}` from a `/api/v1.0/temp/...`
/// path. The date strings are not validated beyond being nonempty; they
/// are handed to the query as-is.
///
/// Empty segments, trailing slashes, and extra segments are rejected, so
/// `/api/v1.0/temp/` and `/api/v1.0/temp/a/b/c` both fall through to 404.
fn parse_temp_params(url: &str) -> Option<(String, Option<String>)> {
    let rest = url.strip_prefix("/api/v1.0/temp/")?;

    let mut segments = rest.split('/');
    let start = segments.next().filter(|s| !s.is_empty())?;
    let end = segments.next();

    // A third segment is not a recognized route
    if segments.next().is_some() {
        return None;
    }

    match end {
        None => Some((start.to_string(), None)),
        Some("") => None, // trailing slash
        Some(end) => Some((start.to_string(), Some(end.to_string()))),
    }
}

// ---------------------------------------------------------------------------
// Route Handlers
// ---------------------------------------------------------------------------

/// Handle `/`: static help text, served without touching the database.
fn handle_index() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    tiny_http::Response::from_string(HELP_TEXT)
}

/// Handle `/api/v1.0/precipitation`: one record per reading in the window.
fn handle_precipitation(latest: NaiveDate) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut client = match db::connect_simple() {
        Ok(client) => client,
        Err(e) => return error_response(&e.to_string()),
    };

    let cutoff = queries::reporting_window_start(latest);
    match queries::precipitation_since(&mut client, &cutoff) {
        Ok(records) => create_response(200, serde_json::to_value(&records).unwrap()),
        Err(e) => error_response(&e.to_string()),
    }
}

/// Handle `/api/v1.0/stations`: the flattened measurement tuples for
/// the window (see `queries::stations_since` for the shape this feed
/// has always had).
fn handle_stations(latest: NaiveDate) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut client = match db::connect_simple() {
        Ok(client) => client,
        Err(e) => return error_response(&e.to_string()),
    };

    let cutoff = queries::reporting_window_start(latest);
    match queries::stations_since(&mut client, &cutoff) {
        Ok(values) => create_response(200, serde_json::Value::Array(values)),
        Err(e) => error_response(&e.to_string()),
    }
}

/// Handle `/api/v1.0/tobs`: flattened temperature observations for the
/// window.
fn handle_tobs(latest: NaiveDate) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut client = match db::connect_simple() {
        Ok(client) => client,
        Err(e) => return error_response(&e.to_string()),
    };

    let cutoff = queries::reporting_window_start(latest);
    match queries::temperature_observations_since(&mut client, &cutoff) {
        Ok(values) => create_response(200, serde_json::Value::Array(values)),
        Err(e) => error_response(&e.to_string()),
    }
}

/// Handle `/api/v1.0/temp/{start}` and `/api/v1.0/temp/{start}/{end}`.
fn handle_temp_stats(start: &str, end: Option<&str>) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut client = match db::connect_simple() {
        Ok(client) => client,
        Err(e) => return error_response(&e.to_string()),
    };

    match queries::temperature_stats(&mut client, start, end) {
        Ok(stats) => create_response(200, serde_json::json!(stats)),
        Err(e) => error_response(&e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Response construction
// ---------------------------------------------------------------------------

/// Create an HTTP response with a JSON body.
fn create_response(status_code: u16, json: serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap()
        )
}

/// 500 response carrying the fault as a JSON error body.
fn error_response(message: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(500, serde_json::json!({ "error": message }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
