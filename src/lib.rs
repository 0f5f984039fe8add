/// climate_service: read-only HTTP API over archived climate observations.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── db       — DATABASE_URL loading, connection, setup validation
/// ├── queries  — fixed query set over the measurement archive
/// └── endpoint — HTTP routing and JSON serialization (tiny_http)
/// ```

/// Public modules
pub mod db;
pub mod endpoint;
pub mod queries;
