/// Database layer for Orgdesk
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: sqlx migration runner and dev-database helpers

pub mod migrations;
pub mod pool;
