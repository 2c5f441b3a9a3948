/// Database models for Orgdesk
///
/// One module per entity, each holding the record struct, its
/// `Create*`/`Update*` inputs and the SQL queries that back them. Query
/// methods take `impl PgExecutor` so they run against a pool or inside a
/// transaction; the `ops` layer owns transaction boundaries and the cached
/// counter upkeep, models never mutate anything beyond their own rows.
///
/// # Models
///
/// - `company`: companies with cached department/employee counters
/// - `department`: departments with a cached employee counter
/// - `employee`: employees and the onboarding status state machine
/// - `user`: user accounts with roles
/// - `revoked_token`: refresh-token denylist entries

pub mod company;
pub mod department;
pub mod employee;
pub mod revoked_token;
pub mod user;
