// PostgreSQL connection provider for the task tracker.
//
// - config: pool setup from `PgSettings`
// - params: positional statement parameters
// - transaction: transaction wrapper and row decoding
// - provider: scoped acquisition (commit / rollback / release)

pub mod config;
pub mod params;
pub mod provider;
pub mod transaction;

pub use config::create_pool;
pub use params::SqlParam;
pub use provider::{PgProvider, ScopeFuture};
pub use transaction::{FromPgRow, Tx};
