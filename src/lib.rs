//! Two small data-access demos sharing one crate.
//!
//! * [`cats`]: a MongoDB-backed CRUD console over a `cats` collection.
//!   Store failures are logged and turned into empty/false/zero results.
//! * [`tasks`]: a PostgreSQL task tracker with a fixed query catalog,
//!   seeding and a demo script. Store failures roll back and propagate.
//!
//! Both sides read their connection settings from [`config`].

pub mod cats;
pub mod config;
pub mod error;
pub mod logging;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "postgres")]
pub mod tasks;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{MongoSettings, PgSettings};
pub use error::{CatStoreError, TaskDbError};
