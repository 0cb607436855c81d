//! Relational task tracker: schema, query catalog, seeding and demo script.

pub mod demo;
pub mod model;
pub mod queries;
pub mod schema;
pub mod seed;

pub use demo::run_demo;
pub use model::{
    DEFAULT_STATUS, StatusCount, Task, TaskStatus, TaskTitle, TaskWithEmail, TaskWithStatus, User,
    UserTaskCount, UserTaskTitle,
};
pub use queries::TaskQueries;
pub use schema::create_schema;
pub use seed::{SeedOptions, SeedReport, seed};
