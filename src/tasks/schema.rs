use crate::error::TaskDbError;
use crate::postgres::PgProvider;

/// DDL for the task tracker. Drops existing tables first so reruns start clean.
pub const SCHEMA_DDL: &str = "
DROP TABLE IF EXISTS tasks CASCADE;
DROP TABLE IF EXISTS status CASCADE;
DROP TABLE IF EXISTS users CASCADE;

CREATE TABLE users (
    id        SERIAL PRIMARY KEY,
    fullname  VARCHAR(100) NOT NULL,
    email     VARCHAR(100) NOT NULL UNIQUE
);

CREATE TABLE status (
    id    SERIAL PRIMARY KEY,
    name  VARCHAR(50) NOT NULL UNIQUE
);

CREATE TABLE tasks (
    id          SERIAL PRIMARY KEY,
    title       VARCHAR(100) NOT NULL,
    description TEXT,
    status_id   INTEGER NOT NULL REFERENCES status(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    user_id     INTEGER NOT NULL REFERENCES users(id)  ON UPDATE CASCADE ON DELETE CASCADE
);
";

/// (Re)create `users`, `status` and `tasks`.
///
/// # Errors
/// Propagates any execution error after rollback.
pub async fn create_schema(provider: &PgProvider) -> Result<(), TaskDbError> {
    provider.execute_batch(SCHEMA_DDL).await?;
    tracing::info!("schema created");
    Ok(())
}
