use thiserror::Error;

/// Errors raised by the relational task tracker.
///
/// Nothing in the query layer catches these; they leave the scoped
/// acquisition after the transaction has been rolled back.
#[derive(Debug, Error)]
pub enum TaskDbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolError(#[from] deadpool_postgres::PoolError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Seeding error: {0}")]
    SeedError(String),
}

/// Errors raised by the cats document store.
///
/// Only connecting and the seeding primitives surface these; the CRUD
/// commands log them and return a benign value instead.
#[derive(Debug, Error)]
pub enum CatStoreError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Connection(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[cfg(feature = "mongo")]
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("{0}")]
    Other(String),
}

impl CatStoreError {
    /// Category printed in front of fatal connect failures.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CatStoreError::Config(_) => "CONFIG ERROR",
            CatStoreError::Connection(_) => "CONNECTION ERROR",
            _ => "UNEXPECTED ERROR",
        }
    }

    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, CatStoreError::DuplicateKey(_))
    }
}
