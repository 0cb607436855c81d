use deadpool_postgres::{Object, Transaction as PgTransaction};
use tokio_postgres::Row;

use crate::error::TaskDbError;

use super::params::{SqlParam, as_refs};

/// Decode one result row into a typed record.
pub trait FromPgRow: Sized {
    /// # Errors
    /// Returns an error if a column is missing or has an unexpected type.
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;
}

/// Lightweight transaction wrapper handed to scoped work.
pub struct Tx<'a> {
    tx: PgTransaction<'a>,
}

/// Begin a new transaction on the provided Postgres connection.
///
/// # Errors
/// Returns an error if creating the transaction fails.
pub async fn begin_transaction(conn: &mut Object) -> Result<Tx<'_>, TaskDbError> {
    let tx = conn.transaction().await?;
    Ok(Tx { tx })
}

impl Tx<'_> {
    /// Run a parameterized statement and decode every returned row.
    ///
    /// # Errors
    /// Returns an error if preparing, executing, or decoding fails.
    pub async fn fetch_all<T: FromPgRow>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<T>, TaskDbError> {
        let stmt = self.tx.prepare_cached(sql).await?;
        let rows = self.tx.query(&stmt, &as_refs(params)).await?;
        rows.iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(TaskDbError::from)
    }

    /// Run a statement and decode the first returned row, if any.
    ///
    /// # Errors
    /// Returns an error if preparing, executing, or decoding fails.
    pub async fn fetch_optional<T: FromPgRow>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<T>, TaskDbError> {
        let stmt = self.tx.prepare_cached(sql).await?;
        let row = self.tx.query_opt(&stmt, &as_refs(params)).await?;
        row.as_ref().map(T::from_row).transpose().map_err(TaskDbError::from)
    }

    /// Execute a parameterized statement and return the affected row count.
    ///
    /// # Errors
    /// Returns an error if preparing or executing fails.
    pub async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64, TaskDbError> {
        let stmt = self.tx.prepare_cached(sql).await?;
        Ok(self.tx.execute(&stmt, &as_refs(params)).await?)
    }

    /// Execute a batch of unparameterized SQL statements.
    ///
    /// # Errors
    /// Returns an error if execution fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), TaskDbError> {
        self.tx.batch_execute(sql).await?;
        Ok(())
    }

    /// Commit the transaction.
    ///
    /// # Errors
    /// Returns an error if commit fails.
    pub async fn commit(self) -> Result<(), TaskDbError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Roll back the transaction.
    ///
    /// # Errors
    /// Returns an error if rollback fails.
    pub async fn rollback(self) -> Result<(), TaskDbError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl FromPgRow for i32 {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        row.try_get(0)
    }
}

impl FromPgRow for i64 {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        row.try_get(0)
    }
}
