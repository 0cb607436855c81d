use std::future::Future;
use std::pin::Pin;

use deadpool_postgres::Pool;
use tracing::{debug, warn};

use crate::config::PgSettings;
use crate::error::TaskDbError;

use super::config::create_pool;
use super::params::SqlParam;
use super::transaction::{FromPgRow, Tx, begin_transaction};

/// Future returned by work run inside [`PgProvider::scoped`].
pub type ScopeFuture<'t, T> = Pin<Box<dyn Future<Output = Result<T, TaskDbError>> + 't>>;

/// Hands out scoped connections: commit on success, roll back on error,
/// and give the connection back to the pool either way.
#[derive(Clone)]
pub struct PgProvider {
    pool: Pool,
}

impl PgProvider {
    /// # Errors
    /// Returns the errors of [`create_pool`].
    pub fn new(settings: &PgSettings) -> Result<Self, TaskDbError> {
        Ok(Self {
            pool: create_pool(settings)?,
        })
    }

    /// Run `work` inside one transaction on one pooled connection.
    ///
    /// ```rust,no_run
    /// # use cattask::postgres::{PgProvider, SqlParam};
    /// # async fn demo(provider: &PgProvider) -> Result<(), cattask::TaskDbError> {
    /// let touched = provider
    ///     .scoped(|tx| Box::pin(async move {
    ///         let params = [SqlParam::from("Ann"), SqlParam::from(1)];
    ///         tx.execute("UPDATE users SET fullname = $1 WHERE id = $2", &params)
    ///             .await
    ///     }))
    ///     .await?;
    /// # let _ = touched;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns the pool or begin error, the error produced by `work` (after
    /// rolling back), or the commit error.
    pub async fn scoped<T, F>(&self, work: F) -> Result<T, TaskDbError>
    where
        F: for<'t> FnOnce(&'t Tx<'t>) -> ScopeFuture<'t, T>,
    {
        let mut conn = self.pool.get().await?;
        let tx = begin_transaction(&mut conn).await?;
        debug!("transaction started");

        let outcome = work(&tx).await;
        match outcome {
            Ok(value) => {
                tx.commit().await?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("rollback failed after `{err}`: {rollback_err}");
                } else {
                    debug!("transaction rolled back: {err}");
                }
                Err(err)
            }
        }
    }

    /// Run one statement in its own scope and decode every row.
    ///
    /// # Errors
    /// Propagates any execution or decoding error after rollback.
    pub async fn fetch_all<T>(
        &self,
        sql: &'static str,
        params: Vec<SqlParam>,
    ) -> Result<Vec<T>, TaskDbError>
    where
        T: FromPgRow + 'static,
    {
        self.scoped(move |tx| Box::pin(async move { tx.fetch_all(sql, &params).await }))
            .await
    }

    /// Run one statement in its own scope and decode the first row, if any.
    ///
    /// # Errors
    /// Propagates any execution or decoding error after rollback.
    pub async fn fetch_optional<T>(
        &self,
        sql: &'static str,
        params: Vec<SqlParam>,
    ) -> Result<Option<T>, TaskDbError>
    where
        T: FromPgRow + 'static,
    {
        self.scoped(move |tx| Box::pin(async move { tx.fetch_optional(sql, &params).await }))
            .await
    }

    /// Run one statement in its own scope and return the affected row count.
    ///
    /// # Errors
    /// Propagates any execution error after rollback.
    pub async fn execute(
        &self,
        sql: &'static str,
        params: Vec<SqlParam>,
    ) -> Result<u64, TaskDbError> {
        self.scoped(move |tx| Box::pin(async move { tx.execute(sql, &params).await }))
            .await
    }

    /// Run a batch of statements in one scope.
    ///
    /// # Errors
    /// Propagates any execution error after rollback.
    pub async fn execute_batch(&self, sql: &'static str) -> Result<(), TaskDbError> {
        self.scoped(move |tx| Box::pin(async move { tx.execute_batch(sql).await }))
            .await
    }
}
