use super::super::SHARED_RUNTIME;
use crate::config::PgSettings;
use crate::postgres::PgProvider;
use crate::tasks::create_schema;

use postgresql_embedded::PostgreSQL;

/// A running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    /// Working settings with the server's real port and credentials
    pub settings: PgSettings,
}

impl EmbeddedPostgres {
    /// A fresh provider pointed at this instance.
    ///
    /// # Errors
    /// Returns pool construction errors.
    pub fn provider(&self) -> Result<PgProvider, crate::TaskDbError> {
        PgProvider::new(&self.settings)
    }
}

/// Start an embedded `PostgreSQL`, create `db_name`, and check it answers.
///
/// Call this outside any tokio runtime; it blocks on a shared one.
///
/// # Errors
/// Returns an error if the server cannot be set up or started, the database
/// cannot be created, or the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    db_name: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();

        // Bundled binaries, so no download happens here
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(db_name).await?;

        let server = postgresql.settings();
        let settings = PgSettings {
            host: server.host.clone(),
            port: server.port,
            dbname: db_name.to_string(),
            user: server.username.clone(),
            password: server.password.clone(),
        };
        tracing::info!("embedded PostgreSQL listening on port {}", settings.port);

        let provider = PgProvider::new(&settings)?;
        let one: Vec<i32> = provider.fetch_all("SELECT 1", vec![]).await?;
        if one != [1] {
            return Err("embedded PostgreSQL did not answer SELECT 1".into());
        }

        Ok(EmbeddedPostgres {
            postgresql,
            settings,
        })
    })
}

/// Start an embedded server and create the task tracker schema in it.
///
/// # Errors
/// See [`setup_postgres_embedded`]; also fails if the DDL fails.
pub fn setup_task_db(db_name: &str) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded(db_name)?;
    let provider = pg.provider()?;
    SHARED_RUNTIME.block_on(create_schema(&provider))?;
    Ok(pg)
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
