//! Connection settings for both stores.
//!
//! Each struct derives [`clap::Args`] so binaries can flatten it into their
//! parser; every field is also read from the environment variable the
//! original deployment used, and falls back to the same default.

use clap::Args;

use crate::error::CatStoreError;

pub const DEFAULT_PG_HOST: &str = "127.0.0.1";
pub const DEFAULT_PG_PORT: u16 = 5432;
pub const DEFAULT_PG_DATABASE: &str = "tasks_db";
pub const DEFAULT_PG_USER: &str = "postgres";
pub const DEFAULT_PG_PASSWORD: &str = "postgres";

pub const DEFAULT_MONGO_DB_NAME: &str = "book";
pub const DEFAULT_MONGO_COLLECTION: &str = "cats";

/// Postgres connection parameters for the task tracker.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PgSettings {
    #[arg(long = "pg-host", env = "PGHOST", default_value = DEFAULT_PG_HOST)]
    pub host: String,
    #[arg(long = "pg-port", env = "PGPORT", default_value_t = DEFAULT_PG_PORT)]
    pub port: u16,
    #[arg(long = "pg-database", env = "PGDATABASE", default_value = DEFAULT_PG_DATABASE)]
    pub dbname: String,
    #[arg(long = "pg-user", env = "PGUSER", default_value = DEFAULT_PG_USER)]
    pub user: String,
    #[arg(
        long = "pg-password",
        env = "PGPASSWORD",
        default_value = DEFAULT_PG_PASSWORD,
        hide_env_values = true
    )]
    pub password: String,
}

impl Default for PgSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_PG_HOST.to_string(),
            port: DEFAULT_PG_PORT,
            dbname: DEFAULT_PG_DATABASE.to_string(),
            user: DEFAULT_PG_USER.to_string(),
            password: DEFAULT_PG_PASSWORD.to_string(),
        }
    }
}

/// MongoDB connection parameters for the cats console.
///
/// There is no usable default URI: the historical placeholder value (`7`)
/// and anything else that is not a `mongodb://` or `mongodb+srv://` string
/// is treated as unset.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct MongoSettings {
    #[arg(long = "mongodb-uri", env = "MONGODB_URI", hide_env_values = true)]
    pub uri: Option<String>,
    #[arg(long = "db-name", env = "DB_NAME", default_value = DEFAULT_MONGO_DB_NAME)]
    pub db_name: String,
    #[arg(long = "collection", env = "COLLECTION_NAME", default_value = DEFAULT_MONGO_COLLECTION)]
    pub collection: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: None,
            db_name: DEFAULT_MONGO_DB_NAME.to_string(),
            collection: DEFAULT_MONGO_COLLECTION.to_string(),
        }
    }
}

impl MongoSettings {
    /// Settings pointing at `uri` with the default database and collection.
    #[must_use]
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Return the connection string, or a configuration error if none was supplied.
    ///
    /// # Errors
    /// Returns `CatStoreError::Config` when the URI is missing or is not a MongoDB URI.
    pub fn connection_uri(&self) -> Result<&str, CatStoreError> {
        let uri = self.uri.as_deref().map(str::trim).unwrap_or_default();
        if uri.is_empty() {
            return Err(CatStoreError::Config(
                "MONGODB_URI is not set; supply a mongodb:// or mongodb+srv:// connection string"
                    .to_string(),
            ));
        }
        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            return Err(CatStoreError::Config(format!(
                "MONGODB_URI must start with mongodb:// or mongodb+srv://, got {uri:?}"
            )));
        }
        if self.db_name.trim().is_empty() {
            return Err(CatStoreError::Config("DB_NAME is required".to_string()));
        }
        if self.collection.trim().is_empty() {
            return Err(CatStoreError::Config(
                "COLLECTION_NAME is required".to_string(),
            ));
        }
        Ok(uri)
    }
}

/// Load a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!("ignoring unreadable .env file: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        pg: PgSettings,
        #[command(flatten)]
        mongo: MongoSettings,
    }

    #[test]
    fn pg_defaults_match_original_deployment() {
        let settings = PgSettings::default();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.dbname, "tasks_db");
        assert_eq!(settings.user, "postgres");
        assert_eq!(settings.password, "postgres");
    }

    #[test]
    fn cli_flags_override_defaults() {
        let parsed = Harness::try_parse_from([
            "harness",
            "--pg-host",
            "db.internal",
            "--pg-port",
            "6543",
            "--mongodb-uri",
            "mongodb://localhost:27017",
            "--collection",
            "kittens",
        ])
        .unwrap();
        assert_eq!(parsed.pg.host, "db.internal");
        assert_eq!(parsed.pg.port, 6543);
        assert_eq!(parsed.mongo.collection, "kittens");
        assert_eq!(
            parsed.mongo.connection_uri().unwrap(),
            "mongodb://localhost:27017"
        );
    }

    #[test]
    fn placeholder_uri_counts_as_unset() {
        let err = MongoSettings::with_uri("7").connection_uri().unwrap_err();
        assert_eq!(err.label(), "CONFIG ERROR");

        let err = MongoSettings::default().connection_uri().unwrap_err();
        assert_eq!(err.label(), "CONFIG ERROR");

        let err = MongoSettings::with_uri("   ").connection_uri().unwrap_err();
        assert_eq!(err.label(), "CONFIG ERROR");
    }

    #[test]
    fn srv_uri_is_accepted() {
        let settings = MongoSettings::with_uri("mongodb+srv://user:pw@cluster0.example.net");
        assert_eq!(
            settings.connection_uri().unwrap(),
            "mongodb+srv://user:pw@cluster0.example.net"
        );
        assert_eq!(settings.db_name, "book");
        assert_eq!(settings.collection, "cats");
    }
}
