use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, error, info, warn};

use crate::config::MongoSettings;
use crate::error::CatStoreError;

use super::model::Cat;
use super::store::CatStore;

/// MongoDB server code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// `CatStore` backed by a MongoDB collection.
///
/// Holds the client for as long as the store lives. Writes go through the
/// typed collection; reads fetch raw documents and decode them one by one so
/// a single malformed document cannot hide the rest.
pub struct MongoCatStore {
    client: Client,
    collection: Collection<Cat>,
    documents: Collection<Document>,
}

impl MongoCatStore {
    /// Connect, select the collection, and make sure `name` is uniquely indexed.
    ///
    /// The driver connects lazily, so an unreachable server shows up here as
    /// a failed index creation.
    ///
    /// # Errors
    /// `CatStoreError::Config` for a missing or malformed URI,
    /// `CatStoreError::Connection` when no server can be reached, or
    /// `CatStoreError::Mongo` for anything else.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, CatStoreError> {
        let uri = settings.connection_uri()?;
        let mut options = ClientOptions::parse(uri).await.map_err(classify)?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        let client = Client::with_options(options).map_err(classify)?;
        let collection = client
            .database(&settings.db_name)
            .collection::<Cat>(&settings.collection);
        let documents = collection.clone_with_type::<Document>();

        let store = Self {
            client,
            collection,
            documents,
        };
        store.ensure_unique_name().await?;
        info!("connected to {}.{}", settings.db_name, settings.collection);
        Ok(store)
    }

    async fn ensure_unique_name(&self) -> Result<(), CatStoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await.map_err(classify)?;
        debug!("unique index on `name` is in place");
        Ok(())
    }

    /// Drop the whole collection, index included.
    ///
    /// # Errors
    /// Returns the driver error.
    pub async fn drop_collection(&self) -> Result<(), CatStoreError> {
        self.collection.drop().await.map_err(classify)
    }

    /// Close the client's connections.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }

    async fn update_by_name(&self, name: &str, update: Document) -> bool {
        match self.collection.update_one(by_name(name), update).await {
            Ok(res) => res.modified_count == 1,
            Err(err) => {
                error!("[UPDATE ERROR] {err}");
                false
            }
        }
    }
}

fn by_name(name: &str) -> Document {
    doc! { "name": name }
}

fn set_age(age: i32) -> Document {
    doc! { "$set": { "age": age } }
}

fn add_feature_once(feature: &str) -> Document {
    doc! { "$addToSet": { "features": feature } }
}

/// Decode a stored document, tolerating numeric ages of any BSON width.
///
/// Fails when `name` is missing, `age` is not a whole number in `i32`
/// range, or `features` is not an array.
fn cat_from_document(document: &Document) -> Result<Cat, CatStoreError> {
    let name = document
        .get_str("name")
        .map_err(|err| CatStoreError::Other(format!("bad `name`: {err}")))?;
    let age = match document.get("age") {
        Some(Bson::Int32(age)) => Some(*age),
        Some(Bson::Int64(age)) => i32::try_from(*age).ok(),
        Some(Bson::Double(age)) if age.fract() == 0.0 => i32::try_from(*age as i64).ok(),
        _ => None,
    }
    .ok_or_else(|| {
        CatStoreError::Other(format!("bad `age` for {name}: {:?}", document.get("age")))
    })?;
    let features = match document.get("features") {
        None | Some(Bson::Null) => Vec::new(),
        Some(Bson::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(other) => {
            return Err(CatStoreError::Other(format!(
                "bad `features` for {name}: {other}"
            )));
        }
    };

    let mut cat = Cat::new(name, age, features);
    cat.id = document.get_object_id("_id").ok();
    Ok(cat)
}

fn decode_or_skip(document: &Document) -> Option<Cat> {
    match cat_from_document(document) {
        Ok(cat) => Some(cat),
        Err(err) => {
            warn!("[READ ERROR] skipping document {:?}: {err}", document.get("_id"));
            None
        }
    }
}

#[async_trait]
impl CatStore for MongoCatStore {
    async fn list_all(&self) -> Vec<Cat> {
        let cursor = match self.documents.find(doc! {}).await {
            Ok(cursor) => cursor,
            Err(err) => {
                error!("[READ ERROR] {err}");
                return Vec::new();
            }
        };
        match cursor.try_collect::<Vec<Document>>().await {
            Ok(documents) => documents.iter().filter_map(decode_or_skip).collect(),
            Err(err) => {
                error!("[READ ERROR] {err}");
                Vec::new()
            }
        }
    }

    async fn find_by_name(&self, name: &str) -> Option<Cat> {
        match self.documents.find_one(by_name(name)).await {
            Ok(found) => found.as_ref().and_then(decode_or_skip),
            Err(err) => {
                error!("[READ ERROR] {err}");
                None
            }
        }
    }

    async fn update_age(&self, name: &str, age: i32) -> bool {
        self.update_by_name(name, set_age(age)).await
    }

    async fn add_feature(&self, name: &str, feature: &str) -> bool {
        self.update_by_name(name, add_feature_once(feature)).await
    }

    async fn delete_by_name(&self, name: &str) -> bool {
        match self.collection.delete_one(by_name(name)).await {
            Ok(res) => res.deleted_count == 1,
            Err(err) => {
                error!("[DELETE ERROR] {err}");
                false
            }
        }
    }

    async fn delete_all(&self) -> u64 {
        match self.collection.delete_many(doc! {}).await {
            Ok(res) => res.deleted_count,
            Err(err) => {
                error!("[DELETE ERROR] {err}");
                0
            }
        }
    }

    async fn estimated_count(&self) -> Result<u64, CatStoreError> {
        self.collection
            .estimated_document_count()
            .await
            .map_err(classify)
    }

    async fn insert_one(&self, cat: Cat) -> Result<(), CatStoreError> {
        self.collection.insert_one(cat).await.map_err(classify)?;
        Ok(())
    }

    async fn insert_many(&self, cats: Vec<Cat>) -> Result<usize, CatStoreError> {
        let res = self
            .collection
            .insert_many(cats)
            .ordered(false)
            .await
            .map_err(classify)?;
        Ok(res.inserted_ids.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorClass {
    Config,
    Connection,
    DuplicateKey,
    Other,
}

fn class_of(kind: &ErrorKind) -> ErrorClass {
    match kind {
        ErrorKind::InvalidArgument { .. } | ErrorKind::DnsResolve { .. } => ErrorClass::Config,
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::Authentication { .. } => ErrorClass::Connection,
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            ErrorClass::DuplicateKey
        }
        ErrorKind::InsertMany(failure)
            if failure.write_concern_error.is_none()
                && failure
                    .write_errors
                    .as_ref()
                    .is_some_and(|errs| errs.iter().all(|w| w.code == DUPLICATE_KEY)) =>
        {
            ErrorClass::DuplicateKey
        }
        _ => ErrorClass::Other,
    }
}

/// Sort a driver error into the categories the console reports.
fn classify(err: MongoError) -> CatStoreError {
    match class_of(&err.kind) {
        ErrorClass::Config => CatStoreError::Config(err.to_string()),
        ErrorClass::Connection => CatStoreError::Connection(err.to_string()),
        ErrorClass::DuplicateKey => CatStoreError::DuplicateKey(err.to_string()),
        ErrorClass::Other => CatStoreError::Mongo(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::from_document;
    use mongodb::bson::oid::ObjectId;
    use mongodb::error::{InsertManyError, WriteError};
    use std::sync::Arc;

    fn write_error(code: i32) -> MongoError {
        let write: WriteError =
            from_document(doc! { "code": code, "errmsg": "E11000 duplicate key error" }).unwrap();
        MongoError::from(ErrorKind::Write(WriteFailure::WriteError(write)))
    }

    fn insert_many_error(failure: Document) -> MongoError {
        let failure: InsertManyError = from_document(failure).unwrap();
        MongoError::from(ErrorKind::InsertMany(failure))
    }

    #[test]
    fn duplicate_single_insert_is_a_duplicate_key() {
        let err = classify(write_error(DUPLICATE_KEY));
        assert!(err.is_duplicate_key());
        assert_eq!(err.label(), "UNEXPECTED ERROR");
    }

    #[test]
    fn other_write_errors_stay_unexpected() {
        assert!(matches!(classify(write_error(121)), CatStoreError::Mongo(_)));
    }

    #[test]
    fn bulk_insert_of_only_taken_names_is_a_duplicate_key() {
        let err = insert_many_error(doc! {
            "writeErrors": [
                { "index": 0, "code": DUPLICATE_KEY },
                { "index": 2, "code": DUPLICATE_KEY },
            ]
        });
        assert_eq!(class_of(&err.kind), ErrorClass::DuplicateKey);
    }

    #[test]
    fn bulk_insert_with_mixed_failures_is_unexpected() {
        let mixed = insert_many_error(doc! {
            "writeErrors": [
                { "index": 0, "code": DUPLICATE_KEY },
                { "index": 1, "code": 121 },
            ]
        });
        assert_eq!(class_of(&mixed.kind), ErrorClass::Other);

        let concern = insert_many_error(doc! {
            "writeErrors": [{ "index": 0, "code": DUPLICATE_KEY }],
            "writeConcernError": { "code": 64, "errmsg": "waiting for replication timed out" },
        });
        assert_eq!(class_of(&concern.kind), ErrorClass::Other);
    }

    #[test]
    fn io_failures_are_connection_errors() {
        let err = MongoError::from(ErrorKind::Io(Arc::new(std::io::Error::other("reset"))));
        assert_eq!(classify(err).label(), "CONNECTION ERROR");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let settings = MongoSettings::with_uri(
            "mongodb://127.0.0.1:1/?directConnection=true&serverSelectionTimeoutMS=200",
        );
        let err = match MongoCatStore::connect(&settings).await {
            Ok(_) => panic!("nothing listens on port 1"),
            Err(err) => err,
        };
        assert_eq!(err.label(), "CONNECTION ERROR");
    }

    #[tokio::test]
    async fn malformed_uri_fails_before_connecting() {
        let settings = MongoSettings::with_uri("mongodb://localhost:notaport");
        let err = match MongoCatStore::connect(&settings).await {
            Ok(_) => panic!("a non-numeric port must not parse"),
            Err(err) => err,
        };
        assert_eq!(err.label(), "CONFIG ERROR");
    }

    #[tokio::test]
    async fn placeholder_uri_is_rejected() {
        let settings = MongoSettings::with_uri("7");
        assert!(matches!(
            MongoCatStore::connect(&settings).await,
            Err(CatStoreError::Config(_))
        ));
    }

    #[test]
    fn update_documents() {
        assert_eq!(by_name("barsik"), doc! { "name": "barsik" });
        assert_eq!(set_age(4), doc! { "$set": { "age": 4 } });
        assert_eq!(
            add_feature_once("sleepy"),
            doc! { "$addToSet": { "features": "sleepy" } }
        );
    }

    #[test]
    fn decodes_double_and_long_ages() {
        let id = ObjectId::new();
        let murka = cat_from_document(&doc! {
            "_id": id,
            "name": "Murka",
            "age": 4.0,
            "features": ["сіра"],
        })
        .unwrap();
        assert_eq!(murka.age, 4);
        assert_eq!(murka.id, Some(id));
        assert_eq!(murka.features, ["сіра"]);

        let tom = cat_from_document(&doc! { "name": "Tom", "age": 7_i64 }).unwrap();
        assert_eq!(tom.age, 7);
        assert!(tom.features.is_empty());
        assert_eq!(tom.id, None);
    }

    #[test]
    fn skips_non_string_features() {
        let cat = cat_from_document(&doc! {
            "name": "Liza",
            "age": 4,
            "features": ["білий", 3, "дає себе гладити"],
        })
        .unwrap();
        assert_eq!(cat.features, ["білий", "дає себе гладити"]);
    }

    #[test]
    fn rejects_documents_without_usable_name_or_age() {
        assert!(cat_from_document(&doc! { "age": 3 }).is_err());
        assert!(cat_from_document(&doc! { "name": "Lama" }).is_err());
        assert!(cat_from_document(&doc! { "name": "Lama", "age": 2.5 }).is_err());
        assert!(cat_from_document(&doc! { "name": "Lama", "age": "two" }).is_err());
        assert!(cat_from_document(&doc! { "name": "Lama", "age": 2, "features": "grey" }).is_err());
        assert!(decode_or_skip(&doc! { "name": "Lama", "age": 1e12 }).is_none());
    }
}
