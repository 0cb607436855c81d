use async_trait::async_trait;

use crate::error::CatStoreError;

use super::model::Cat;

/// Commands over the cats collection, keyed by `name`.
///
/// The six CRUD commands are fail-soft: an implementation logs a store
/// failure under its category (`[READ ERROR]`, `[UPDATE ERROR]`,
/// `[DELETE ERROR]`) and returns the empty/false/zero value instead of an
/// error. The insert and count primitives used for seeding do return errors.
#[async_trait]
pub trait CatStore: Send + Sync {
    /// Every document; empty when the collection is empty or unreadable.
    async fn list_all(&self) -> Vec<Cat>;

    /// The document named exactly `name`.
    async fn find_by_name(&self, name: &str) -> Option<Cat>;

    /// Set `age`; true only if exactly one document was modified.
    async fn update_age(&self, name: &str, age: i32) -> bool;

    /// Add `feature` with set semantics; true only if a document was modified.
    async fn add_feature(&self, name: &str, feature: &str) -> bool;

    /// Delete the document named `name`; true if one was removed.
    async fn delete_by_name(&self, name: &str) -> bool;

    /// Delete every document and return how many were removed.
    async fn delete_all(&self) -> u64;

    /// Cheap document count, as reported by collection metadata.
    async fn estimated_count(&self) -> Result<u64, CatStoreError>;

    /// # Errors
    /// `CatStoreError::DuplicateKey` when the name is taken.
    async fn insert_one(&self, cat: Cat) -> Result<(), CatStoreError>;

    /// Unordered bulk insert: every document that can be stored is stored.
    ///
    /// # Errors
    /// `CatStoreError::DuplicateKey` when the only failures were taken names.
    async fn insert_many(&self, cats: Vec<Cat>) -> Result<usize, CatStoreError>;
}
