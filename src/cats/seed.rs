use tracing::{debug, error};

use super::model::sample_cats;
use super::store::CatStore;

/// Insert the sample cats when the collection looks empty.
///
/// Duplicate names are ignored (the unique index may already hold them);
/// any other failure is logged as `[SEED ERROR]`. Returns how many
/// documents were inserted.
pub async fn seed_sample_data<S: CatStore + ?Sized>(store: &S) -> usize {
    match store.estimated_count().await {
        Ok(0) => {}
        Ok(count) => {
            debug!("skipping seed: collection already holds ~{count} document(s)");
            return 0;
        }
        Err(err) => {
            error!("[SEED ERROR] {err}");
            return 0;
        }
    }

    match store.insert_many(sample_cats()).await {
        Ok(inserted) => inserted,
        Err(err) if err.is_duplicate_key() => {
            debug!("seed hit existing names: {err}");
            0
        }
        Err(err) => {
            error!("[SEED ERROR] {err}");
            0
        }
    }
}
