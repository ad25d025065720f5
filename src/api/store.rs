//! The content store seam the duplication engine is written against

use super::models::{Asset, ContentType, Entry, Fields};
use crate::error::StoreResult;
use async_trait::async_trait;

/// One environment of a content store.
///
/// Every call is a remote operation that may fail. The engine reads entries
/// from a source store and writes duplicates into a target store; both may be
/// the same environment.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Display name of the environment (used for protected environment checks)
    fn environment_name(&self) -> &str;

    /// Fails with [`crate::error::StoreError::NotFound`] when the id does not exist
    async fn get_entry(&self, id: &str) -> StoreResult<Entry>;

    async fn get_asset(&self, id: &str) -> StoreResult<Asset>;

    async fn get_content_types(&self) -> StoreResult<Vec<ContentType>>;

    /// Fails with [`crate::error::StoreError::Validation`] on schema violations
    async fn create_entry(&self, content_type_id: &str, fields: &Fields) -> StoreResult<Entry>;

    async fn publish_entry(&self, entry: &Entry) -> StoreResult<Entry>;

    /// Persist the entry's current fields
    async fn update_entry(&self, entry: &Entry) -> StoreResult<Entry>;
}
