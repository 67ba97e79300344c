use async_trait::async_trait;
use chrono::NaiveDate;

use crate::key::CacheKey;
use crate::record::{MarkOutcome, RefreshRecord};
use crate::CacheError;

#[async_trait]
pub trait UpdateCache: Send + Sync {
    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be read.
    async fn get_record(&self, key: &CacheKey) -> Result<Option<RefreshRecord>, CacheError>;

    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be read.
    async fn has_been_updated(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.get_record(key).await?.is_some())
    }

    /// Atomic insert-if-absent. Only the first caller for a key records its
    /// bird name; later callers get [`MarkOutcome::AlreadyPresent`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be written.
    async fn mark_updated(&self, key: &CacheKey, bird_name: &str)
        -> Result<MarkOutcome, CacheError>;

    /// Delete records whose local date is strictly before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be written.
    async fn purge_before(&self, cutoff: NaiveDate) -> Result<u64, CacheError>;

    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unreachable.
    async fn health_check(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
