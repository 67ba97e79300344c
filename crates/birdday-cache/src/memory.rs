//! Single-process backend.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use birdday_core::{Clock, SystemClock};
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::key::CacheKey;
use crate::record::{MarkOutcome, RefreshRecord};
use crate::store::UpdateCache;
use crate::CacheError;

/// Mutex-guarded map. Records do not survive a restart.
pub struct MemoryUpdateCache {
    records: Mutex<HashMap<CacheKey, RefreshRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryUpdateCache {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl Default for MemoryUpdateCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl UpdateCache for MemoryUpdateCache {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_record(&self, key: &CacheKey) -> Result<Option<RefreshRecord>, CacheError> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn mark_updated(
        &self,
        key: &CacheKey,
        bird_name: &str,
    ) -> Result<MarkOutcome, CacheError> {
        let mut records = self.records.lock().await;
        match records.entry(key.clone()) {
            Entry::Occupied(_) => Ok(MarkOutcome::AlreadyPresent),
            Entry::Vacant(slot) => {
                slot.insert(RefreshRecord::new(key, bird_name, self.clock.now()));
                Ok(MarkOutcome::Created)
            }
        }
    }

    async fn purge_before(&self, cutoff: NaiveDate) -> Result<u64, CacheError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|key, _| key.local_date >= cutoff);
        Ok(u64::try_from(before - records.len()).unwrap_or(u64::MAX))
    }
}
