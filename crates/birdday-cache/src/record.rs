use birdday_core::LocationKey;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::key::CacheKey;

/// "This card was refreshed for this place on this day." Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshRecord {
    pub card_id: String,
    pub local_date: NaiveDate,
    pub location_key: LocationKey,
    pub bird_name: String,
    pub created_at: DateTime<Utc>,
}

impl RefreshRecord {
    #[must_use]
    pub fn new(key: &CacheKey, bird_name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            card_id: key.card_id.clone(),
            local_date: key.local_date,
            location_key: key.location_key.clone(),
            bird_name: bird_name.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn key(&self) -> CacheKey {
        CacheKey::new(
            self.card_id.clone(),
            self.local_date,
            self.location_key.clone(),
        )
    }
}

/// Result of [`crate::UpdateCache::mark_updated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// This call wrote the record.
    Created,
    /// A record already existed; nothing was written.
    AlreadyPresent,
}
