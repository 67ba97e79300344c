//! Time-based cleanup of old refresh records.

use chrono::{Days, NaiveDate};

use crate::store::UpdateCache;
use crate::CacheError;

/// First local date that survives a purge keeping `retention_days` days.
#[must_use]
pub fn retention_cutoff(today: NaiveDate, retention_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Remove every record older than the retention window.
///
/// # Errors
///
/// Returns [`CacheError`] when the backend cannot be written.
pub async fn purge_expired(
    cache: &dyn UpdateCache,
    today: NaiveDate,
    retention_days: u32,
) -> Result<u64, CacheError> {
    let cutoff = retention_cutoff(today, retention_days);
    let removed = cache.purge_before(cutoff).await?;
    tracing::info!(
        backend = cache.backend(),
        %cutoff,
        removed,
        "cache: purged expired refresh records"
    );
    Ok(removed)
}
