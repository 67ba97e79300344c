//! Postgres backend over the `refresh_records` table.

use std::sync::Arc;

use async_trait::async_trait;
use birdday_core::{Clock, LocationKey, SystemClock};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::key::CacheKey;
use crate::record::{MarkOutcome, RefreshRecord};
use crate::store::UpdateCache;
use crate::CacheError;

/// A row from the `refresh_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RefreshRecordRow {
    card_id: String,
    local_date: NaiveDate,
    location_key: String,
    bird_name: String,
    created_at: DateTime<Utc>,
}

impl From<RefreshRecordRow> for RefreshRecord {
    fn from(row: RefreshRecordRow) -> Self {
        Self {
            card_id: row.card_id,
            local_date: row.local_date,
            location_key: LocationKey::from(row.location_key),
            bird_name: row.bird_name,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgUpdateCache {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgUpdateCache {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl UpdateCache for PgUpdateCache {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_record(&self, key: &CacheKey) -> Result<Option<RefreshRecord>, CacheError> {
        let row = sqlx::query_as::<_, RefreshRecordRow>(
            "SELECT card_id, local_date, location_key, bird_name, created_at \
             FROM refresh_records \
             WHERE card_id = $1 AND local_date = $2 AND location_key = $3",
        )
        .bind(&key.card_id)
        .bind(key.local_date)
        .bind(key.location_key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshRecord::from))
    }

    async fn has_been_updated(&self, key: &CacheKey) -> Result<bool, CacheError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS ( \
                 SELECT 1 FROM refresh_records \
                 WHERE card_id = $1 AND local_date = $2 AND location_key = $3 \
             )",
        )
        .bind(&key.card_id)
        .bind(key.local_date)
        .bind(key.location_key.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Records are immutable once written, so `ON CONFLICT DO NOTHING` is the
    /// full strategy: the primary key serialises racing writers and the loser
    /// affects zero rows.
    async fn mark_updated(
        &self,
        key: &CacheKey,
        bird_name: &str,
    ) -> Result<MarkOutcome, CacheError> {
        let result = sqlx::query(
            "INSERT INTO refresh_records \
                 (card_id, local_date, location_key, bird_name, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (card_id, local_date, location_key) DO NOTHING",
        )
        .bind(&key.card_id)
        .bind(key.local_date)
        .bind(key.location_key.as_str())
        .bind(bird_name)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await?;

        Ok(if result.rows_affected() == 1 {
            MarkOutcome::Created
        } else {
            MarkOutcome::AlreadyPresent
        })
    }

    async fn purge_before(&self, cutoff: NaiveDate) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM refresh_records WHERE local_date < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }
}
