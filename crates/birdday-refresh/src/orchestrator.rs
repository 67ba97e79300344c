//! One refresh, start to finish.
//!
//! `resolve location → local day → cache check → select → publish → mark`.
//! The cache is consulted before any collaborator call and written only
//! after a successful publish, so the cache write is the single point
//! where concurrent invocations for the same card meet.

use std::sync::Arc;

use birdday_cache::{CacheKey, MarkOutcome, UpdateCache};
use birdday_core::{Location, TriggerKind};
use birdday_geo::{ClientSignal, LocalCalendar, LocalDay, LocationCascade, ResolvedLocation, Tier};
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::RefreshError;
use crate::publisher::ContentPublisher;
use crate::selector::BirdSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    Success,
    AlreadyUpdated,
    Error,
}

impl std::fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshStatus::Success => write!(f, "success"),
            RefreshStatus::AlreadyUpdated => write!(f, "already_updated"),
            RefreshStatus::Error => write!(f, "error"),
        }
    }
}

/// The collaborator that failed when the status is [`RefreshStatus::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    Selection,
    Publish,
}

#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub trigger: TriggerKind,
    pub card_id: String,
    pub client: ClientSignal,
    pub device_timezone: Option<String>,
}

impl RefreshRequest {
    #[must_use]
    pub fn new(trigger: TriggerKind, card_id: impl Into<String>) -> Self {
        Self {
            trigger,
            card_id: card_id.into(),
            client: ClientSignal::default(),
            device_timezone: None,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: ClientSignal) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_device_timezone(mut self, timezone: Option<String>) -> Self {
        self.device_timezone = timezone;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub status: RefreshStatus,
    pub card_id: String,
    /// The bird published now, or the one recorded by the earlier refresh
    /// for [`RefreshStatus::AlreadyUpdated`]. `None` on error.
    pub bird_name: Option<String>,
    pub location: Location,
    pub tier: Tier,
    pub local_date: NaiveDate,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<FailedStage>,
    /// The collaborator's error message, unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RefreshSettings {
    /// Decimal places kept when turning coordinates into a cache key.
    pub location_key_precision: u8,
    /// Passed through to the publisher to prefix the card's narration.
    pub intro_reference: Option<String>,
}

pub struct RefreshOrchestrator {
    cascade: Arc<LocationCascade>,
    calendar: Arc<LocalCalendar>,
    cache: Arc<dyn UpdateCache>,
    selector: Arc<dyn BirdSelector>,
    publisher: Arc<dyn ContentPublisher>,
    settings: RefreshSettings,
}

struct Resolved {
    card_id: String,
    location: ResolvedLocation,
    day: LocalDay,
    warning: Option<String>,
}

impl Resolved {
    fn outcome(self, status: RefreshStatus, bird_name: Option<String>) -> RefreshOutcome {
        RefreshOutcome {
            status,
            card_id: self.card_id,
            bird_name,
            location: self.location.location,
            tier: self.location.tier,
            local_date: self.day.date,
            timezone: self.day.timezone_name().to_string(),
            warning: self.warning,
            failed_stage: None,
            message: None,
        }
    }

    fn failed(self, stage: FailedStage, message: String) -> RefreshOutcome {
        RefreshOutcome {
            failed_stage: Some(stage),
            message: Some(message),
            ..self.outcome(RefreshStatus::Error, None)
        }
    }
}

impl RefreshOrchestrator {
    #[must_use]
    pub fn new(
        cascade: Arc<LocationCascade>,
        calendar: Arc<LocalCalendar>,
        cache: Arc<dyn UpdateCache>,
        selector: Arc<dyn BirdSelector>,
        publisher: Arc<dyn ContentPublisher>,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            cascade,
            calendar,
            cache,
            selector,
            publisher,
            settings,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn UpdateCache> {
        &self.cache
    }

    /// Run one refresh.
    ///
    /// Selector and publisher failures come back as an outcome with
    /// [`RefreshStatus::Error`]; nothing is retried and nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Resolution`] only when an interactive trigger
    /// resolves no location and placeholder fallback is disabled.
    pub async fn refresh(&self, request: RefreshRequest) -> Result<RefreshOutcome, RefreshError> {
        let RefreshRequest {
            trigger,
            card_id,
            client,
            device_timezone,
        } = request;

        let resolved = self
            .cascade
            .resolve(trigger, &client, device_timezone.as_deref())
            .await?;
        let day = self.calendar.local_day(&resolved.location);
        let key = CacheKey::new(
            card_id.clone(),
            day.date,
            resolved.location.key(self.settings.location_key_precision),
        );

        let warning = resolved.is_fallback_default.then(|| {
            tracing::warn!(
                %trigger,
                card_id = %card_id,
                city = %resolved.location.city,
                "refresh: location unresolved; refreshing for the default location"
            );
            format!(
                "location could not be determined; using default location {}",
                resolved.location.city
            )
        });

        tracing::info!(
            %trigger,
            card_id = %card_id,
            tier = %resolved.tier,
            city = %resolved.location.city,
            local_date = %day.date_string(),
            timezone = day.timezone_name(),
            "refresh: location resolved"
        );

        let ctx = Resolved {
            card_id,
            location: resolved,
            day,
            warning,
        };

        if let Some(previous) = self.previous_bird(&key).await {
            tracing::info!(%key, bird = %previous, "refresh: already updated today");
            return Ok(ctx.outcome(RefreshStatus::AlreadyUpdated, Some(previous)));
        }

        let location = &ctx.location.location;
        let bird = match self.selector.select_bird_of_day(location).await {
            Ok(bird) => bird,
            Err(e) => {
                tracing::error!(%key, error = %e, "refresh: bird selection failed");
                return Ok(ctx.failed(FailedStage::Selection, e.to_string()));
            }
        };

        let published = self
            .publisher
            .publish_refresh(
                &ctx.card_id,
                &bird,
                self.settings.intro_reference.as_deref(),
                location,
            )
            .await;
        if let Err(e) = published {
            tracing::error!(%key, bird = %bird.name, error = %e, "refresh: publish failed");
            return Ok(ctx.failed(FailedStage::Publish, e.to_string()));
        }

        self.record(&key, &bird.name).await;
        Ok(ctx.outcome(RefreshStatus::Success, Some(bird.name)))
    }

    /// A write failure or a lost race does not undo the publish that
    /// already reached the card, so neither changes the outcome.
    async fn record(&self, key: &CacheKey, bird_name: &str) {
        match self.cache.mark_updated(key, bird_name).await {
            Ok(MarkOutcome::Created) => {
                tracing::info!(%key, bird = bird_name, "refresh: card refreshed");
            }
            Ok(MarkOutcome::AlreadyPresent) => {
                tracing::info!(
                    %key,
                    bird = bird_name,
                    "refresh: concurrent refresh recorded first; keeping its record"
                );
            }
            Err(e) => {
                tracing::error!(%key, error = %e, "refresh: failed to record refresh");
            }
        }
    }

    /// The recorded bird for `key`, treating an unreadable cache as empty.
    async fn previous_bird(&self, key: &CacheKey) -> Option<String> {
        match self.cache.get_record(key).await {
            Ok(record) => record.map(|r| r.bird_name),
            Err(e) => {
                tracing::warn!(%key, error = %e, "refresh: cache read failed; continuing");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
