//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the daily
//! refresh sweep and the cache retention purge.

use std::sync::Arc;

use birdday_cache::purge_expired;
use birdday_core::{AppConfig, Clock, TriggerKind};
use birdday_refresh::{RefreshOrchestrator, RefreshRequest, RefreshStatus};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    orchestrator: Arc<RefreshOrchestrator>,
    config: Arc<AppConfig>,
    clock: Arc<dyn Clock>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_refresh_job(&scheduler, Arc::clone(&orchestrator), Arc::clone(&config)).await?;
    register_purge_job(&scheduler, orchestrator, config, clock).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the daily refresh sweep on `BIRDDAY_REFRESH_CRON`.
///
/// The sweep has no client address; it resolves through the configured
/// scheduled timezone, or the rotation list when none is set.
async fn register_refresh_job(
    scheduler: &JobScheduler,
    orchestrator: Arc<RefreshOrchestrator>,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let cron = config.refresh_cron.clone();
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let orchestrator = Arc::clone(&orchestrator);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!(card_id = %config.card_id, "scheduler: starting daily refresh");
            run_refresh_job(&orchestrator, &config).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: daily refresh registered");
    Ok(())
}

async fn run_refresh_job(orchestrator: &RefreshOrchestrator, config: &AppConfig) {
    let request = RefreshRequest::new(TriggerKind::Scheduled, config.card_id.clone())
        .with_device_timezone(config.scheduled_timezone.clone());

    match orchestrator.refresh(request).await {
        Ok(outcome) if outcome.status == RefreshStatus::Error => {
            tracing::error!(
                card_id = %outcome.card_id,
                stage = ?outcome.failed_stage,
                message = outcome.message.as_deref().unwrap_or_default(),
                "scheduler: daily refresh failed"
            );
        }
        Ok(outcome) => {
            tracing::info!(
                card_id = %outcome.card_id,
                status = %outcome.status,
                tier = %outcome.tier,
                city = %outcome.location.city,
                bird = outcome.bird_name.as_deref().unwrap_or_default(),
                "scheduler: daily refresh complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: daily refresh could not resolve a location");
        }
    }
}

/// Register the retention purge on `BIRDDAY_PURGE_CRON`.
async fn register_purge_job(
    scheduler: &JobScheduler,
    orchestrator: Arc<RefreshOrchestrator>,
    config: Arc<AppConfig>,
    clock: Arc<dyn Clock>,
) -> Result<(), JobSchedulerError> {
    let cron = config.purge_cron.clone();
    let retention_days = config.cache_retention_days;
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let orchestrator = Arc::clone(&orchestrator);
        let clock = Arc::clone(&clock);

        Box::pin(async move {
            let today = clock.now().date_naive();
            if let Err(e) =
                purge_expired(&**orchestrator.cache(), today, retention_days).await
            {
                tracing::error!(error = %e, "scheduler: cache purge failed");
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, retention_days, "scheduler: cache purge registered");
    Ok(())
}
