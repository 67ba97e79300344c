//! Builds the refresh pipeline from [`AppConfig`].

use std::sync::Arc;

use birdday_cache::{CacheError, MemoryUpdateCache, PgUpdateCache, PoolConfig, UpdateCache};
use birdday_core::{load_locations, placeholder_location, AppConfig, Clock, ConfigError};
use birdday_geo::{
    CascadePolicy, GeoError, GlobalRotation, IpApiClient, LocalCalendar, LocationCascade,
    TimezoneTable, TzfLookup,
};
use thiserror::Error;

use crate::error::CollaboratorError;
use crate::orchestrator::{RefreshOrchestrator, RefreshSettings};
use crate::publisher::HttpContentPublisher;
use crate::selector::HttpBirdSelector;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Everything a binary needs to run or inspect refreshes.
pub struct Components {
    pub cascade: Arc<LocationCascade>,
    pub calendar: Arc<LocalCalendar>,
    pub cache: Arc<dyn UpdateCache>,
    pub orchestrator: Arc<RefreshOrchestrator>,
}

/// Connect the cache, build the HTTP collaborators and assemble the
/// orchestrator. Uses Postgres when `DATABASE_URL` is set and runs its
/// migrations; otherwise records live in memory.
///
/// # Errors
///
/// Returns [`BuildError`] if the rotation file is invalid, a collaborator
/// URL does not parse, or the database cannot be reached or migrated.
pub async fn build_components(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<Components, BuildError> {
    let cache = connect_cache(config, Arc::clone(&clock)).await?;
    let cascade = Arc::new(build_cascade(config, Arc::clone(&clock))?);
    let calendar = Arc::new(LocalCalendar::new(Arc::new(TzfLookup::new()), clock));

    let selector = HttpBirdSelector::new(
        &config.selector_url,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;
    let publisher = HttpContentPublisher::new(
        &config.publisher_url,
        config.publisher_token.clone(),
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;

    let orchestrator = Arc::new(RefreshOrchestrator::new(
        Arc::clone(&cascade),
        Arc::clone(&calendar),
        Arc::clone(&cache),
        Arc::new(selector),
        Arc::new(publisher),
        RefreshSettings {
            location_key_precision: config.location_key_precision,
            intro_reference: config.intro_reference.clone(),
        },
    ));

    Ok(Components {
        cascade,
        calendar,
        cache,
        orchestrator,
    })
}

/// # Errors
///
/// Returns [`BuildError`] if the rotation file cannot be loaded or the
/// geo-IP URL does not parse.
pub fn build_cascade(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<LocationCascade, BuildError> {
    let rotation = match &config.rotation_path {
        Some(path) => {
            let locations = load_locations(path)?.into_locations();
            tracing::info!(path = %path.display(), count = locations.len(), "loaded rotation list");
            GlobalRotation::new(locations)?
        }
        None => GlobalRotation::builtin(),
    };

    let ip = IpApiClient::new(
        &config.geoip_url,
        config.http_timeout_secs,
        &config.http_user_agent,
        placeholder_location(),
    )?;

    Ok(LocationCascade::new(
        Arc::new(ip),
        Arc::new(TimezoneTable::builtin()),
        Arc::new(rotation),
        clock,
        CascadePolicy {
            allow_placeholder_fallback: config.allow_placeholder_fallback,
        },
    ))
}

async fn connect_cache(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn UpdateCache>, BuildError> {
    let Some(database_url) = &config.database_url else {
        tracing::info!("DATABASE_URL not set; refresh records are kept in memory");
        return Ok(Arc::new(MemoryUpdateCache::new(clock)));
    };

    let pool = birdday_cache::connect_pool(database_url, PoolConfig::from_app_config(config))
        .await
        .map_err(CacheError::from)?;
    birdday_cache::run_migrations(&pool)
        .await
        .map_err(CacheError::from)?;
    tracing::info!("refresh records stored in postgres");
    Ok(Arc::new(PgUpdateCache::with_clock(pool, clock)))
}
