use std::sync::Arc;

use birdday_cache::purge_expired;
use birdday_core::{AppConfig, Clock};

pub(crate) async fn run_purge(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
    days: Option<u32>,
) -> anyhow::Result<()> {
    let today = clock.now().date_naive();
    let components = birdday_refresh::build_components(config, clock).await?;
    let retention_days = days.unwrap_or(config.cache_retention_days);

    let removed = purge_expired(&*components.cache, today, retention_days).await?;
    println!(
        "purged {removed} refresh record(s) older than {retention_days} day(s) from {} cache",
        components.cache.backend()
    );
    Ok(())
}
