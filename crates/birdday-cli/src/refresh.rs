use std::net::IpAddr;
use std::sync::Arc;

use birdday_core::{AppConfig, Clock, TriggerKind};
use birdday_geo::ClientSignal;
use birdday_refresh::{RefreshRequest, RefreshStatus};

/// Run one manual refresh and print the outcome as JSON.
pub(crate) async fn run_refresh(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
    card_id: Option<String>,
    timezone: Option<String>,
    ip: Option<IpAddr>,
) -> anyhow::Result<()> {
    let components = birdday_refresh::build_components(config, clock).await?;
    let card_id = card_id.unwrap_or_else(|| config.card_id.clone());

    let request = RefreshRequest::new(TriggerKind::Manual, card_id)
        .with_client(ip.map(ClientSignal::direct).unwrap_or_default())
        .with_device_timezone(timezone);
    let outcome = components.orchestrator.refresh(request).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if outcome.status == RefreshStatus::Error {
        anyhow::bail!(
            "refresh failed: {}",
            outcome.message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
