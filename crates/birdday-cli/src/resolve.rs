use std::net::IpAddr;
use std::sync::Arc;

use birdday_core::{AppConfig, Clock, TriggerKind};
use birdday_geo::{ClientSignal, LocalCalendar, ResolvedLocation, TzfLookup};

/// Print which tier answers for the given signals, without refreshing.
pub(crate) async fn run_resolve(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
    ip: Option<IpAddr>,
    timezone: Option<&str>,
    scheduled: bool,
) -> anyhow::Result<()> {
    let cascade = birdday_refresh::build_cascade(config, Arc::clone(&clock))?;
    let calendar = LocalCalendar::new(Arc::new(TzfLookup::new()), clock);

    let trigger = if scheduled {
        TriggerKind::Scheduled
    } else {
        TriggerKind::Manual
    };
    let client = ip.map(ClientSignal::direct).unwrap_or_default();

    let resolved = cascade.resolve(trigger, &client, timezone).await?;
    let day = calendar.local_day(&resolved.location);

    print!("{}", render(&resolved, config.location_key_precision));
    println!("local date: {}", day.date_string());
    println!("timezone:   {}", day.timezone_name());
    Ok(())
}

fn render(resolved: &ResolvedLocation, precision: u8) -> String {
    let location = &resolved.location;
    let mut out = format!(
        "tier:       {}\ncity:       {}\nregion:     {}\ncountry:    {}\ncoords:     {:.4}, {:.4}\nkey:        {}\n",
        resolved.tier,
        location.city,
        location.region,
        location.country,
        location.latitude,
        location.longitude,
        location.key(precision),
    );
    if resolved.is_fallback_default {
        out.push_str("warning:    no signal resolved; this is the default location\n");
    }
    out
}
