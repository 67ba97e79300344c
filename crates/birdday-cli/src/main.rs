mod purge;
mod refresh;
mod resolve;

use std::net::IpAddr;
use std::sync::Arc;

use birdday_core::{Clock, ManualClock, SystemClock};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "birdday-cli")]
#[command(about = "Bird-of-the-day refresh command line interface")]
struct Cli {
    /// Pretend the current instant is this RFC 3339 timestamp
    #[arg(long, global = true, value_parser = parse_instant)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the location cascade and print the result and local day
    Resolve {
        /// Client IP address to geolocate
        #[arg(long)]
        ip: Option<IpAddr>,
        /// IANA timezone reported by the device
        #[arg(long)]
        timezone: Option<String>,
        /// Resolve as the scheduled sweep (rotation fallback)
        #[arg(long)]
        scheduled: bool,
    },
    /// Run one manual refresh against the configured collaborators
    Refresh {
        /// Card to refresh (defaults to BIRDDAY_CARD_ID)
        #[arg(long)]
        card_id: Option<String>,
        /// IANA timezone reported by the device
        #[arg(long)]
        timezone: Option<String>,
        /// Client IP address to geolocate
        #[arg(long)]
        ip: Option<IpAddr>,
    },
    /// Delete refresh records older than the retention window
    Purge {
        /// Days to keep (defaults to BIRDDAY_CACHE_RETENTION_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn build_clock(at: Option<DateTime<Utc>>) -> Arc<dyn Clock> {
    match at {
        Some(instant) => Arc::new(ManualClock::new(instant)),
        None => Arc::new(SystemClock),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("birdday-cli: use --help to list commands");
        return Ok(());
    };

    let config = birdday_core::load_app_config()?;
    let clock = build_clock(cli.at);

    match command {
        Commands::Resolve {
            ip,
            timezone,
            scheduled,
        } => resolve::run_resolve(&config, clock, ip, timezone.as_deref(), scheduled).await?,
        Commands::Refresh {
            card_id,
            timezone,
            ip,
        } => refresh::run_refresh(&config, clock, card_id, timezone, ip).await?,
        Commands::Purge { days } => purge::run_purge(&config, clock, days).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
