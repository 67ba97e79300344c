//! Offline tests for birdday-cache configuration and record types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use birdday_cache::{CacheKey, PoolConfig, RefreshRecord};
use birdday_core::{AppConfig, Environment, LocationKey};
use chrono::{NaiveDate, Utc};

fn app_config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        database_url: Some("postgres://example".to_string()),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scheduler_secret: None,
        card_id: "card".to_string(),
        refresh_cron: "0 0 5 * * *".to_string(),
        purge_cron: "0 30 3 * * *".to_string(),
        scheduled_timezone: None,
        geoip_url: "http://ip-api.com".to_string(),
        selector_url: "http://selector".to_string(),
        publisher_url: "http://publisher".to_string(),
        publisher_token: None,
        intro_reference: None,
        http_timeout_secs: 15,
        http_user_agent: "ua".to_string(),
        location_key_precision: 1,
        allow_placeholder_fallback: true,
        rotation_path: None,
        cache_retention_days: 30,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn refresh_record_round_trips_its_key() {
    let key = CacheKey::new(
        "card-9",
        NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date"),
        LocationKey::from_coordinates(64.1466, -21.9426, 2),
    );
    let record = RefreshRecord::new(&key, "Atlantic Puffin", Utc::now());

    assert_eq!(record.key(), key);
    assert_eq!(record.card_id, "card-9");
    assert_eq!(record.location_key.as_str(), "64.15,-21.94");
}

#[test]
fn refresh_record_serializes_date_as_calendar_day() {
    let key = CacheKey::new(
        "card-9",
        NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date"),
        LocationKey::from_coordinates(0.0, 0.0, 1),
    );
    let record = RefreshRecord::new(&key, "Robin", Utc::now());
    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(json["local_date"], "2025-03-07");
    assert_eq!(json["location_key"], "0.0,0.0");
}
