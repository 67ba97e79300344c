use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const MAX_LOCATION_KEY_PRECISION: u8 = 6;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default)).ok_or_else(|| {
            invalid(var, "expected one of true/false/1/0/yes/no".to_string())
        })
    };

    let env = parse_environment(&or_default("BIRDDAY_ENV", "development"))?;
    let bind_addr = parse_addr("BIRDDAY_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BIRDDAY_LOG_LEVEL", "info");

    let database_url = optional("DATABASE_URL");
    let db_max_connections = parse_u32("BIRDDAY_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("BIRDDAY_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("BIRDDAY_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "BIRDDAY_DB_MIN_CONNECTIONS",
            format!("must not exceed BIRDDAY_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let scheduler_secret = optional("BIRDDAY_SCHEDULER_SECRET");
    let card_id = require("BIRDDAY_CARD_ID")?;
    let refresh_cron = or_default("BIRDDAY_REFRESH_CRON", "0 0 5 * * *");
    let purge_cron = or_default("BIRDDAY_PURGE_CRON", "0 30 3 * * *");
    let scheduled_timezone = optional("BIRDDAY_SCHEDULED_TIMEZONE");

    let geoip_url = or_default("BIRDDAY_GEOIP_URL", "http://ip-api.com");
    let selector_url = require("BIRDDAY_SELECTOR_URL")?;
    let publisher_url = require("BIRDDAY_PUBLISHER_URL")?;
    let publisher_token = optional("BIRDDAY_PUBLISHER_TOKEN");
    let intro_reference = optional("BIRDDAY_INTRO_REFERENCE");
    let http_timeout_secs = parse_u64("BIRDDAY_HTTP_TIMEOUT_SECS", "15")?;
    let http_user_agent = or_default("BIRDDAY_HTTP_USER_AGENT", "birdday/0.1 (daily-refresh)");

    let location_key_precision = parse_precision(&or_default("BIRDDAY_LOCATION_KEY_PRECISION", "1"))
        .map_err(|reason| invalid("BIRDDAY_LOCATION_KEY_PRECISION", reason))?;
    let allow_placeholder_fallback = parse_bool("BIRDDAY_ALLOW_PLACEHOLDER_FALLBACK", "true")?;
    let rotation_path = optional("BIRDDAY_ROTATION_PATH").map(PathBuf::from);
    let cache_retention_days = parse_u32("BIRDDAY_CACHE_RETENTION_DAYS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        database_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scheduler_secret,
        card_id,
        refresh_cron,
        purge_cron,
        scheduled_timezone,
        geoip_url,
        selector_url,
        publisher_url,
        publisher_token,
        intro_reference,
        http_timeout_secs,
        http_user_agent,
        location_key_precision,
        allow_placeholder_fallback,
        rotation_path,
        cache_retention_days,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BIRDDAY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_precision(raw: &str) -> Result<u8, String> {
    let precision = raw.trim().parse::<u8>().map_err(|e| e.to_string())?;
    if precision > MAX_LOCATION_KEY_PRECISION {
        return Err(format!(
            "must be at most {MAX_LOCATION_KEY_PRECISION} decimal places"
        ));
    }
    Ok(precision)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
