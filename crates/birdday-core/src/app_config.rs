use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scheduler_secret: Option<String>,
    pub card_id: String,
    pub refresh_cron: String,
    pub purge_cron: String,
    pub scheduled_timezone: Option<String>,
    pub geoip_url: String,
    pub selector_url: String,
    pub publisher_url: String,
    pub publisher_token: Option<String>,
    pub intro_reference: Option<String>,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub location_key_precision: u8,
    pub allow_placeholder_fallback: bool,
    pub rotation_path: Option<PathBuf>,
    pub cache_retention_days: u32,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self.env, Environment::Development)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scheduler_secret",
                &self.scheduler_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("card_id", &self.card_id)
            .field("refresh_cron", &self.refresh_cron)
            .field("purge_cron", &self.purge_cron)
            .field("scheduled_timezone", &self.scheduled_timezone)
            .field("geoip_url", &self.geoip_url)
            .field("selector_url", &self.selector_url)
            .field("publisher_url", &self.publisher_url)
            .field(
                "publisher_token",
                &self.publisher_token.as_ref().map(|_| "[redacted]"),
            )
            .field("intro_reference", &self.intro_reference)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("location_key_precision", &self.location_key_precision)
            .field(
                "allow_placeholder_fallback",
                &self.allow_placeholder_fallback,
            )
            .field("rotation_path", &self.rotation_path)
            .field("cache_retention_days", &self.cache_retention_days)
            .finish()
    }
}
