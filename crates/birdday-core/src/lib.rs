pub mod app_config;
pub mod clock;
pub mod config;
pub mod location;
pub mod locations_file;
pub mod trigger;

pub use app_config::{AppConfig, Environment};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{placeholder_location, Location, LocationKey, PLACEHOLDER_TIMEZONE};
pub use locations_file::{load_locations, LocationEntry, LocationsFile};
pub use trigger::TriggerKind;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locations file {path}: {source}")]
    LocationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locations file: {0}")]
    LocationsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
