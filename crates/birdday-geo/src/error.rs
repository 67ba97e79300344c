use std::net::IpAddr;

use birdday_core::TriggerKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    /// Network or TLS failure, or a non-2xx status from the geo-IP provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but reported that it could not locate the IP.
    #[error("geo-IP lookup failed for {ip}: {message}")]
    Lookup { ip: IpAddr, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("rotation list must contain at least one location")]
    EmptyRotation,

    /// No tier resolved and the placeholder may not stand in for a real
    /// answer. Only reachable for interactive triggers.
    #[error("no location resolved for {trigger} trigger and placeholder fallback is disabled")]
    PlaceholderFallbackDisabled { trigger: TriggerKind },
}
