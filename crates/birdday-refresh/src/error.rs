use birdday_geo::GeoError;
use thiserror::Error;

/// Errors from the bird selector and content publisher services.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. `body` is its message,
    /// passed through unchanged.
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// A refresh that could not even produce an outcome.
///
/// Collaborator failures are not here: they are reported in
/// [`RefreshOutcome`](crate::RefreshOutcome) alongside the resolved location.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("location resolution failed: {0}")]
    Resolution(#[from] GeoError),
}

impl RefreshError {
    /// `true` when the failure comes from deployment configuration rather
    /// than from the request.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RefreshError::Resolution(GeoError::PlaceholderFallbackDisabled { .. })
        )
    }
}
