//! Shared plumbing for the collaborator HTTP clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::CollaboratorError;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, CollaboratorError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(5))
        .user_agent(user_agent)
        .build()?)
}

/// Parse `base_url` with exactly one trailing slash so relative joins land
/// under it instead of replacing its last segment.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<Url, CollaboratorError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| CollaboratorError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, CollaboratorError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CollaboratorError::InvalidBaseUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-2xx response into [`CollaboratorError::Status`] carrying the
/// response body.
pub(crate) async fn check_status(
    service: &'static str,
    response: Response,
) -> Result<Response, CollaboratorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = failure_body(service, status, response.text().await);
    Err(CollaboratorError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

/// The collaborator's own message, or the status reason when there is none.
fn failure_body<E: std::fmt::Display>(
    service: &'static str,
    status: StatusCode,
    body: Result<String, E>,
) -> String {
    let text = match body {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!(
                service,
                status = status.as_u16(),
                error = %e,
                "failed to read error body"
            );
            String::new()
        }
    };
    if text.is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        text
    }
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    context: &Url,
) -> Result<T, CollaboratorError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| CollaboratorError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_single_trailing_slash() {
        let url = normalise_base_url("http://selector.local/api//").expect("url");
        assert_eq!(url.as_str(), "http://selector.local/api/");
    }

    #[test]
    fn endpoint_appends_under_base_path() {
        let base = normalise_base_url("http://publisher.local/api").expect("url");
        let url = endpoint(&base, &["v1", "cards", "card 7", "refresh"]).expect("url");
        assert_eq!(url.path(), "/api/v1/cards/card%207/refresh");
    }

    #[test]
    fn endpoint_escapes_slashes_in_segments() {
        let base = normalise_base_url("http://publisher.local").expect("url");
        let url = endpoint(&base, &["v1", "cards", "a/b", "refresh"]).expect("url");
        assert_eq!(url.path(), "/v1/cards/a%2Fb/refresh");
    }

    #[test]
    fn failure_body_keeps_collaborator_message() {
        let body = failure_body::<String>(
            "bird selector",
            StatusCode::SERVICE_UNAVAILABLE,
            Ok("  no birds today\n".to_string()),
        );
        assert_eq!(body, "no birds today");
    }

    #[test]
    fn unreadable_failure_body_falls_back_to_reason() {
        let body = failure_body(
            "content publisher",
            StatusCode::BAD_GATEWAY,
            Err("connection reset mid-body"),
        );
        assert_eq!(body, "Bad Gateway");
    }

    #[test]
    fn empty_failure_body_falls_back_to_reason() {
        let body = failure_body::<String>("bird selector", StatusCode::CONFLICT, Ok(String::new()));
        assert_eq!(body, "Conflict");
    }

    #[test]
    fn unparseable_base_url_is_rejected() {
        assert!(matches!(
            normalise_base_url("::nope"),
            Err(CollaboratorError::InvalidBaseUrl { .. })
        ));
    }
}
