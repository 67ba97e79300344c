use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use birdday_core::TriggerKind;
use birdday_geo::Tier;
use birdday_refresh::{RefreshOutcome, RefreshRequest, RefreshStatus};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::client::ClientAddress;
use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Playback events that mean a person just heard the card.
const PLAYBACK_EVENTS: &[&str] = &["card.played", "playback.started"];

#[derive(Debug, Default, Deserialize)]
pub(super) struct ScheduledRefreshBody {
    #[serde(default)]
    card_id: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaybackEvent {
    event_type: String,
    device_id: String,
    #[serde(default)]
    card_id: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshData {
    status: RefreshStatus,
    card_id: String,
    bird_name: Option<String>,
    city: String,
    local_date: String,
    timezone: String,
    tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<RefreshOutcome> for RefreshData {
    fn from(outcome: RefreshOutcome) -> Self {
        Self {
            status: outcome.status,
            card_id: outcome.card_id,
            bird_name: outcome.bird_name,
            city: outcome.location.city,
            local_date: outcome.local_date.format("%Y-%m-%d").to_string(),
            timezone: outcome.timezone,
            tier: outcome.tier,
            warning: outcome.warning,
            message: outcome.message,
        }
    }
}

pub(super) async fn scheduled(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ClientAddress(client): ClientAddress,
    body: Bytes,
) -> Response {
    let body: ScheduledRefreshBody = if body.iter().all(u8::is_ascii_whitespace) {
        ScheduledRefreshBody::default()
    } else {
        match parse_json(&body) {
            Ok(parsed) => parsed,
            Err(message) => {
                return ApiError::new(req_id.0, "validation_error", message).into_response()
            }
        }
    };

    let card_id = non_blank(body.card_id).unwrap_or_else(|| state.config.card_id.clone());
    let timezone = non_blank(body.timezone).or_else(|| state.config.scheduled_timezone.clone());

    let request = RefreshRequest::new(TriggerKind::Scheduled, card_id)
        .with_client(client)
        .with_device_timezone(timezone);
    run(&state, request, req_id).await
}

pub(super) async fn playback_webhook(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ClientAddress(client): ClientAddress,
    body: Bytes,
) -> Response {
    let event: PlaybackEvent = match parse_json(&body) {
        Ok(event) => event,
        Err(message) => return ApiError::new(req_id.0, "validation_error", message).into_response(),
    };

    if !PLAYBACK_EVENTS.contains(&event.event_type.as_str()) {
        return ApiError::new(
            req_id.0,
            "validation_error",
            format!(
                "unsupported event_type \"{}\"; expected one of {}",
                event.event_type,
                PLAYBACK_EVENTS.join(", ")
            ),
        )
        .into_response();
    }
    if event.device_id.trim().is_empty() {
        return ApiError::new(req_id.0, "validation_error", "device_id must not be empty")
            .into_response();
    }

    tracing::info!(
        device_id = %event.device_id,
        event_type = %event.event_type,
        "playback webhook received"
    );

    let card_id = non_blank(event.card_id).unwrap_or_else(|| state.config.card_id.clone());
    let request = RefreshRequest::new(TriggerKind::Webhook, card_id)
        .with_client(client)
        .with_device_timezone(non_blank(event.timezone));
    run(&state, request, req_id).await
}

async fn run(state: &AppState, request: RefreshRequest, req_id: RequestId) -> Response {
    match state.orchestrator.refresh(request).await {
        Ok(outcome) => {
            let status = match outcome.status {
                RefreshStatus::Error => StatusCode::BAD_GATEWAY,
                RefreshStatus::Success | RefreshStatus::AlreadyUpdated => StatusCode::OK,
            };
            (
                status,
                Json(ApiResponse {
                    data: RefreshData::from(outcome),
                    meta: ResponseMeta::new(req_id.0),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "refresh could not resolve a location");
            let code = if e.is_configuration() {
                "configuration_error"
            } else {
                "internal_error"
            };
            ApiError::new(req_id.0, code, e.to_string()).into_response()
        }
    }
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body).map_err(|e| format!("invalid request body: {e}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
