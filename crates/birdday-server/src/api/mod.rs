mod client;
mod refresh;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use birdday_core::AppConfig;
use birdday_refresh::RefreshOrchestrator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_scheduler_secret, RateLimitState, RequestId,
    SchedulerAuth, SCHEDULER_SECRET_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RefreshOrchestrator>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    cache: &'static str,
    cache_backend: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static(SCHEDULER_SECRET_HEADER),
        ])
}

/// Separate windows per trigger route.
///
/// Webhook traffic never consumes the scheduled sweep's budget.
#[derive(Debug, Clone)]
pub struct RateLimits {
    pub scheduled: RateLimitState,
    pub webhook: RateLimitState,
}

fn trigger_router(auth: SchedulerAuth, limits: RateLimits) -> Router<AppState> {
    // Secret check wraps the limiter so rejected callers never count.
    let scheduled = Router::new()
        .route("/api/v1/refresh/scheduled", post(refresh::scheduled))
        .layer(axum::middleware::from_fn_with_state(
            limits.scheduled,
            enforce_rate_limit,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_scheduler_secret,
        ));

    let webhook = Router::new()
        .route("/api/v1/webhooks/playback", post(refresh::playback_webhook))
        .layer(axum::middleware::from_fn_with_state(
            limits.webhook,
            enforce_rate_limit,
        ));

    webhook.merge(scheduled)
}

pub fn build_app(state: AppState, auth: SchedulerAuth, limits: RateLimits) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(trigger_router(auth, limits))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let cache = state.orchestrator.cache();
    let cache_backend = cache.backend();

    match cache.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    cache: "ok",
                    cache_backend,
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: cache unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        cache: "unavailable",
                        cache_backend,
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limits() -> RateLimits {
    RateLimits {
        scheduled: RateLimitState::new(12, Duration::from_secs(60)),
        webhook: RateLimitState::new(120, Duration::from_secs(60)),
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
