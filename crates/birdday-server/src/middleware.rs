use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use birdday_core::AppConfig;
use serde::Serialize;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SCHEDULER_SECRET_HEADER: &str = "x-scheduler-secret";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-secret check for the scheduled trigger route.
#[derive(Clone)]
pub struct SchedulerAuth {
    secret: Option<Arc<[u8]>>,
}

impl std::fmt::Debug for SchedulerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerAuth")
            .field("enabled", &self.enabled())
            .finish()
    }
}

impl SchedulerAuth {
    /// Uses `BIRDDAY_SCHEDULER_SECRET`.
    ///
    /// In development a missing secret disables the check for local
    /// iteration. Elsewhere it fails startup.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match &config.scheduler_secret {
            Some(secret) => Ok(Self::with_secret(secret)),
            None if config.is_development() => {
                tracing::warn!(
                    "BIRDDAY_SCHEDULER_SECRET not set; scheduled trigger is unauthenticated in development"
                );
                Ok(Self::disabled())
            }
            None => anyhow::bail!(
                "BIRDDAY_SCHEDULER_SECRET is required outside development"
            ),
        }
    }

    #[must_use]
    pub fn with_secret(secret: &str) -> Self {
        Self {
            secret: Some(Arc::from(secret.as_bytes())),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.secret.is_some()
    }

    fn allows(&self, presented: Option<&str>) -> bool {
        match (&self.secret, presented) {
            (None, _) => true,
            (Some(expected), Some(presented)) => {
                bool::from(expected.as_ref().ct_eq(presented.as_bytes()))
            }
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter for one trigger route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

fn reject(status: StatusCode, code: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(MiddlewareErrorBody {
            error: MiddlewareError { code, message },
        }),
    )
        .into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware requiring the scheduler shared secret when one is configured.
pub async fn require_scheduler_secret(
    State(auth): State<SchedulerAuth>,
    req: Request,
    next: Next,
) -> Response {
    if auth.allows(presented_secret(req.headers())) {
        return next.run(req).await;
    }

    tracing::warn!("scheduled trigger rejected: missing or invalid scheduler secret");
    reject(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "missing or invalid scheduler secret",
    )
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return reject(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded",
        );
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn presented_secret(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SCHEDULER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_must_match_exactly() {
        let auth = SchedulerAuth::with_secret("s3cret");
        assert!(auth.allows(Some("s3cret")));
        assert!(!auth.allows(Some("s3cre")));
        assert!(!auth.allows(Some("s3cret-and-more")));
        assert!(!auth.allows(None));
    }

    #[test]
    fn disabled_auth_allows_everything() {
        let auth = SchedulerAuth::disabled();
        assert!(!auth.enabled());
        assert!(auth.allows(None));
    }

    #[test]
    fn presented_secret_ignores_blank_header() {
        let mut headers = HeaderMap::new();
        headers.insert(SCHEDULER_SECRET_HEADER, HeaderValue::from_static("  "));
        assert_eq!(presented_secret(&headers), None);

        headers.insert(SCHEDULER_SECRET_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(presented_secret(&headers), Some("abc"));
    }

    #[test]
    fn debug_does_not_print_secret() {
        let rendered = format!("{:?}", SchedulerAuth::with_secret("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("enabled: true"));
    }
}
