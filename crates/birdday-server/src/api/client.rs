//! Client address extraction for the IP tier.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use birdday_geo::ClientSignal;

/// The caller's socket peer plus any `X-Forwarded-For` header.
///
/// Never rejects: a request served without connect info (as in router
/// tests) simply has no peer address.
#[derive(Debug, Clone, Default)]
pub struct ClientAddress(pub ClientSignal);

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let forwarded_for = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self(ClientSignal::new(peer, forwarded_for)))
    }
}
