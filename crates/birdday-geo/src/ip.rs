//! Geo-IP resolution over the `ip-api.com` JSON API.
//!
//! [`IpApiClient`] wraps `reqwest` and maps the provider's answer onto
//! [`Resolution`]. A provider "success" that carries no city, no
//! coordinates, or coordinates sitting on the placeholder location is
//! reported as [`Resolution::Placeholder`] rather than a real answer.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use birdday_core::Location;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeoError;
use crate::resolution::Resolution;

const RESPONSE_FIELDS: &str = "status,message,city,regionName,country,lat,lon,query";

/// Results within this many degrees of the placeholder are treated as the
/// provider's default answer.
const PLACEHOLDER_TOLERANCE_DEG: f64 = 0.01;

#[async_trait]
pub trait IpLocationResolver: Send + Sync {
    /// Best-effort location for `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] when the lookup itself fails. A lookup that
    /// succeeds with a default answer is `Ok(Resolution::Placeholder)`.
    async fn resolve(&self, ip: IpAddr) -> Result<Resolution, GeoError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Client for the `ip-api.com` JSON endpoint.
///
/// Use [`IpApiClient::new`] with the provider URL or a wiremock server URI.
pub struct IpApiClient {
    client: Client,
    base_url: Url,
    placeholder: Location,
}

impl IpApiClient {
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GeoError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        placeholder: Location,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            placeholder,
        })
    }

    fn lookup_url(&self, ip: IpAddr) -> Result<Url, GeoError> {
        let mut url = self
            .base_url
            .join(&format!("json/{ip}"))
            .map_err(|e| GeoError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("fields", RESPONSE_FIELDS);
        Ok(url)
    }

    fn classify(&self, ip: IpAddr, body: IpApiResponse) -> Result<Resolution, GeoError> {
        if body.status != "success" {
            return Err(GeoError::Lookup {
                ip,
                message: body.message.unwrap_or_else(|| body.status.clone()),
            });
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Ok(Resolution::Placeholder);
        };
        let Some(city) = body.city.filter(|c| !c.trim().is_empty()) else {
            return Ok(Resolution::Placeholder);
        };

        let location = Location::new(
            city,
            body.region_name.unwrap_or_default(),
            body.country.unwrap_or_default(),
            lat,
            lon,
        )
        .with_source_ip(ip);

        if location.is_near(&self.placeholder, PLACEHOLDER_TOLERANCE_DEG) {
            return Ok(Resolution::Placeholder);
        }
        Ok(Resolution::Resolved(location))
    }
}

#[async_trait]
impl IpLocationResolver for IpApiClient {
    async fn resolve(&self, ip: IpAddr) -> Result<Resolution, GeoError> {
        let url = self.lookup_url(ip)?;
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let text = response.text().await?;
        let body: IpApiResponse =
            serde_json::from_str(&text).map_err(|e| GeoError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        self.classify(ip, body)
    }
}
