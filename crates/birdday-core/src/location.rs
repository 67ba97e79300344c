//! Resolved locations and the coarse keys used to compare them.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// The one IANA zone that genuinely corresponds to [`placeholder_location`].
pub const PLACEHOLDER_TIMEZONE: &str = "America/New_York";

/// A location produced by one resolution tier.
///
/// Never merged across tiers: a tier either yields a complete `Location` or
/// the cascade moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<IpAddr>,
}

impl Location {
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            latitude,
            longitude,
            city: city.into(),
            region: region.into(),
            country: country.into(),
            source_ip: None,
        }
    }

    #[must_use]
    pub fn with_source_ip(mut self, ip: IpAddr) -> Self {
        self.source_ip = Some(ip);
        self
    }

    /// Cache identity for this location at the given rounding precision.
    #[must_use]
    pub fn key(&self, precision: u8) -> LocationKey {
        LocationKey::from_coordinates(self.latitude, self.longitude, precision)
    }

    /// `true` when both coordinates lie within `tolerance` degrees of `other`.
    #[must_use]
    pub fn is_near(&self, other: &Location, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() < tolerance
            && (self.longitude - other.longitude).abs() < tolerance
    }
}

/// The designated default location that signals a failed geolocation.
#[must_use]
pub fn placeholder_location() -> Location {
    Location::new("New York", "New York", "United States", 40.7128, -74.0060)
}

/// Coarse, rounded `lat,lng` string.
///
/// Two resolutions that land within the rounding tolerance produce the same
/// key, so they collide in the refresh cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64, precision: u8) -> Self {
        let places = usize::from(precision);
        let lat = round_to(latitude, precision);
        let lng = round_to(longitude, precision);
        Self(format!("{lat:.places$},{lng:.places$}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LocationKey {
    /// Rehydrate a key previously produced by [`LocationKey::from_coordinates`].
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<LocationKey> for String {
    fn from(key: LocationKey) -> Self {
        key.0
    }
}

fn round_to(value: f64, precision: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(precision));
    // Adding +0.0 turns -0.0 into 0.0 so both print identically.
    (value * factor).round() / factor + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_rounds_to_one_decimal_place() {
        let key = LocationKey::from_coordinates(51.5074, -0.1278, 1);
        assert_eq!(key.as_str(), "51.5,-0.1");
    }

    #[test]
    fn nearby_coordinates_share_a_key() {
        let a = Location::new("London", "England", "United Kingdom", 51.5074, -0.1278);
        let b = Location::new("London", "England", "United Kingdom", 51.5121, -0.1102);
        assert_eq!(a.key(1), b.key(1));
        assert_ne!(a.key(3), b.key(3));
    }

    #[test]
    fn negative_zero_is_normalised() {
        let key = LocationKey::from_coordinates(-0.01, 0.04, 1);
        assert_eq!(key.as_str(), "0.0,0.0");
    }

    #[test]
    fn precision_zero_has_no_fraction() {
        let key = LocationKey::from_coordinates(35.6762, 139.6503, 0);
        assert_eq!(key.as_str(), "36,140");
    }

    #[test]
    fn is_near_uses_tolerance_on_both_axes() {
        let placeholder = placeholder_location();
        let close = Location::new("x", "y", "z", 40.715, -74.005);
        let far = Location::new("x", "y", "z", 40.715, -73.9);
        assert!(close.is_near(&placeholder, 0.01));
        assert!(!far.is_near(&placeholder, 0.01));
    }

    #[test]
    fn source_ip_is_omitted_when_absent() {
        let json = serde_json::to_value(placeholder_location()).expect("serialize");
        assert!(json.get("source_ip").is_none());
        assert_eq!(json["city"], "New York");
    }
}
