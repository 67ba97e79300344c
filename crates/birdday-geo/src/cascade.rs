//! Ordered location resolution: IP, then device timezone, then a fallback
//! chosen by trigger kind.

use std::sync::Arc;

use birdday_core::{placeholder_location, Clock, Location, TriggerKind, PLACEHOLDER_TIMEZONE};
use serde::Serialize;

use crate::client_ip::ClientSignal;
use crate::error::GeoError;
use crate::ip::IpLocationResolver;
use crate::resolution::Resolution;
use crate::rotation::GlobalRotation;
use crate::timezone::TimezoneLocationResolver;

/// Which stage of the cascade produced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Ip,
    Timezone,
    Rotation,
    Default,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Ip => write!(f, "ip"),
            Tier::Timezone => write!(f, "timezone"),
            Tier::Rotation => write!(f, "rotation"),
            Tier::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub location: Location,
    pub tier: Tier,
    /// Set only for [`Tier::Default`]: the location is the placeholder and
    /// must be surfaced as a warning.
    pub is_fallback_default: bool,
}

#[derive(Debug, Clone)]
pub struct CascadePolicy {
    /// When `false`, interactive triggers with no resolved signal fail
    /// instead of receiving the placeholder.
    pub allow_placeholder_fallback: bool,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        Self {
            allow_placeholder_fallback: true,
        }
    }
}

pub struct LocationCascade {
    ip: Arc<dyn IpLocationResolver>,
    timezone: Arc<dyn TimezoneLocationResolver>,
    rotation: Arc<GlobalRotation>,
    clock: Arc<dyn Clock>,
    placeholder: Location,
    policy: CascadePolicy,
}

impl LocationCascade {
    #[must_use]
    pub fn new(
        ip: Arc<dyn IpLocationResolver>,
        timezone: Arc<dyn TimezoneLocationResolver>,
        rotation: Arc<GlobalRotation>,
        clock: Arc<dyn Clock>,
        policy: CascadePolicy,
    ) -> Self {
        Self {
            ip,
            timezone,
            rotation,
            clock,
            placeholder: placeholder_location(),
            policy,
        }
    }

    /// Resolve a location for one trigger invocation.
    ///
    /// The timezone tier accepts the placeholder only for
    /// [`PLACEHOLDER_TIMEZONE`], the zone the placeholder actually lies in.
    ///
    /// Unavailable or defaulted signals are never errors on their own; they
    /// move resolution to the next tier.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::PlaceholderFallbackDisabled`] when an interactive
    /// trigger exhausts every tier and the policy forbids the placeholder.
    pub async fn resolve(
        &self,
        trigger: TriggerKind,
        client: &ClientSignal,
        device_timezone: Option<&str>,
    ) -> Result<ResolvedLocation, GeoError> {
        if let Some(location) = self.resolve_ip(client).await {
            return Ok(ResolvedLocation {
                location,
                tier: Tier::Ip,
                is_fallback_default: false,
            });
        }

        if let Some(location) = self.resolve_timezone(device_timezone) {
            return Ok(ResolvedLocation {
                location,
                tier: Tier::Timezone,
                is_fallback_default: false,
            });
        }

        self.fallback(trigger)
    }

    async fn resolve_ip(&self, client: &ClientSignal) -> Option<Location> {
        let Some(ip) = client.effective_ip() else {
            tracing::debug!("cascade: no usable client IP");
            return None;
        };

        match self.ip.resolve(ip).await {
            Ok(Resolution::Resolved(location)) => Some(location),
            Ok(Resolution::Placeholder) => {
                tracing::debug!(%ip, "cascade: IP resolved to placeholder; falling through");
                None
            }
            Err(e) => {
                tracing::debug!(%ip, error = %e, "cascade: IP lookup failed; falling through");
                None
            }
        }
    }

    fn resolve_timezone(&self, device_timezone: Option<&str>) -> Option<Location> {
        let timezone = device_timezone.map(str::trim).filter(|tz| !tz.is_empty())?;

        match self.timezone.resolve(timezone) {
            Resolution::Resolved(location) => Some(location),
            // The device really is in the placeholder's zone; trust it.
            // The IP tier has no equivalent exception.
            Resolution::Placeholder if timezone == PLACEHOLDER_TIMEZONE => {
                Some(self.placeholder.clone())
            }
            Resolution::Placeholder => {
                tracing::debug!(timezone, "cascade: timezone unresolved; falling through");
                None
            }
        }
    }

    fn fallback(&self, trigger: TriggerKind) -> Result<ResolvedLocation, GeoError> {
        if !trigger.is_interactive() {
            let today = self.clock.now().date_naive();
            let location = self.rotation.for_date(today).clone();
            tracing::info!(city = %location.city, %today, "cascade: using rotation location");
            return Ok(ResolvedLocation {
                location,
                tier: Tier::Rotation,
                is_fallback_default: false,
            });
        }

        if !self.policy.allow_placeholder_fallback {
            return Err(GeoError::PlaceholderFallbackDisabled { trigger });
        }

        tracing::warn!(%trigger, "cascade: no signal resolved; using placeholder location");
        Ok(ResolvedLocation {
            location: self.placeholder.clone(),
            tier: Tier::Default,
            is_fallback_default: true,
        })
    }
}

#[cfg(test)]
#[path = "cascade_test.rs"]
mod tests;
