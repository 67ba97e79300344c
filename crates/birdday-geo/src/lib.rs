//! Location resolution for the daily refresh.
//!
//! Three independent sources feed [`LocationCascade`]: the geo-IP client,
//! the timezone table, and the global rotation. [`LocalCalendar`] turns the
//! cascade's answer into the calendar day observed at that location.

pub mod calendar;
pub mod cascade;
pub mod client_ip;
pub mod error;
pub mod ip;
pub mod resolution;
pub mod rotation;
pub mod timezone;

pub use calendar::{LocalCalendar, LocalDay, TimezoneLookup, TzfLookup};
pub use cascade::{CascadePolicy, LocationCascade, ResolvedLocation, Tier};
pub use client_ip::ClientSignal;
pub use error::GeoError;
pub use ip::{IpApiClient, IpLocationResolver};
pub use resolution::Resolution;
pub use rotation::GlobalRotation;
pub use timezone::{TimezoneLocationResolver, TimezoneTable};
