//! The calendar day as observed at a resolved location.

use std::sync::Arc;

use birdday_core::{Clock, Location};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

/// Geo → IANA timezone index.
pub trait TimezoneLookup: Send + Sync {
    fn timezone_for(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// Polygon lookup over the timezone boundary data bundled with `tzf-rs`.
///
/// Construction parses the embedded dataset; build one and share it.
pub struct TzfLookup {
    finder: DefaultFinder,
}

impl TzfLookup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for TzfLookup {
    fn timezone_for(&self, latitude: f64, longitude: f64) -> Option<String> {
        let name = self.finder.get_tz_name(longitude, latitude);
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// A plain calendar date plus the zone it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    pub date: NaiveDate,
    pub timezone: Tz,
}

impl LocalDay {
    /// `YYYY-MM-DD`; equal for every instant within the same local day.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    #[must_use]
    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }
}

pub struct LocalCalendar {
    lookup: Arc<dyn TimezoneLookup>,
    clock: Arc<dyn Clock>,
}

impl LocalCalendar {
    #[must_use]
    pub fn new(lookup: Arc<dyn TimezoneLookup>, clock: Arc<dyn Clock>) -> Self {
        Self { lookup, clock }
    }

    /// Today's date at `location`. Falls back to UTC when the coordinates
    /// have no known zone, rather than failing the refresh.
    #[must_use]
    pub fn local_day(&self, location: &Location) -> LocalDay {
        let timezone = self.timezone_at(location);
        let date = self.clock.now().with_timezone(&timezone).date_naive();
        LocalDay { date, timezone }
    }

    fn timezone_at(&self, location: &Location) -> Tz {
        let Some(name) = self
            .lookup
            .timezone_for(location.latitude, location.longitude)
        else {
            tracing::warn!(
                city = %location.city,
                latitude = location.latitude,
                longitude = location.longitude,
                "calendar: no timezone for coordinates; using UTC"
            );
            return Tz::UTC;
        };

        name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(timezone = %name, "calendar: unrecognised timezone; using UTC");
            Tz::UTC
        })
    }
}

#[cfg(test)]
mod tests {
    use birdday_core::ManualClock;
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    struct FixedLookup(Option<&'static str>);

    impl TimezoneLookup for FixedLookup {
        fn timezone_for(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn calendar(zone: Option<&'static str>, now: DateTime<Utc>) -> LocalCalendar {
        LocalCalendar::new(Arc::new(FixedLookup(zone)), Arc::new(ManualClock::new(now)))
    }

    fn tokyo() -> Location {
        Location::new("Tokyo", "Tokyo", "Japan", 35.6762, 139.6503)
    }

    #[test]
    fn nine_hours_ahead_late_evening_utc_is_next_day() {
        let day = calendar(Some("Asia/Tokyo"), at(2025, 6, 1, 23, 30)).local_day(&tokyo());
        assert_eq!(day.date_string(), "2025-06-02");
        assert_eq!(day.timezone_name(), "Asia/Tokyo");
    }

    #[test]
    fn west_of_utc_early_morning_is_previous_day() {
        let la = Location::new("Los Angeles", "California", "United States", 34.05, -118.24);
        let day = calendar(Some("America/Los_Angeles"), at(2025, 1, 1, 3, 0)).local_day(&la);
        assert_eq!(day.date_string(), "2024-12-31");
    }

    #[test]
    fn same_local_day_compares_equal_across_seconds() {
        let clock = Arc::new(ManualClock::new(at(2025, 6, 1, 15, 0)));
        let calendar = LocalCalendar::new(Arc::new(FixedLookup(Some("Asia/Tokyo"))), clock.clone());
        let first = calendar.local_day(&tokyo());
        clock.advance(chrono::Duration::seconds(5));
        let second = calendar.local_day(&tokyo());
        assert_eq!(first, second);
        assert_eq!(first.date_string(), "2025-06-02");
    }

    #[test]
    fn missing_zone_falls_back_to_utc() {
        let day = calendar(None, at(2025, 6, 1, 23, 30)).local_day(&tokyo());
        assert_eq!(day.timezone, Tz::UTC);
        assert_eq!(day.date_string(), "2025-06-01");
    }

    #[test]
    fn unparseable_zone_falls_back_to_utc() {
        let day = calendar(Some("Not/AZone"), at(2025, 6, 1, 23, 30)).local_day(&tokyo());
        assert_eq!(day.timezone_name(), "UTC");
    }

    #[test]
    fn tzf_lookup_finds_tokyo() {
        let lookup = TzfLookup::new();
        assert_eq!(
            lookup.timezone_for(35.6762, 139.6503).as_deref(),
            Some("Asia/Tokyo")
        );
    }
}
