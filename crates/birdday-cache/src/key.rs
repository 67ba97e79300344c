use std::fmt;

use birdday_core::LocationKey;
use chrono::NaiveDate;

/// Identity of one refresh: (card, local day, coarse location).
///
/// Both trigger kinds build keys the same way, so a webhook following a
/// scheduled sweep for the same place and day finds the sweep's record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub card_id: String,
    pub local_date: NaiveDate,
    pub location_key: LocationKey,
}

impl CacheKey {
    #[must_use]
    pub fn new(card_id: impl Into<String>, local_date: NaiveDate, location_key: LocationKey) -> Self {
        Self {
            card_id: card_id.into(),
            local_date,
            location_key,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.card_id,
            self.local_date.format("%Y-%m-%d"),
            self.location_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    #[test]
    fn display_joins_components() {
        let key = CacheKey::new(
            "card-1",
            date(2),
            LocationKey::from_coordinates(35.6762, 139.6503, 1),
        );
        assert_eq!(key.to_string(), "card-1:2025-06-02:35.7,139.7");
    }

    #[test]
    fn keys_are_pure_functions_of_inputs() {
        let a = CacheKey::new("card-1", date(2), LocationKey::from_coordinates(51.5074, -0.1278, 1));
        let b = CacheKey::new("card-1", date(2), LocationKey::from_coordinates(51.5121, -0.1102, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn any_component_change_changes_the_key() {
        let base = CacheKey::new("card-1", date(2), LocationKey::from_coordinates(1.0, 1.0, 1));
        assert_ne!(base, CacheKey::new("card-2", date(2), base.location_key.clone()));
        assert_ne!(base, CacheKey::new("card-1", date(3), base.location_key.clone()));
        assert_ne!(
            base,
            CacheKey::new("card-1", date(2), LocationKey::from_coordinates(2.0, 1.0, 1))
        );
    }
}
