use birdday_core::Location;
use chrono::{Datelike, NaiveDate};

use crate::error::GeoError;

const BUILTIN_ROTATION: &[(&str, &str, &str, f64, f64)] = &[
    ("Reykjavik", "Capital Region", "Iceland", 64.1466, -21.9426),
    ("Nairobi", "Nairobi County", "Kenya", -1.2921, 36.8219),
    ("Manaus", "Amazonas", "Brazil", -3.1190, -60.0217),
    ("Hobart", "Tasmania", "Australia", -42.8821, 147.3272),
    ("Kyoto", "Kyoto", "Japan", 35.0116, 135.7681),
    ("Cape Town", "Western Cape", "South Africa", -33.9249, 18.4241),
    ("Vancouver", "British Columbia", "Canada", 49.2827, -123.1207),
    ("Cusco", "Cusco", "Peru", -13.5320, -71.9675),
    ("Edinburgh", "Scotland", "United Kingdom", 55.9533, -3.1883),
    ("Kathmandu", "Bagmati", "Nepal", 27.7172, 85.3240),
    ("Monteverde", "Puntarenas", "Costa Rica", 10.3000, -84.8167),
    ("Tromso", "Troms", "Norway", 69.6492, 18.9553),
    ("Darwin", "Northern Territory", "Australia", -12.4634, 130.8456),
    ("Marrakesh", "Marrakesh-Safi", "Morocco", 31.6295, -7.9811),
    ("Anchorage", "Alaska", "United States", 61.2181, -149.9003),
    ("Kuching", "Sarawak", "Malaysia", 1.5535, 110.3593),
    ("Ushuaia", "Tierra del Fuego", "Argentina", -54.8019, -68.3030),
    ("Seville", "Andalusia", "Spain", 37.3891, -5.9845),
    ("Queenstown", "Otago", "New Zealand", -45.0312, 168.6626),
    ("Tucson", "Arizona", "United States", 32.2226, -110.9747),
    ("Krakow", "Lesser Poland", "Poland", 50.0647, 19.9450),
    ("Chiang Mai", "Chiang Mai", "Thailand", 18.7883, 98.9853),
    ("Okavango Delta", "North-West", "Botswana", -19.2835, 22.6927),
];

/// Day-indexed sequence of fallback locations for scheduled sweeps.
#[derive(Debug, Clone)]
pub struct GlobalRotation {
    locations: Vec<Location>,
}

impl GlobalRotation {
    /// # Errors
    ///
    /// Returns [`GeoError::EmptyRotation`] if `locations` is empty.
    pub fn new(locations: Vec<Location>) -> Result<Self, GeoError> {
        if locations.is_empty() {
            return Err(GeoError::EmptyRotation);
        }
        Ok(Self { locations })
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            locations: BUILTIN_ROTATION
                .iter()
                .map(|&(city, region, country, lat, lng)| {
                    Location::new(city, region, country, lat, lng)
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Location for a zero-based day-of-year.
    #[must_use]
    pub fn for_day_of_year(&self, ordinal0: u32) -> &Location {
        let index = usize::try_from(ordinal0).unwrap_or(0) % self.locations.len();
        &self.locations[index]
    }

    #[must_use]
    pub fn for_date(&self, date: NaiveDate) -> &Location {
        self.for_day_of_year(date.ordinal0())
    }
}

impl Default for GlobalRotation {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use birdday_core::placeholder_location;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn empty_rotation_is_rejected() {
        assert!(matches!(
            GlobalRotation::new(Vec::new()),
            Err(GeoError::EmptyRotation)
        ));
    }

    #[test]
    fn same_day_always_yields_same_location() {
        let rotation = GlobalRotation::builtin();
        let first = rotation.for_date(date(2025, 4, 12)).clone();
        for _ in 0..5 {
            assert_eq!(rotation.for_date(date(2025, 4, 12)), &first);
        }
    }

    #[test]
    fn same_day_of_year_matches_across_years() {
        let rotation = GlobalRotation::builtin();
        assert_eq!(
            rotation.for_date(date(2025, 2, 10)),
            rotation.for_date(date(2026, 2, 10))
        );
    }

    #[test]
    fn days_within_list_length_are_distinct() {
        let rotation = GlobalRotation::builtin();
        let start = date(2025, 1, 1);
        let len = u64::try_from(rotation.len()).expect("len fits");
        let cities: std::collections::HashSet<_> = (0..len)
            .map(|offset| {
                let day = start + chrono::Days::new(offset);
                rotation.for_date(day).city.clone()
            })
            .collect();
        assert_eq!(cities.len(), rotation.len());
    }

    #[test]
    fn year_boundary_days_differ() {
        let rotation = GlobalRotation::builtin();
        assert_ne!(
            rotation.for_date(date(2024, 12, 31)),
            rotation.for_date(date(2025, 1, 1))
        );
        assert_ne!(
            rotation.for_date(date(2025, 12, 31)),
            rotation.for_date(date(2026, 1, 1))
        );
    }

    #[test]
    fn index_wraps_modulo_length() {
        let rotation = GlobalRotation::new(vec![
            Location::new("A", "", "", 1.0, 1.0),
            Location::new("B", "", "", 2.0, 2.0),
            Location::new("C", "", "", 3.0, 3.0),
        ])
        .expect("non-empty");
        assert_eq!(rotation.for_day_of_year(0).city, "A");
        assert_eq!(rotation.for_day_of_year(4).city, "B");
        assert_eq!(rotation.for_day_of_year(365).city, "C");
    }

    #[test]
    fn builtin_rotation_never_contains_placeholder() {
        let placeholder = placeholder_location();
        let rotation = GlobalRotation::builtin();
        for day in 0..366 {
            assert!(!rotation.for_day_of_year(day).is_near(&placeholder, 0.5));
        }
    }
}
