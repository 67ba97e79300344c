//! IANA timezone → approximate city location.

use std::collections::HashMap;

use birdday_core::Location;

use crate::resolution::Resolution;

pub trait TimezoneLocationResolver: Send + Sync {
    /// Never fails: unknown or empty identifiers yield
    /// [`Resolution::Placeholder`].
    fn resolve(&self, timezone: &str) -> Resolution;
}

/// `(zone, city, region, country, latitude, longitude)`
///
/// The placeholder's own zone is absent: it resolves to the sentinel and the
/// cascade decides whether that answer is genuine.
const BUILTIN_ZONES: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("America/Chicago", "Chicago", "Illinois", "United States", 41.8781, -87.6298),
    ("America/Denver", "Denver", "Colorado", "United States", 39.7392, -104.9903),
    ("America/Phoenix", "Phoenix", "Arizona", "United States", 33.4484, -112.0740),
    ("America/Los_Angeles", "Los Angeles", "California", "United States", 34.0522, -118.2437),
    ("America/Anchorage", "Anchorage", "Alaska", "United States", 61.2181, -149.9003),
    ("Pacific/Honolulu", "Honolulu", "Hawaii", "United States", 21.3069, -157.8583),
    ("America/Detroit", "Detroit", "Michigan", "United States", 42.3314, -83.0458),
    ("America/Toronto", "Toronto", "Ontario", "Canada", 43.6532, -79.3832),
    ("America/Vancouver", "Vancouver", "British Columbia", "Canada", 49.2827, -123.1207),
    ("America/Halifax", "Halifax", "Nova Scotia", "Canada", 44.6488, -63.5752),
    ("America/Mexico_City", "Mexico City", "CDMX", "Mexico", 19.4326, -99.1332),
    ("America/Bogota", "Bogota", "Bogota D.C.", "Colombia", 4.7110, -74.0721),
    ("America/Lima", "Lima", "Lima", "Peru", -12.0464, -77.0428),
    ("America/Sao_Paulo", "Sao Paulo", "Sao Paulo", "Brazil", -23.5505, -46.6333),
    ("America/Argentina/Buenos_Aires", "Buenos Aires", "Buenos Aires", "Argentina", -34.6037, -58.3816),
    ("America/Santiago", "Santiago", "Santiago Metropolitan", "Chile", -33.4489, -70.6693),
    ("Europe/London", "London", "England", "United Kingdom", 51.5074, -0.1278),
    ("Europe/Dublin", "Dublin", "Leinster", "Ireland", 53.3498, -6.2603),
    ("Europe/Lisbon", "Lisbon", "Lisbon", "Portugal", 38.7223, -9.1393),
    ("Europe/Madrid", "Madrid", "Community of Madrid", "Spain", 40.4168, -3.7038),
    ("Europe/Paris", "Paris", "Ile-de-France", "France", 48.8566, 2.3522),
    ("Europe/Amsterdam", "Amsterdam", "North Holland", "Netherlands", 52.3676, 4.9041),
    ("Europe/Berlin", "Berlin", "Berlin", "Germany", 52.5200, 13.4050),
    ("Europe/Rome", "Rome", "Lazio", "Italy", 41.9028, 12.4964),
    ("Europe/Stockholm", "Stockholm", "Stockholm", "Sweden", 59.3293, 18.0686),
    ("Europe/Warsaw", "Warsaw", "Masovia", "Poland", 52.2297, 21.0122),
    ("Europe/Athens", "Athens", "Attica", "Greece", 37.9838, 23.7275),
    ("Europe/Istanbul", "Istanbul", "Istanbul", "Turkey", 41.0082, 28.9784),
    ("Europe/Moscow", "Moscow", "Moscow", "Russia", 55.7558, 37.6173),
    ("Africa/Cairo", "Cairo", "Cairo", "Egypt", 30.0444, 31.2357),
    ("Africa/Lagos", "Lagos", "Lagos", "Nigeria", 6.5244, 3.3792),
    ("Africa/Nairobi", "Nairobi", "Nairobi County", "Kenya", -1.2921, 36.8219),
    ("Africa/Johannesburg", "Johannesburg", "Gauteng", "South Africa", -26.2041, 28.0473),
    ("Asia/Dubai", "Dubai", "Dubai", "United Arab Emirates", 25.2048, 55.2708),
    ("Asia/Kolkata", "Mumbai", "Maharashtra", "India", 19.0760, 72.8777),
    ("Asia/Bangkok", "Bangkok", "Bangkok", "Thailand", 13.7563, 100.5018),
    ("Asia/Singapore", "Singapore", "Singapore", "Singapore", 1.3521, 103.8198),
    ("Asia/Shanghai", "Shanghai", "Shanghai", "China", 31.2304, 121.4737),
    ("Asia/Hong_Kong", "Hong Kong", "Hong Kong", "China", 22.3193, 114.1694),
    ("Asia/Seoul", "Seoul", "Seoul", "South Korea", 37.5665, 126.9780),
    ("Asia/Tokyo", "Tokyo", "Tokyo", "Japan", 35.6762, 139.6503),
    ("Australia/Perth", "Perth", "Western Australia", "Australia", -31.9505, 115.8605),
    ("Australia/Sydney", "Sydney", "New South Wales", "Australia", -33.8688, 151.2093),
    ("Australia/Melbourne", "Melbourne", "Victoria", "Australia", -37.8136, 144.9631),
    ("Pacific/Auckland", "Auckland", "Auckland", "New Zealand", -36.8485, 174.7633),
    ("America/Boise", "Boise", "Idaho", "United States", 43.6150, -116.2023),
    ("America/Indiana/Indianapolis", "Indianapolis", "Indiana", "United States", 39.7684, -86.1581),
    ("America/Kentucky/Louisville", "Louisville", "Kentucky", "United States", 38.2527, -85.7585),
    ("America/Puerto_Rico", "San Juan", "Puerto Rico", "United States", 18.4655, -66.1057),
    ("America/Edmonton", "Edmonton", "Alberta", "Canada", 53.5461, -113.4938),
    ("America/Winnipeg", "Winnipeg", "Manitoba", "Canada", 49.8951, -97.1384),
    ("America/Regina", "Regina", "Saskatchewan", "Canada", 50.4452, -104.6189),
    ("America/St_Johns", "St. John's", "Newfoundland and Labrador", "Canada", 47.5615, -52.7126),
    ("America/Havana", "Havana", "Havana", "Cuba", 23.1136, -82.3666),
    ("America/Panama", "Panama City", "Panama", "Panama", 8.9824, -79.5199),
    ("America/Guatemala", "Guatemala City", "Guatemala", "Guatemala", 14.6349, -90.5069),
    ("America/Costa_Rica", "San Jose", "San Jose", "Costa Rica", 9.9281, -84.0907),
    ("America/Caracas", "Caracas", "Capital District", "Venezuela", 10.4806, -66.9036),
    ("America/Montevideo", "Montevideo", "Montevideo", "Uruguay", -34.9011, -56.1645),
    ("Europe/Vienna", "Vienna", "Vienna", "Austria", 48.2082, 16.3738),
    ("Europe/Brussels", "Brussels", "Brussels", "Belgium", 50.8503, 4.3517),
    ("Europe/Zurich", "Zurich", "Zurich", "Switzerland", 47.3769, 8.5417),
    ("Europe/Prague", "Prague", "Prague", "Czechia", 50.0755, 14.4378),
    ("Europe/Budapest", "Budapest", "Budapest", "Hungary", 47.4979, 19.0402),
    ("Europe/Copenhagen", "Copenhagen", "Capital Region", "Denmark", 55.6761, 12.5683),
    ("Europe/Oslo", "Oslo", "Oslo", "Norway", 59.9139, 10.7522),
    ("Europe/Helsinki", "Helsinki", "Uusimaa", "Finland", 60.1699, 24.9384),
    ("Europe/Bucharest", "Bucharest", "Bucharest", "Romania", 44.4268, 26.1025),
    ("Europe/Sofia", "Sofia", "Sofia City", "Bulgaria", 42.6977, 23.3219),
    ("Europe/Belgrade", "Belgrade", "Belgrade", "Serbia", 44.7866, 20.4489),
    ("Africa/Casablanca", "Casablanca", "Casablanca-Settat", "Morocco", 33.5731, -7.5898),
    ("Africa/Accra", "Accra", "Greater Accra", "Ghana", 5.6037, -0.1870),
    ("Africa/Addis_Ababa", "Addis Ababa", "Addis Ababa", "Ethiopia", 8.9806, 38.7578),
    ("Asia/Riyadh", "Riyadh", "Riyadh", "Saudi Arabia", 24.7136, 46.6753),
    ("Asia/Jerusalem", "Jerusalem", "Jerusalem", "Israel", 31.7683, 35.2137),
    ("Asia/Tehran", "Tehran", "Tehran", "Iran", 35.6892, 51.3890),
    ("Asia/Karachi", "Karachi", "Sindh", "Pakistan", 24.8607, 67.0011),
    ("Asia/Kathmandu", "Kathmandu", "Bagmati", "Nepal", 27.7172, 85.3240),
    ("Asia/Dhaka", "Dhaka", "Dhaka", "Bangladesh", 23.8103, 90.4125),
    ("Asia/Jakarta", "Jakarta", "Jakarta", "Indonesia", -6.2088, 106.8456),
    ("Asia/Ho_Chi_Minh", "Ho Chi Minh City", "Ho Chi Minh City", "Vietnam", 10.8231, 106.6297),
    ("Asia/Kuala_Lumpur", "Kuala Lumpur", "Kuala Lumpur", "Malaysia", 3.1390, 101.6869),
    ("Asia/Manila", "Manila", "Metro Manila", "Philippines", 14.5995, 120.9842),
    ("Asia/Taipei", "Taipei", "Taipei", "Taiwan", 25.0330, 121.5654),
    ("Australia/Brisbane", "Brisbane", "Queensland", "Australia", -27.4698, 153.0251),
    ("Australia/Adelaide", "Adelaide", "South Australia", "Australia", -34.9285, 138.6007),
];

/// In-memory zone table.
#[derive(Debug, Clone)]
pub struct TimezoneTable {
    zones: HashMap<String, Location>,
}

impl TimezoneTable {
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_ZONES.iter().map(
            |&(zone, city, region, country, lat, lng)| {
                (
                    zone.to_string(),
                    Location::new(city, region, country, lat, lng),
                )
            },
        ))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Location)>) -> Self {
        Self {
            zones: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl Default for TimezoneTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TimezoneLocationResolver for TimezoneTable {
    fn resolve(&self, timezone: &str) -> Resolution {
        self.zones
            .get(timezone.trim())
            .cloned()
            .map_or(Resolution::Placeholder, Resolution::Resolved)
    }
}
