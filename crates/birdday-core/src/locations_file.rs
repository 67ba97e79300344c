use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Location};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationEntry> for Location {
    fn from(entry: LocationEntry) -> Self {
        Location::new(
            entry.city,
            entry.region,
            entry.country,
            entry.latitude,
            entry.longitude,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationsFile {
    pub locations: Vec<LocationEntry>,
}

impl LocationsFile {
    #[must_use]
    pub fn into_locations(self) -> Vec<Location> {
        self.locations.into_iter().map(Location::from).collect()
    }
}

/// Load and validate a rotation list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locations(path: &Path) -> Result<LocationsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_locations(&content)
}

pub(crate) fn parse_locations(content: &str) -> Result<LocationsFile, ConfigError> {
    let file: LocationsFile = serde_yaml::from_str(content)?;
    validate_locations(&file)?;
    Ok(file)
}

fn validate_locations(file: &LocationsFile) -> Result<(), ConfigError> {
    if file.locations.is_empty() {
        return Err(ConfigError::Validation(
            "locations file must list at least one location".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in &file.locations {
        if entry.city.trim().is_empty() {
            return Err(ConfigError::Validation(
                "location city must be non-empty".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&entry.latitude) || !(-180.0..=180.0).contains(&entry.longitude)
        {
            return Err(ConfigError::Validation(format!(
                "location '{}' has out-of-range coordinates ({}, {})",
                entry.city, entry.latitude, entry.longitude
            )));
        }

        let ident = format!("{}|{}", entry.city.to_lowercase(), entry.country.to_lowercase());
        if !seen.insert(ident) {
            return Err(ConfigError::Validation(format!(
                "duplicate location: '{}, {}'",
                entry.city, entry.country
            )));
        }
    }

    Ok(())
}
