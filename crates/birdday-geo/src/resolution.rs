use birdday_core::Location;

/// Outcome of a single resolver.
///
/// `Placeholder` is the sentinel for "the provider fell back to its default
/// answer". Callers never inspect display names to detect it.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Location),
    Placeholder,
}

impl Resolution {
    #[must_use]
    pub fn into_location(self) -> Option<Location> {
        match self {
            Resolution::Resolved(location) => Some(location),
            Resolution::Placeholder => None,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Resolution::Placeholder)
    }
}
