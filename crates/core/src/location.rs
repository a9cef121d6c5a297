//! Delivery locations.
//!
//! There is no geocoding; the picker offers a fixed list and "detect my
//! location" always resolves to the same place.

/// Shown until the visitor picks a location.
pub const DEFAULT_LOCATION: &str = "Set your location";

/// Result of the simulated location detection.
pub const DETECTED_LOCATION: &str = "Detected: City Center, Main Street";

/// Locations offered by the picker.
pub const KNOWN_LOCATIONS: [&str; 5] = [
    "Downtown Area, Main Street, City",
    "North Shopping District, City",
    "Central Park Avenue, City",
    "Business Bay, 5th Block, City",
    "University Campus, City",
];

/// Known locations containing `query`, case-insensitively.
///
/// A blank query returns every location.
#[must_use]
pub fn search(query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    KNOWN_LOCATIONS
        .iter()
        .copied()
        .filter(|location| needle.is_empty() || location.to_lowercase().contains(&needle))
        .collect()
}
