//! Real Colombo / Sri Lanka locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap, rounded to four decimals.

use trip_companion::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Default map center of the planner screen.
pub const COLOMBO_CENTER: Location = Location::new("Colombo", 6.9271, 79.8612);

// ============================================================================
// Central Colombo (all within 3 km of the center)
// ============================================================================

pub const CENTRAL_COLOMBO: &[Location] = &[
    Location::new("Lotus Tower", 6.9271, 79.8581),
    Location::new("Gangaramaya Temple", 6.9167, 79.8565),
    Location::new("Viharamahadevi Park", 6.9125, 79.8615),
    Location::new("National Museum of Colombo", 6.9101, 79.8611),
    Location::new("Pettah Floating Market", 6.9344, 79.8532),
    Location::new("Dutch Hospital", 6.9345, 79.8434),
    Location::new("Galle Face Green", 6.9253, 79.8440),
    Location::new("Independence Memorial Hall", 6.9040, 79.8687),
];

// ============================================================================
// Further afield (7 km or more from the center)
// ============================================================================

pub const DAY_TRIPS: &[Location] = &[
    Location::new("Mount Lavinia Beach", 6.8390, 79.8630),
    Location::new("Kelaniya Raja Maha Vihara", 6.9553, 79.9219),
    Location::new("Temple of the Tooth", 7.2936, 80.6413),
    Location::new("Galle Fort", 6.0261, 80.2170),
    Location::new("Sigiriya", 7.9570, 80.7603),
];

pub fn all_locations() -> Vec<Location> {
    let mut all = Vec::with_capacity(CENTRAL_COLOMBO.len() + DAY_TRIPS.len());
    all.extend_from_slice(CENTRAL_COLOMBO);
    all.extend_from_slice(DAY_TRIPS);
    all
}
