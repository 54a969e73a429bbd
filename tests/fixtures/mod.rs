//! Test fixtures for trip-companion.
//!
//! Provides real Colombo-area places plus a helper for placing synthetic
//! points at exact distances along the equator.

#![allow(dead_code)]

pub mod colombo_locations;

pub use colombo_locations::*;

use trip_companion::Coordinate;
use trip_companion::haversine::EARTH_RADIUS_M;

/// A point on the equator `meters` east of (0, 0).
pub fn east_of_origin(meters: f64) -> Coordinate {
    Coordinate::new(0.0, (meters / EARTH_RADIUS_M).to_degrees())
}
