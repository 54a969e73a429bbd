//! Geographic coordinate and bounding-box types.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Serializes as `{"lat": .., "lng": ..}`, the shape both backends use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both axes are finite and inside the valid degree ranges.
    pub fn is_usable(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Formats as `lat,lng`, the form the places backend expects in queries.
    pub fn to_query_param(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.lat, coord.lng)
    }
}

/// Axis-aligned box enclosing a set of coordinates.
///
/// Used to fit a map viewport to a decoded route. Does not handle routes
/// crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point, or `None` when there are none.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Bounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };

        Some(iter.fold(init, |bounds, point| Bounds {
            south: bounds.south.min(point.lat),
            west: bounds.west.min(point.lng),
            north: bounds.north.max(point.lat),
            east: bounds.east.max(point.lng),
        }))
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Latitude and longitude extent in degrees.
    pub fn span(&self) -> (f64, f64) {
        (self.north - self.south, self.east - self.west)
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}
