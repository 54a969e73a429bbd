//! Seams between the geometry core and the app's data models.
//!
//! Search results and saved places carry their position in different
//! shapes; implementing these traits lets them flow through the radius
//! filter and the trip planner without conversion.

use crate::coordinate::Coordinate;

/// Anything with an optional position on the map.
///
/// Returns `None` when the backend omitted the geometry; such items are
/// dropped by radius queries rather than treated as errors.
pub trait Located {
    fn location(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn location(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

impl<T: Located> Located for &T {
    fn location(&self) -> Option<Coordinate> {
        (*self).location()
    }
}
