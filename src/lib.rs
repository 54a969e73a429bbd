//! trip-companion core
//!
//! Route geometry, nearby-place search, transit options, accounts and
//! emergency contacts for a trip companion app. The geometry modules are
//! pure; the clients talk to the places, planning, auth and directions
//! backends.

pub mod traits;
pub mod endpoint;
pub mod coordinate;
pub mod polyline;
pub mod haversine;
pub mod places;
pub mod routing;
pub mod contacts;
pub mod auth;
pub mod transit;

pub use coordinate::{Bounds, Coordinate};
pub use polyline::{MalformedPolyline, Polyline};
