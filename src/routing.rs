//! Trip-planning backend adapter.
//!
//! The planner service returns a Directions-style route (camelCase JSON)
//! whose overview path is an encoded polyline, plus a list of places near
//! the destination. [`TripPlan`] bundles both with the decoded path.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coordinate::{Bounds, Coordinate};
use crate::endpoint::{InvalidBaseUrl, endpoint};
use crate::polyline::{MalformedPolyline, Polyline};
use crate::traits::Located;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Origin or destination left blank
    #[error("both origin and destination are required")]
    MissingEndpoint,

    #[error(transparent)]
    Polyline(#[from] MalformedPolyline),

    #[error(transparent)]
    BaseUrl(#[from] InvalidBaseUrl),
}

#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent with nearby searches so the backend can personalise results.
    pub user_id: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_secs: 10,
            user_id: "demo-user".to_string(),
        }
    }
}

impl RoutingConfig {
    /// Defaults with `TRIP_PLAN_BASE_URL` applied when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRIP_PLAN_BASE_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    pub distance: TextValue,
    pub duration: TextValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
    pub overview_polyline: OverviewPolyline,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePhoto {
    pub photo_reference: String,
}

/// A place suggested near the trip destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    pub rating: Option<f64>,
    pub geometry_location: Option<Coordinate>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
}

impl Located for NearbyPlace {
    fn location(&self) -> Option<Coordinate> {
        self.geometry_location
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlacesResponse {
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
}

#[derive(Debug, Serialize)]
struct PathRequest<'a> {
    origin: &'a str,
    destination: &'a str,
}

/// Everything the planner screen draws for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub legs: Vec<RouteLeg>,
    /// Decoded overview path of the first route.
    pub path: Polyline,
    /// Viewport enclosing the path, `None` when there is no path.
    pub bounds: Option<Bounds>,
    pub places: Vec<NearbyPlace>,
}

impl TripPlan {
    /// Assembles a plan from the two backend responses.
    ///
    /// Only the first route is used. A response without routes yields an
    /// empty path rather than an error.
    pub fn from_responses(
        route: RouteResponse,
        places: NearbyPlacesResponse,
    ) -> Result<Self, MalformedPolyline> {
        let (legs, path) = match route.routes.into_iter().next() {
            Some(first) => (first.legs, Polyline::decode(&first.overview_polyline.points)?),
            None => (Vec::new(), Polyline::default()),
        };
        let bounds = path.bounds();

        Ok(Self {
            legs,
            path,
            bounds,
            places: places.results,
        })
    }

    /// Great-circle length of the route path in meters.
    pub fn path_length_meters(&self) -> f64 {
        self.path.length_meters()
    }

    /// Nearby places that fall inside the route's viewport.
    pub fn places_in_view(&self) -> Vec<&NearbyPlace> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        self.places
            .iter()
            .filter(|place| {
                place
                    .location()
                    .is_some_and(|coord| bounds.contains(&coord))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RouteClient {
    config: RoutingConfig,
    client: reqwest::blocking::Client,
}

impl RouteClient {
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Fetches the route between two free-text addresses.
    pub fn find_path(&self, origin: &str, destination: &str) -> Result<RouteResponse, RoutingError> {
        let url = endpoint(&self.config.base_url, &["pipeline", "path"])?;
        debug!(%url, origin, destination, "requesting route");

        let response = self
            .client
            .post(url)
            .json(&PathRequest { origin, destination })
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<RouteResponse>())?;

        Ok(response)
    }

    /// Places the backend recommends around `location`.
    pub fn search_nearby(&self, location: &str) -> Result<NearbyPlacesResponse, RoutingError> {
        let url = endpoint(&self.config.base_url, &["pipeline", "search"])?;
        debug!(%url, location, "searching places near destination");

        let response = self
            .client
            .get(url)
            .query(&[("userId", self.config.user_id.as_str()), ("location", location)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<NearbyPlacesResponse>())?;

        Ok(response)
    }

    /// Plans a trip: route, decoded path, and places near the destination.
    pub fn plan_trip(&self, origin: &str, destination: &str) -> Result<TripPlan, RoutingError> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(RoutingError::MissingEndpoint);
        }

        let route = self.find_path(origin, destination)?;
        let places = self.search_nearby(destination)?;
        let plan = TripPlan::from_responses(route, places)?;

        info!(
            points = plan.path.len(),
            legs = plan.legs.len(),
            places = plan.places.len(),
            "trip planned"
        );
        Ok(plan)
    }
}
