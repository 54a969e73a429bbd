//! Places backend adapter: nearby search and place details.
//!
//! The backend proxies Google Places, so responses keep Google's
//! snake_case field names and `status` strings.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::coordinate::Coordinate;
use crate::endpoint::{InvalidBaseUrl, endpoint};
use crate::haversine;
use crate::traits::Located;

const STATUS_OK: &str = "OK";

/// Errors from the places backend.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// Transport failure or non-2xx HTTP status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-OK Places status
    #[error("API error {status}: {message}")]
    Api { status: String, message: String },

    /// Request rejected before it was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    BaseUrl(#[from] InvalidBaseUrl),
}

#[derive(Debug, Clone)]
pub struct PlacesConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Cap on results returned from a nearby search.
    pub max_results: usize,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            max_results: 20,
        }
    }
}

impl PlacesConfig {
    /// Defaults overridden by `TRIP_API_BASE_URL` and `TRIP_API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRIP_API_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = std::env::var("TRIP_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Place categories offered by the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationCategory {
    Restaurant,
    Cinema,
    Nightclub,
    Theatre,
    ArtsCentre,
    CommunityCentre,
    EventsVenue,
    Fountain,
    Stage,
    Museum,
    SocialCentre,
}

impl LocationCategory {
    /// The Google Places type searched for this category.
    pub fn google_type(self) -> &'static str {
        match self {
            LocationCategory::Restaurant => "restaurant",
            LocationCategory::Cinema | LocationCategory::Theatre => "movie_theater",
            LocationCategory::Nightclub => "night_club",
            LocationCategory::ArtsCentre => "art_gallery",
            LocationCategory::CommunityCentre | LocationCategory::SocialCentre => "community_center",
            LocationCategory::EventsVenue => "event_venue",
            LocationCategory::Fountain => "tourist_attraction",
            LocationCategory::Stage => "performing_arts_theater",
            LocationCategory::Museum => "museum",
        }
    }
}

/// Free-text query matching any of the categories.
pub fn search_query(categories: &[LocationCategory]) -> String {
    categories
        .iter()
        .map(|category| category.google_type())
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub photo_reference: String,
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub html_attributions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
    pub permanently_closed: Option<bool>,
}

/// A nearby-search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub place_id: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub business_status: Option<String>,
}

impl Located for LocationDetail {
    fn location(&self) -> Option<Coordinate> {
        self.geometry.as_ref().and_then(|geometry| geometry.location)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author_name: String,
    pub rating: f64,
    pub relative_time_description: String,
    pub text: String,
    pub time: i64,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub language: Option<String>,
}

/// Full record for a single place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    #[serde(default)]
    pub formatted_address: String,
    pub place_id: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub website: Option<String>,
    pub international_phone_number: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    pub vicinity: Option<String>,
    pub utc_offset_minutes: Option<i32>,
    pub business_status: Option<String>,
}

impl Located for PlaceDetails {
    fn location(&self) -> Option<Coordinate> {
        self.geometry.as_ref().and_then(|geometry| geometry.location)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationSearchResponse {
    #[serde(default)]
    pub results: Vec<LocationDetail>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResponse {
    pub result: Option<PlaceDetails>,
    pub status: String,
    pub error_message: Option<String>,
}

fn api_error(status: String, message: Option<String>) -> PlacesError {
    let message = message.unwrap_or_else(|| format!("API Error: {}", status));
    PlacesError::Api { status, message }
}

/// Applies the client-side radius filter to a search response.
///
/// The backend's own radius handling is loose, so results are re-checked
/// against `radius_meters` and capped at `max_results`.
pub fn nearby_results(
    response: LocationSearchResponse,
    center: Coordinate,
    radius_meters: f64,
    max_results: usize,
) -> Result<Vec<LocationDetail>, PlacesError> {
    if response.status != STATUS_OK {
        return Err(api_error(response.status, response.error_message));
    }

    Ok(haversine::within_radius(
        center,
        response.results,
        radius_meters,
        Some(max_results),
    ))
}

/// Unwraps a details response into the place record.
pub fn place_from_response(response: PlaceDetailsResponse) -> Result<PlaceDetails, PlacesError> {
    match response.result {
        Some(place) if response.status == STATUS_OK => Ok(place),
        _ => Err(api_error(response.status, response.error_message)),
    }
}

#[derive(Debug, Clone)]
pub struct PlacesClient {
    config: PlacesConfig,
    client: reqwest::blocking::Client,
}

impl PlacesClient {
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Places of the given categories within `radius_meters` of `center`.
    pub fn search_nearby(
        &self,
        center: Coordinate,
        radius_meters: f64,
        categories: &[LocationCategory],
    ) -> Result<Vec<LocationDetail>, PlacesError> {
        let query = search_query(categories);
        let url = endpoint(&self.config.base_url, &["maps", "places"])?;
        debug!(%url, %query, radius_meters, "searching nearby places");

        let response = self
            .client
            .get(url)
            .query(&[
                ("query", query.as_str()),
                ("location", center.to_query_param().as_str()),
                ("radius", radius_meters.to_string().as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<LocationSearchResponse>())?;

        let results = nearby_results(response, center, radius_meters, self.config.max_results)
            .inspect_err(|err| warn!(error = %err, "location search failed"))?;
        info!(
            count = results.len(),
            %query,
            radius_meters,
            "found locations"
        );
        Ok(results)
    }

    /// Full details for one place.
    pub fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let place_id = place_id.trim();
        if place_id.is_empty() {
            return Err(PlacesError::InvalidRequest("Place ID is required.".to_string()));
        }

        let url = endpoint(&self.config.base_url, &["maps", "place", place_id])?;
        debug!(%url, "fetching place details");

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<PlaceDetailsResponse>())?;

        place_from_response(response)
            .inspect_err(|err| warn!(place_id, error = %err, "place details request failed"))
    }
}
