//! Transit options between two places.
//!
//! Fetches transit directions and turns each transit step of the first
//! route into a priced option the transport screen can list.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::endpoint::{InvalidBaseUrl, endpoint};

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    BaseUrl(#[from] InvalidBaseUrl),
}

#[derive(Debug, Clone)]
pub struct TransitConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl TransitConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Defaults with `GOOGLE_API_KEY` as the key.
    pub fn from_env() -> Self {
        Self::new(std::env::var("GOOGLE_API_KEY").unwrap_or_default())
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Modes offered by the transport screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Train,
    Bus,
    Taxi,
    #[serde(rename = "Tuk Tuk")]
    TukTuk,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Train,
        TransportMode::Bus,
        TransportMode::Taxi,
        TransportMode::TukTuk,
    ];

    /// Classifies a Directions vehicle type. Anything unrecognised rides a bus.
    pub fn from_vehicle_type(vehicle_type: &str) -> Self {
        if vehicle_type.contains("RAIL") {
            TransportMode::Train
        } else if vehicle_type.contains("TAXI") {
            TransportMode::Taxi
        } else {
            TransportMode::Bus
        }
    }

    pub fn is_eco(self) -> bool {
        self != TransportMode::Taxi
    }

    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Bus => "Shared ride",
            TransportMode::Train => "Low carbon",
            TransportMode::Taxi | TransportMode::TukTuk => "Direct",
        }
    }

    /// Flat fare in dollars.
    pub fn price(self) -> u32 {
        match self {
            TransportMode::Taxi => 25,
            TransportMode::Train => 12,
            TransportMode::Bus | TransportMode::TukTuk => 5,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TransportMode::Train => "Train",
            TransportMode::Bus => "Bus",
            TransportMode::Taxi => "Taxi",
            TransportMode::TukTuk => "Tuk Tuk",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransitLine {
    pub short_name: Option<String>,
    pub vehicle: Option<Vehicle>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransitDetails {
    pub line: Option<TransitLine>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub travel_mode: String,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    pub transit_details: Option<TransitDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// Google Directions response, reduced to what the options need.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportOption {
    /// Position among the route's transit steps.
    pub id: usize,
    pub name: String,
    pub mode: TransportMode,
    pub distance: String,
    pub duration: String,
    pub eco: bool,
    pub label: &'static str,
    pub price: u32,
}

impl TransportOption {
    fn from_step(id: usize, step: &Step) -> Self {
        let line = step
            .transit_details
            .as_ref()
            .and_then(|details| details.line.as_ref());
        let vehicle_type = line
            .and_then(|line| line.vehicle.as_ref())
            .and_then(|vehicle| vehicle.vehicle_type.as_deref())
            .unwrap_or("BUS");
        let mode = TransportMode::from_vehicle_type(vehicle_type);
        let name = line
            .and_then(|line| line.short_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(mode.display_name())
            .to_string();

        Self {
            id,
            name,
            mode,
            distance: step.distance.text.clone(),
            duration: step.duration.text.clone(),
            eco: mode.is_eco(),
            label: mode.label(),
            price: mode.price(),
        }
    }
}

/// One option per transit step of the first leg of the first route.
///
/// Walking and other non-transit steps are skipped; ids count only the
/// transit steps.
pub fn transport_options(response: &DirectionsResponse) -> Vec<TransportOption> {
    let Some(leg) = response
        .routes
        .first()
        .and_then(|route| route.legs.first())
    else {
        return Vec::new();
    };

    leg.steps
        .iter()
        .filter(|step| step.travel_mode == "TRANSIT")
        .enumerate()
        .map(|(id, step)| TransportOption::from_step(id, step))
        .collect()
}

/// Options of the selected mode only, in route order.
pub fn options_for_mode(response: &DirectionsResponse, mode: TransportMode) -> Vec<TransportOption> {
    transport_options(response)
        .into_iter()
        .filter(|option| option.mode == mode)
        .collect()
}

const MAPS_WEB_URL: &str = "https://www.google.com";

/// Link that opens the same journey in Google Maps.
pub fn maps_directions_url(from: &str, to: &str) -> Result<String, TransitError> {
    let mut url = endpoint(MAPS_WEB_URL, &["maps", "dir", ""])?;
    url.query_pairs_mut()
        .append_pair("api", "1")
        .append_pair("origin", from)
        .append_pair("destination", to)
        .append_pair("travelmode", "transit");
    Ok(url.into())
}

#[derive(Debug, Clone)]
pub struct TransitClient {
    config: TransitConfig,
    client: reqwest::blocking::Client,
}

impl TransitClient {
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Transit directions between two free-text places.
    pub fn directions(&self, from: &str, to: &str) -> Result<DirectionsResponse, TransitError> {
        let url = endpoint(&self.config.base_url, &["directions", "json"])?;
        debug!(%url, from, to, "requesting transit directions");

        let response = self
            .client
            .get(url)
            .query(&[
                ("origin", from),
                ("destination", to),
                ("mode", "transit"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<DirectionsResponse>())?;

        Ok(response)
    }

    /// Options of `mode` for travelling from `from` to `to`.
    pub fn options(&self, from: &str, to: &str, mode: TransportMode) -> Result<Vec<TransportOption>, TransitError> {
        let response = self.directions(from, to)?;
        let options = options_for_mode(&response, mode);
        info!(
            count = options.len(),
            mode = mode.display_name(),
            status = %response.status,
            "transport options"
        );
        Ok(options)
    }
}
