//! Walking-directions HTTP adapter.
//!
//! Turns an ordered list of tapped waypoints into a snapped path and its
//! length by asking a Google-compatible directions endpoint. Every failure
//! collapses into [`DirectionsResult::empty`]; callers show one "no path
//! found" message regardless of cause.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::polyline::{self, PolylineError};

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
pub const DIRECTIONS_URL_ENV: &str = "RUNSPOT_DIRECTIONS_URL";

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub mode: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            api_key: String::new(),
            mode: "walking".to_string(),
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Reads `GOOGLE_MAPS_API_KEY` and, if set, `RUNSPOT_DIRECTIONS_URL`.
    pub fn from_env() -> Result<Self, DirectionsError> {
        Self::from_vars(|name| env::var(name))
    }

    /// Like [`from_env`](Self::from_env) with variables resolved by `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, DirectionsError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let api_key = lookup(API_KEY_ENV)?;
        let mut config = Self::with_api_key(api_key);
        if let Ok(base_url) = lookup(DIRECTIONS_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

/// Snapped route geometry and its total length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResult {
    pub path: Vec<GeoPoint>,
    pub total_distance_meters: u32,
}

impl DirectionsResult {
    /// The no-route result: no points, zero distance.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

#[derive(Debug)]
pub enum DirectionsError {
    TooFewWaypoints(usize),
    Env(env::VarError),
    Http(reqwest::Error),
    Status(u16),
    Json(serde_json::Error),
    /// Provider answered with a status other than `OK` or `ZERO_RESULTS`.
    ProviderStatus(String),
    NoRoutes,
    Polyline(PolylineError),
}

impl fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionsError::TooFewWaypoints(n) => {
                write!(f, "at least 2 waypoints required, got {}", n)
            }
            DirectionsError::Env(err) => write!(f, "{} not usable: {}", API_KEY_ENV, err),
            DirectionsError::Http(err) => write!(f, "directions request failed: {}", err),
            DirectionsError::Status(code) => write!(f, "directions provider returned {}", code),
            DirectionsError::Json(err) => write!(f, "directions response unreadable: {}", err),
            DirectionsError::ProviderStatus(status) => {
                write!(f, "directions provider status {}", status)
            }
            DirectionsError::NoRoutes => f.write_str("directions provider returned no routes"),
            DirectionsError::Polyline(err) => write!(f, "route geometry: {}", err),
        }
    }
}

impl std::error::Error for DirectionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectionsError::Env(err) => Some(err),
            DirectionsError::Http(err) => Some(err),
            DirectionsError::Json(err) => Some(err),
            DirectionsError::Polyline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<env::VarError> for DirectionsError {
    fn from(err: env::VarError) -> Self {
        DirectionsError::Env(err)
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        DirectionsError::Http(err)
    }
}

impl From<serde_json::Error> for DirectionsError {
    fn from(err: serde_json::Error) -> Self {
        DirectionsError::Json(err)
    }
}

impl From<PolylineError> for DirectionsError {
    fn from(err: PolylineError) -> Self {
        DirectionsError::Polyline(err)
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &DirectionsConfig {
        &self.config
    }

    /// Routes through `waypoints` in the given order.
    ///
    /// Returns [`DirectionsResult::empty`] on fewer than two waypoints or on
    /// any provider failure. Makes at most one request, never retries.
    pub async fn build_route(&self, waypoints: &[GeoPoint]) -> DirectionsResult {
        match self.try_build_route(waypoints).await {
            Ok(result) => result,
            Err(DirectionsError::TooFewWaypoints(n)) => {
                tracing::debug!(waypoints = n, "skipping directions request");
                DirectionsResult::empty()
            }
            Err(err) => {
                tracing::warn!(error = %err, "no route found");
                DirectionsResult::empty()
            }
        }
    }

    /// Same pipeline as [`build_route`](Self::build_route) with the failure
    /// cause kept.
    #[tracing::instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    pub async fn try_build_route(
        &self,
        waypoints: &[GeoPoint],
    ) -> Result<DirectionsResult, DirectionsError> {
        if waypoints.len() < 2 {
            return Err(DirectionsError::TooFewWaypoints(waypoints.len()));
        }

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&query_params(waypoints, &self.config.mode, &self.config.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectionsError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: DirectionsResponse = serde_json::from_str(&body)?;
        let result = reduce_response(parsed)?;

        tracing::debug!(
            points = result.path.len(),
            distance_m = result.total_distance_meters,
            "route built"
        );
        Ok(result)
    }
}

/// One-shot helper: default endpoint, given key.
pub async fn build_route(waypoints: &[GeoPoint], api_key: &str) -> DirectionsResult {
    if waypoints.len() < 2 {
        return DirectionsResult::empty();
    }
    match DirectionsClient::new(DirectionsConfig::with_api_key(api_key)) {
        Ok(client) => client.build_route(waypoints).await,
        Err(err) => {
            tracing::warn!(error = %err, "directions client unavailable");
            DirectionsResult::empty()
        }
    }
}

/// Query string for a directions request. Intermediate waypoints keep their
/// order; the provider is not asked to optimize them.
pub fn query_params(waypoints: &[GeoPoint], mode: &str, api_key: &str) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(5);

    if let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) {
        params.push(("origin", first.to_query_value()));
        params.push(("destination", last.to_query_value()));
    }

    if waypoints.len() > 2 {
        let via = waypoints[1..waypoints.len() - 1]
            .iter()
            .map(GeoPoint::to_query_value)
            .collect::<Vec<_>>()
            .join("|");
        params.push(("waypoints", via));
    }

    params.push(("mode", mode.to_string()));
    params.push(("key", api_key.to_string()));
    params
}

/// Reduces a provider response to the first route's geometry and the sum of
/// its leg distances.
pub fn reduce_response(response: DirectionsResponse) -> Result<DirectionsResult, DirectionsError> {
    if let Some(status) = response.status {
        if !(status == "OK" || status == "ZERO_RESULTS") {
            return Err(DirectionsError::ProviderStatus(status));
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoutes)?;

    let path = polyline::decode(&route.overview_polyline.points)?;
    if path.is_empty() {
        return Err(DirectionsError::NoRoutes);
    }
    let total_distance_meters = route
        .legs
        .iter()
        .fold(0u32, |acc, leg| acc.saturating_add(leg.distance.value));

    Ok(DirectionsResult {
        path,
        total_distance_meters,
    })
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<ProviderRoute>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderRoute {
    pub overview_polyline: OverviewPolyline,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    pub distance: LegDistance,
}

#[derive(Debug, Deserialize)]
pub struct LegDistance {
    pub value: u32,
}
