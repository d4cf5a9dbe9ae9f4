//! The routing seam the presentation layer depends on.
//!
//! Screens talk to a [`RoutingService`] rather than to HTTP or geometry
//! code directly, so tests can swap in a deterministic fake that only
//! overrides [`RoutingService::build_route`].

use async_trait::async_trait;

use crate::directions::{DirectionsClient, DirectionsConfig, DirectionsError, DirectionsResult};
use crate::geo::GeoPoint;
use crate::polyline::{self, PolylineError};
use crate::spatial;

#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Snapped walking route through `waypoints`, in order. Empty on failure.
    async fn build_route(&self, waypoints: &[GeoPoint]) -> DirectionsResult;

    fn decode_polyline(&self, encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
        polyline::decode(encoded)
    }

    fn is_near_path(&self, point: GeoPoint, path: &[GeoPoint], tolerance_meters: f64) -> bool {
        spatial::is_near_path(point, path, tolerance_meters)
    }

    fn is_within_radius(&self, origin: GeoPoint, target: GeoPoint, radius_meters: f64) -> bool {
        spatial::is_within_radius(origin, target, radius_meters)
    }
}

/// [`RoutingService`] backed by a directions HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRoutingService {
    client: DirectionsClient,
}

impl HttpRoutingService {
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        Ok(Self {
            client: DirectionsClient::new(config)?,
        })
    }

    pub fn from_env() -> Result<Self, DirectionsError> {
        Self::new(DirectionsConfig::from_env()?)
    }
}

#[async_trait]
impl RoutingService for HttpRoutingService {
    async fn build_route(&self, waypoints: &[GeoPoint]) -> DirectionsResult {
        self.client.build_route(waypoints).await
    }
}
