//! In-memory shapes of the persisted RunSpot documents.
//!
//! Storage is someone else's job; these are the values the geometry
//! pipeline produces and consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directions::DirectionsResult;
use crate::geo::GeoPoint;

/// A drawn running route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    /// Ordered start to end. Empty means no renderable geometry.
    pub path_points: Vec<GeoPoint>,
    pub distance_meters: u32,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Builds a route from finished directions. Callers outside the crate go
    /// through [`RouteDraft::validate`](crate::route::RouteDraft::validate).
    pub(crate) fn from_directions(
        id: impl Into<String>,
        name: impl Into<String>,
        author_id: impl Into<String>,
        directions: DirectionsResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path_points: directions.path,
            distance_meters: directions.total_distance_meters,
            author_id: author_id.into(),
            created_at,
        }
    }

    pub fn start_point(&self) -> Option<GeoPoint> {
        self.path_points.first().copied()
    }

    pub fn has_geometry(&self) -> bool {
        !self.path_points.is_empty()
    }

    pub fn distance_km(&self) -> f64 {
        f64::from(self.distance_meters) / 1000.0
    }
}

/// A point of interest pinned to a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub route_id: String,
    #[serde(rename = "type")]
    pub spot_type: String,
    pub description: String,
    /// 1..=5
    pub rating: u8,
    pub location: GeoPoint,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub points: i64,
}
