//! Geographic primitives and great-circle distance.
//!
//! Distances are haversine on a spherical Earth. Good to well under a
//! percent at the scales a running route covers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_meters(*self, *other)
    }

    /// Formats the point the way directions providers expect: `lat,lng`.
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.latitude, point.longitude)
    }
}

/// Haversine distance between two points in meters.
pub fn haversine_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_M
}

/// Angular distance between two points in radians.
pub(crate) fn central_angle(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * a.sqrt().min(1.0).asin()
}

/// Initial bearing from `from` towards `to`, radians clockwise from north.
pub(crate) fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();
    y.atan2(x)
}
