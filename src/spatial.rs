//! Proximity tests for points, paths and routes.
//!
//! All distances are geodesic. None of these fail: degenerate geometry
//! yields `false` or an empty result.

use rayon::prelude::*;

use crate::geo::{self, GeoPoint, EARTH_RADIUS_M};
use crate::model::Route;

/// Tolerance used to decide whether a new spot sits on its route.
pub const SPOT_PATH_TOLERANCE_METERS: f64 = 100.0;

/// Route lists at least this long are filtered on the rayon pool.
pub const PARALLEL_FILTER_THRESHOLD: usize = 1024;

/// True if `point` is within `tolerance_meters` of the open polyline `path`.
///
/// A path with fewer than two points has no segment and never matches.
pub fn is_near_path(point: GeoPoint, path: &[GeoPoint], tolerance_meters: f64) -> bool {
    if path.len() < 2 {
        return false;
    }

    path.windows(2)
        .any(|segment| distance_to_segment(point, segment[0], segment[1]) <= tolerance_meters)
}

/// True if `target` is no further than `radius_meters` from `origin`.
pub fn is_within_radius(origin: GeoPoint, target: GeoPoint, radius_meters: f64) -> bool {
    geo::haversine_meters(origin, target) <= radius_meters
}

/// Routes whose first path point lies within `radius_km` of `user_location`.
///
/// Input order is preserved. Routes without geometry are always dropped.
pub fn filter_routes_by_radius(user_location: GeoPoint, routes: &[Route], radius_km: f64) -> Vec<Route> {
    let radius_meters = radius_km * 1000.0;
    let keep = |route: &&Route| {
        route
            .start_point()
            .is_some_and(|start| is_within_radius(user_location, start, radius_meters))
    };

    if routes.len() >= PARALLEL_FILTER_THRESHOLD {
        routes.par_iter().filter(keep).cloned().collect()
    } else {
        routes.iter().filter(keep).cloned().collect()
    }
}

/// Shortest geodesic distance in meters from `point` to the great-circle
/// segment `start`..`end`.
pub fn distance_to_segment(point: GeoPoint, start: GeoPoint, end: GeoPoint) -> f64 {
    let segment_angle = geo::central_angle(start, end);
    let start_angle = geo::central_angle(start, point);

    if segment_angle < f64::EPSILON {
        return start_angle * EARTH_RADIUS_M;
    }

    let bearing_delta = geo::initial_bearing(start, point) - geo::initial_bearing(start, end);
    let cross_track = (start_angle.sin() * bearing_delta.sin()).clamp(-1.0, 1.0).asin();

    let along_track = (start_angle.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos();
    let along_track = if bearing_delta.cos() < 0.0 { -along_track } else { along_track };

    if along_track <= 0.0 {
        start_angle * EARTH_RADIUS_M
    } else if along_track >= segment_angle {
        geo::haversine_meters(end, point)
    } else {
        cross_track.abs() * EARTH_RADIUS_M
    }
}
