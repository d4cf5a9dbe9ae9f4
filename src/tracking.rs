//! Background tracking of a selected route.
//!
//! A [`TrackingSession`] owns the spots being watched and which of them have
//! already been announced. Its lifetime is the tracking session; nothing
//! here is process-global.

use std::collections::HashSet;

use crate::geo::GeoPoint;
use crate::model::Spot;

/// A spot closer than this triggers an alert.
pub const PROXIMITY_ALERT_METERS: f64 = 50.0;

#[derive(Debug)]
pub struct TrackingSession {
    route_id: String,
    spots: Vec<Spot>,
    notified: HashSet<String>,
    running: bool,
}

impl TrackingSession {
    /// Starts watching the spots that belong to `route_id`.
    pub fn start(route_id: impl Into<String>, spots: Vec<Spot>) -> Self {
        let route_id = route_id.into();
        let spots: Vec<Spot> = spots.into_iter().filter(|s| s.route_id == route_id).collect();
        tracing::debug!(route_id = %route_id, spots = spots.len(), "tracking started");

        Self {
            route_id,
            spots,
            notified: HashSet::new(),
            running: true,
        }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(route_id = %self.route_id, "tracking stopped");
        }
        self.running = false;
    }

    /// Feeds a location fix. Returns spots the user just came near, each at
    /// most once per session. A stopped session reports nothing.
    pub fn on_location(&mut self, location: GeoPoint) -> Vec<&Spot> {
        if !self.running {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for spot in &self.spots {
            if self.notified.contains(&spot.id) {
                continue;
            }
            if location.distance_to(&spot.location) < PROXIMITY_ALERT_METERS {
                self.notified.insert(spot.id.clone());
                hits.push(spot);
            }
        }
        hits
    }
}
