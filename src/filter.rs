//! Route list filtering for the browse screen.
//!
//! Filters run in a fixed order: search, author, length, radius, then the
//! creation-date window. Each step is a stable filter.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::geo::GeoPoint;
use crate::model::{Route, Spot};
use crate::spatial;

/// Upper bound of the route length slider.
pub const MAX_DISTANCE_FILTER_KM: f64 = 50.0;

pub const DEFAULT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusFilter {
    /// Last known user location. Without one the radius step is skipped.
    pub center: Option<GeoPoint>,
    pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteFilter {
    /// Case-insensitive match on route name or on the type of any spot on it.
    pub query: Option<String>,
    /// Keep only routes by this author.
    pub author_id: Option<String>,
    pub distance_range_km: (f64, f64),
    pub radius: Option<RadiusFilter>,
    /// Exclusive lower bound on creation time.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive last day; routes created before its 23:59:59 pass.
    pub created_before: Option<NaiveDate>,
}

impl Default for RouteFilter {
    fn default() -> Self {
        Self {
            query: None,
            author_id: None,
            distance_range_km: (0.0, MAX_DISTANCE_FILTER_KM),
            radius: None,
            created_after: None,
            created_before: None,
        }
    }
}

impl RouteFilter {
    pub fn apply(&self, routes: &[Route], spots: &[Spot]) -> Vec<Route> {
        let mut filtered: Vec<Route> = routes.to_vec();

        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            let matching_routes: HashSet<&str> = spots
                .iter()
                .filter(|spot| spot.spot_type.to_lowercase().contains(&needle))
                .map(|spot| spot.route_id.as_str())
                .collect();

            filtered.retain(|route| {
                route.name.to_lowercase().contains(&needle)
                    || matching_routes.contains(route.id.as_str())
            });
        }

        if let Some(author_id) = &self.author_id {
            filtered.retain(|route| &route.author_id == author_id);
        }

        let (min_km, max_km) = self.distance_range_km;
        let min_meters = (min_km * 1000.0) as u32;
        let max_meters = (max_km * 1000.0) as u32;
        filtered.retain(|route| (min_meters..=max_meters).contains(&route.distance_meters));

        if let Some(RadiusFilter {
            center: Some(center),
            radius_km,
        }) = self.radius
        {
            filtered = spatial::filter_routes_by_radius(center, &filtered, radius_km);
        }

        if let Some(after) = self.created_after {
            filtered.retain(|route| route.created_at > after);
        }

        if let Some(end) = self.created_before.and_then(end_of_day) {
            filtered.retain(|route| route.created_at < end);
        }

        tracing::trace!(input = routes.len(), output = filtered.len(), "routes filtered");
        filtered
    }
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn route(id: &str, name: &str, author: &str, meters: u32, day: u32) -> Route {
        Route {
            id: id.to_string(),
            name: name.to_string(),
            path_points: vec![GeoPoint::new(43.32, 21.89)],
            distance_meters: meters,
            author_id: author.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
        }
    }

    fn spot(route_id: &str, spot_type: &str) -> Spot {
        Spot {
            id: format!("{}-{}", route_id, spot_type),
            route_id: route_id.to_string(),
            spot_type: spot_type.to_string(),
            description: "desc".to_string(),
            rating: 4,
            location: GeoPoint::new(43.32, 21.89),
            author_id: "u".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            image_url: None,
        }
    }

    fn ids(routes: &[Route]) -> Vec<&str> {
        routes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_everything_in_range() {
        let routes = vec![route("a", "Park", "u1", 3000, 1), route("b", "Long", "u1", 60_000, 2)];
        let filtered = RouteFilter::default().apply(&routes, &[]);
        assert_eq!(ids(&filtered), vec!["a"]);
    }

    #[test]
    fn test_query_matches_name_or_spot_type() {
        let routes = vec![
            route("a", "Morning PARK run", "u1", 3000, 1),
            route("b", "River", "u1", 3000, 1),
            route("c", "Hill", "u1", 3000, 1),
        ];
        let spots = vec![spot("b", "Water Park"), spot("c", "Bench")];
        let filter = RouteFilter {
            query: Some("park".to_string()),
            ..RouteFilter::default()
        };
        assert_eq!(ids(&filter.apply(&routes, &spots)), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let routes = vec![route("a", "Park", "u1", 3000, 1)];
        let filter = RouteFilter {
            query: Some("   ".to_string()),
            ..RouteFilter::default()
        };
        assert_eq!(filter.apply(&routes, &[]).len(), 1);
    }

    #[test]
    fn test_author_and_distance() {
        let routes = vec![
            route("a", "A", "me", 2000, 1),
            route("b", "B", "other", 2000, 1),
            route("c", "C", "me", 12_000, 1),
        ];
        let filter = RouteFilter {
            author_id: Some("me".to_string()),
            distance_range_km: (1.0, 10.0),
            ..RouteFilter::default()
        };
        assert_eq!(ids(&filter.apply(&routes, &[])), vec!["a"]);
    }

    #[test]
    fn test_radius_without_location_is_skipped() {
        let routes = vec![route("a", "A", "me", 2000, 1)];
        let filter = RouteFilter {
            radius: Some(RadiusFilter {
                center: None,
                radius_km: 1.0,
            }),
            ..RouteFilter::default()
        };
        assert_eq!(filter.apply(&routes, &[]).len(), 1);
    }

    #[test]
    fn test_radius_with_location() {
        let mut far = route("far", "Far", "me", 2000, 1);
        far.path_points = vec![GeoPoint::new(44.81, 20.46)];
        let routes = vec![route("near", "Near", "me", 2000, 1), far];
        let filter = RouteFilter {
            radius: Some(RadiusFilter {
                center: Some(GeoPoint::new(43.321, 21.891)),
                radius_km: DEFAULT_RADIUS_KM,
            }),
            ..RouteFilter::default()
        };
        assert_eq!(ids(&filter.apply(&routes, &[])), vec!["near"]);
    }

    #[test]
    fn test_date_window() {
        let routes = vec![
            route("d1", "A", "me", 2000, 1),
            route("d5", "B", "me", 2000, 5),
            route("d9", "C", "me", 2000, 9),
        ];
        let filter = RouteFilter {
            created_after: Some(Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()),
            created_before: NaiveDate::from_ymd_opt(2025, 6, 5),
            ..RouteFilter::default()
        };
        assert_eq!(ids(&filter.apply(&routes, &[])), vec!["d5"]);
    }
}
