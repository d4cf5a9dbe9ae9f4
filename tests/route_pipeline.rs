//! Route creation to browsing, with a deterministic routing fake.
//!
//! Exercises the pieces the app wires together: directions, route saving,
//! spot placement, point awards, list filtering and tracking alerts.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use runspot_geo::directions::DirectionsResult;
use runspot_geo::filter::{RadiusFilter, RouteFilter};
use runspot_geo::model::{Route, User};
use runspot_geo::points::{self, Activity};
use runspot_geo::polyline;
use runspot_geo::route::{RouteDraft, RouteError};
use runspot_geo::spatial::{self, SPOT_PATH_TOLERANCE_METERS};
use runspot_geo::spot::{SpotDraft, SpotError};
use runspot_geo::tracking::TrackingSession;
use runspot_geo::{GeoPoint, RoutingService};

/// Replays a fixed encoded geometry, like a provider would for a park loop.
struct CannedRouting {
    encoded: String,
    distance_meters: u32,
}

#[async_trait]
impl RoutingService for CannedRouting {
    async fn build_route(&self, waypoints: &[GeoPoint]) -> DirectionsResult {
        if waypoints.len() < 2 {
            return DirectionsResult::empty();
        }
        match self.decode_polyline(&self.encoded) {
            Ok(path) => DirectionsResult {
                path,
                total_distance_meters: self.distance_meters,
            },
            Err(_) => DirectionsResult::empty(),
        }
    }
}

/// Tapped points around a park in Nis.
fn tapped_points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(43.31750, 21.88800),
        GeoPoint::new(43.31900, 21.89200),
        GeoPoint::new(43.32150, 21.89400),
    ]
}

fn snapped_path() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(43.31750, 21.88800),
        GeoPoint::new(43.31810, 21.88990),
        GeoPoint::new(43.31900, 21.89200),
        GeoPoint::new(43.32020, 21.89310),
        GeoPoint::new(43.32150, 21.89400),
    ]
}

fn user(id: &str, name: &str, points: i64) -> User {
    User {
        id: id.to_string(),
        email: format!("{}@runspot.test", id),
        full_name: name.to_string(),
        phone_number: String::new(),
        points,
    }
}

#[tokio::test]
async fn create_route_add_spot_and_browse() {
    let service = CannedRouting {
        encoded: polyline::encode(&snapped_path()),
        distance_meters: 640,
    };

    // Drawing: one tap is not enough to ask for directions.
    assert!(service.build_route(&tapped_points()[..1]).await.is_empty());

    let directions = service.build_route(&tapped_points()).await;
    assert_eq!(directions.path.len(), snapped_path().len());
    assert_eq!(directions.total_distance_meters, 640);

    let created_at = Utc.with_ymd_and_hms(2025, 9, 14, 7, 30, 0).unwrap();
    // Saving needs a name and a path.
    assert_eq!(
        RouteDraft::new("Park loop").validate(DirectionsResult::empty()),
        Err(RouteError::NoGeometry)
    );
    assert_eq!(
        RouteDraft::new(" ").validate(directions.clone()),
        Err(RouteError::MissingName)
    );
    let route = RouteDraft::new("Park loop")
        .validate(directions)
        .expect("named route with geometry")
        .into_route("r-park", "u-ana", created_at);

    let mut ana = user("u-ana", "Ana", 0);
    points::award(&mut ana, Activity::RouteCreated);

    // A spot beside the third segment is accepted.
    let beside = GeoPoint::new(43.31880, 21.89170);
    assert!(service.is_near_path(beside, &route.path_points, SPOT_PATH_TOLERANCE_METERS));
    let draft = SpotDraft {
        spot_type: "Fountain".to_string(),
        description: "Cold water by the gate".to_string(),
        rating: "5".to_string(),
        image_url: None,
    };
    let spot = draft
        .validate(&route, beside)
        .expect("spot on route")
        .into_spot("s-1", "u-marko", created_at);

    let mut marko = user("u-marko", "Marko", 0);
    points::award(&mut marko, Activity::SpotCreated);

    // A spot across the river is refused.
    assert_eq!(
        draft.validate(&route, GeoPoint::new(43.33000, 21.90500)),
        Err(SpotError::OffRoute)
    );

    let users = vec![marko, ana];
    let board = points::leaderboard(&users);
    assert_eq!(board[0].user.full_name, "Ana");
    assert_eq!(board[0].user.points, 10);
    assert_eq!(board[1].user.points, 2);

    // Browsing: searching by spot type and radius around the user.
    let mut far = route.clone();
    far.id = "r-belgrade".to_string();
    far.name = "Kalemegdan".to_string();
    far.path_points = vec![GeoPoint::new(44.8231, 20.4500), GeoPoint::new(44.8250, 20.4520)];
    let empty = Route {
        id: "r-empty".to_string(),
        name: "Fountain sprint".to_string(),
        path_points: Vec::new(),
        ..route.clone()
    };
    let routes = vec![route.clone(), far, empty];

    let user_location = GeoPoint::new(43.3209, 21.8958);
    let nearby = spatial::filter_routes_by_radius(user_location, &routes, 5.0);
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].id, "r-park");

    let filter = RouteFilter {
        query: Some("fountain".to_string()),
        radius: Some(RadiusFilter {
            center: Some(user_location),
            radius_km: 5.0,
        }),
        ..RouteFilter::default()
    };
    let found = filter.apply(&routes, std::slice::from_ref(&spot));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "r-park");
    assert_eq!(filter.apply(&found, std::slice::from_ref(&spot)), found);

    // Running the route: the fountain is announced once.
    let mut session = TrackingSession::start(route.id.clone(), vec![spot]);
    assert!(session.on_location(route.path_points[0]).is_empty());
    assert_eq!(session.on_location(GeoPoint::new(43.31885, 21.89172)).len(), 1);
    assert!(session.on_location(GeoPoint::new(43.31885, 21.89172)).is_empty());
    session.stop();
}
