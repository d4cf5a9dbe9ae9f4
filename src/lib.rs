//! runspot-geo core
//!
//! Route geometry for the RunSpot app: polyline codec, walking directions,
//! and the spatial filters used to validate spots and find nearby routes.

pub mod geo;
pub mod polyline;
pub mod directions;
pub mod spatial;
pub mod model;
pub mod filter;
pub mod route;
pub mod spot;
pub mod points;
pub mod tracking;
pub mod traits;

pub use geo::GeoPoint;
pub use directions::{DirectionsClient, DirectionsConfig, DirectionsResult};
pub use polyline::{Polyline, PolylineError};
pub use traits::{HttpRoutingService, RoutingService};
