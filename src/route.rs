//! Validation of a finished route before it is saved.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::directions::DirectionsResult;
use crate::model::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    MissingName,
    /// Directions came back empty; there is nothing to save.
    NoGeometry,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::MissingName => f.write_str("route name must not be blank"),
            RouteError::NoGeometry => f.write_str("no path found for the route"),
        }
    }
}

impl std::error::Error for RouteError {}

/// Name typed into the save dialog.
#[derive(Debug, Clone, Default)]
pub struct RouteDraft {
    pub name: String,
}

/// A named route with geometry, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRoute {
    pub name: String,
    pub directions: DirectionsResult,
}

impl RouteDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self, directions: DirectionsResult) -> Result<ValidRoute, RouteError> {
        if directions.is_empty() {
            return Err(RouteError::NoGeometry);
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RouteError::MissingName);
        }

        Ok(ValidRoute {
            name: name.to_string(),
            directions,
        })
    }
}

impl ValidRoute {
    pub fn into_route(
        self,
        id: impl Into<String>,
        author_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Route {
        Route::from_directions(id, self.name, author_id, self.directions, created_at)
    }
}
