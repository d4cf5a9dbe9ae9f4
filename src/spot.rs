//! Validation of user-submitted spots.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::geo::GeoPoint;
use crate::model::{Route, Spot};
use crate::spatial::{self, SPOT_PATH_TOLERANCE_METERS};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotError {
    MissingField(&'static str),
    InvalidRating(String),
    OffRoute,
}

impl fmt::Display for SpotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotError::MissingField(field) => write!(f, "{} must not be blank", field),
            SpotError::InvalidRating(raw) => {
                write!(f, "rating must be {}..={}, got {:?}", MIN_RATING, MAX_RATING, raw)
            }
            SpotError::OffRoute => write!(
                f,
                "spot must be within {} m of the route",
                SPOT_PATH_TOLERANCE_METERS
            ),
        }
    }
}

impl std::error::Error for SpotError {}

/// Raw form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct SpotDraft {
    pub spot_type: String,
    pub description: String,
    pub rating: String,
    pub image_url: Option<String>,
}

/// A draft that passed validation against its route.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSpot {
    pub route_id: String,
    pub spot_type: String,
    pub description: String,
    pub rating: u8,
    pub location: GeoPoint,
    pub image_url: Option<String>,
}

impl SpotDraft {
    pub fn validate(&self, route: &Route, location: GeoPoint) -> Result<ValidSpot, SpotError> {
        let spot_type = self.spot_type.trim();
        if spot_type.is_empty() {
            return Err(SpotError::MissingField("type"));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(SpotError::MissingField("description"));
        }
        let raw_rating = self.rating.trim();
        if raw_rating.is_empty() {
            return Err(SpotError::MissingField("rating"));
        }

        let rating = raw_rating
            .parse::<u8>()
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or_else(|| SpotError::InvalidRating(raw_rating.to_string()))?;

        if !spatial::is_near_path(location, &route.path_points, SPOT_PATH_TOLERANCE_METERS) {
            return Err(SpotError::OffRoute);
        }

        Ok(ValidSpot {
            route_id: route.id.clone(),
            spot_type: spot_type.to_string(),
            description: description.to_string(),
            rating,
            location,
            image_url: self.image_url.clone(),
        })
    }
}

impl ValidSpot {
    pub fn into_spot(
        self,
        id: impl Into<String>,
        author_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Spot {
        Spot {
            id: id.into(),
            route_id: self.route_id,
            spot_type: self.spot_type,
            description: self.description,
            rating: self.rating,
            location: self.location,
            author_id: author_id.into(),
            created_at,
            image_url: self.image_url,
        }
    }
}
