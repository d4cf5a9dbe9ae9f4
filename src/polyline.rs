//! Encoded polyline codec for route geometries.
//!
//! Implements Google's encoded polyline algorithm at 1e-5 precision.
//! Directions providers hand back geometry in this form; routes are stored
//! and filtered as decoded [`GeoPoint`] sequences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Coordinates are scaled by this factor before encoding.
const PRECISION: f64 = 1e5;

/// ASCII offset applied to every 5-bit chunk.
const CHAR_OFFSET: u8 = 63;

/// Set on every chunk except the last of a value.
const CONTINUATION_BIT: i64 = 0x20;

const CHUNK_MASK: i64 = 0x1f;

/// Largest shift a single value may reach (7 chunks, 35 bits).
const MAX_SHIFT: u32 = 30;

/// Reasons an encoded polyline fails to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    /// A character outside the encoding alphabet (`?` through `~`).
    InvalidByte { index: usize, byte: u8 },
    /// Input ended while a value still had its continuation bit set.
    Truncated { index: usize },
    /// A latitude value with no longitude following it.
    MissingLongitude { index: usize },
    /// A value ran longer than any valid coordinate delta.
    Overflow { index: usize },
}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolylineError::InvalidByte { index, byte } => {
                write!(f, "malformed polyline: invalid byte 0x{:02x} at {}", byte, index)
            }
            PolylineError::Truncated { index } => {
                write!(f, "malformed polyline: truncated value at {}", index)
            }
            PolylineError::MissingLongitude { index } => {
                write!(f, "malformed polyline: latitude without longitude at {}", index)
            }
            PolylineError::Overflow { index } => {
                write!(f, "malformed polyline: value too long at {}", index)
            }
        }
    }
}

impl std::error::Error for PolylineError {}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Encoding to/from the compact polyline format happens at the provider
/// boundary; everything else works on points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        decode(encoded).map(Self::new)
    }

    /// Encodes the points back into the compact string form.
    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromStr for Polyline {
    type Err = PolylineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Decodes an encoded polyline into its points.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += read_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::MissingLongitude { index });
        }
        lng += read_value(bytes, &mut index)?;

        points.push(GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

/// Encodes points as a polyline string, rounding to 1e-5 degrees.
///
/// Latitudes are clamped to ±90 and longitudes to ±180; NaN encodes as 0.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = scale(point.latitude, 90.0);
        let lng = scale(point.longitude, 180.0);
        write_value(lat - prev_lat, &mut out);
        write_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn scale(coordinate: f64, bound: f64) -> i64 {
    // `as` maps NaN to 0
    (coordinate.clamp(-bound, bound) * PRECISION).round() as i64
}

fn read_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated { index: start });
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidByte { index: *index, byte });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { index: start });
        }
        *index += 1;

        let chunk = i64::from(byte - CHAR_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    // zig-zag
    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

fn write_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };

    while v >= CONTINUATION_BIT {
        out.push(char::from(((CONTINUATION_BIT | (v & CHUNK_MASK)) as u8) + CHAR_OFFSET));
        v >>= 5;
    }
    out.push(char::from((v as u8) + CHAR_OFFSET));
}
