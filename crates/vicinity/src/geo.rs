//! Geographic primitives: coordinates, great-circle distance and the
//! circle-to-bounds conversion.
//!
//! The places provider only accepts a circle for nearby search and a
//! rectangle for text search, so a requested radius has to be expressed both
//! ways. The enclosing rectangle produced here always covers the full
//! circle, which is why results are re-checked against the true radius
//! before ranking.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::VicinityError;

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, validating that latitude is within [-90, 90]
    /// and longitude within [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self, VicinityError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(VicinityError::ConfigError(format!(
                "latitude must be within [-90, 90], got {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(VicinityError::ConfigError(format!(
                "longitude must be within [-180, 180], got {lng}"
            )));
        }
        Ok(Self { lat, lng })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Great-circle distance between two coordinates in meters, computed with
/// the haversine formula.
#[must_use]
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// A latitude/longitude aligned rectangle, edges in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl RectBounds {
    /// Smallest axis-aligned rectangle that encloses the circle of
    /// `radius_m` around `center`, using an equirectangular approximation.
    ///
    /// The longitude span widens with latitude (one degree of longitude
    /// shrinks towards the poles), so the rectangle is a superset of the
    /// circle everywhere, never an exact fit.
    #[must_use]
    pub fn enclosing(center: Coordinate, radius_m: f64) -> Self {
        let lat_span = (radius_m / EARTH_RADIUS_M).to_degrees();
        // cos(lat) degenerates at the poles; clamp so the span stays finite.
        let cos_lat = center.lat.to_radians().cos().max(0.01);
        let lng_span = (radius_m / (EARTH_RADIUS_M * cos_lat)).to_degrees();

        Self {
            north: (center.lat + lat_span).min(90.0),
            south: (center.lat - lat_span).max(-90.0),
            east: (center.lng + lng_span).min(180.0),
            west: (center.lng - lng_span).max(-180.0),
        }
    }

    /// Whether the coordinate lies within the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.south..=self.north).contains(&coordinate.lat)
            && (self.west..=self.east).contains(&coordinate.lng)
    }
}

static LAT_LNG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$")
        .expect("hard-coded lat,lng pattern")
});

/// Parse a literal `"lat,lng"` pair such as `"40.7128,-74.0060"`.
///
/// This is the zero-cost fast path for geocoding: a string that already is
/// a coordinate never reaches the network. Returns `None` for anything that
/// is not a valid in-range pair.
#[must_use]
pub fn parse_lat_lng(text: &str) -> Option<Coordinate> {
    let caps = LAT_LNG_RE.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lng: f64 = caps[2].parse().ok()?;
    Coordinate::new(lat, lng).ok()
}
