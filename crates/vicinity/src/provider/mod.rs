//! Gateway to the external places provider.
//!
//! Four operations drive the search pipeline: nearby search by category,
//! free-text search, forward geocoding and autocomplete. The provider only
//! bounds results by the shapes it supports (circle or rectangle), so every
//! search result is re-validated against the true radius downstream.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    geo::{self, Coordinate, RectBounds},
    search::Candidate,
};

pub use error::ProviderError;
use error::Result;

mod wire;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ProviderError {
        #[error("provider API key is not configured; set one before searching")]
        MissingApiKey,
        #[error("provider error {status}: {message}")]
        Upstream { status: u16, message: String },
        #[error("no geocoding result for {query:?}; try a \"lat,lng\" pair instead")]
        GeocodeFailed { query: String },
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),
    }
    pub type Result<T> = std::result::Result<T, ProviderError>;
}

/// Hard provider-side cap on a circular search radius, in meters.
pub const MAX_RADIUS_M: f64 = 50_000.0;

/// Only the fields the pipeline consumes, to bound response payloads.
const FIELD_MASK: &str = "places.id,places.displayName,places.rating,\
places.userRatingCount,places.formattedAddress,places.location";

const MAX_RESULT_COUNT: u32 = 20;
const MAX_SUGGESTIONS: usize = 5;
const MIN_AUTOCOMPLETE_CHARS: usize = 2;

const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com";
const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";

/// Business category for nearby search, mapped to the provider's place
/// type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Restaurant,
    Cafe,
    Bar,
    Bakery,
    Supermarket,
    Pharmacy,
    Gym,
}

impl Category {
    /// The provider's `includedTypes` identifier for this category.
    #[must_use]
    pub fn provider_type(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::Bakery => "bakery",
            Self::Supermarket => "supermarket",
            Self::Pharmacy => "pharmacy",
            Self::Gym => "gym",
        }
    }
}

/// An autocomplete suggestion: a place id plus its primary and secondary
/// display text.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub place_id: String,
    pub primary: String,
    pub secondary: Option<String>,
}

/// Connection settings for the places provider.
///
/// The base URLs default to the real endpoints and exist as fields so tests
/// can point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub places_base_url: String,
    pub geocode_base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
        }
    }
}

/// HTTP client for the places provider.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl PlacesClient {
    /// Create a client. Fails with [`ProviderError::MissingApiKey`] before
    /// any network call if no credential is configured.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    /// Nearby search for businesses of one category within a circle of
    /// `radius_m` meters around `center`. The radius is capped at the
    /// provider limit of 50 km.
    #[instrument(level = "debug", skip(self))]
    pub async fn search_by_category(
        &self,
        category: Category,
        center: Coordinate,
        radius_m: f64,
    ) -> Result<Vec<Candidate>> {
        let url = format!("{}/v1/places:searchNearby", self.config.places_base_url);
        let body = wire::SearchNearbyRequest {
            included_types: vec![category.provider_type().to_string()],
            max_result_count: MAX_RESULT_COUNT,
            location_restriction: wire::CircleRestriction {
                circle: wire::Circle {
                    center: center.into(),
                    radius: radius_m.min(MAX_RADIUS_M),
                },
            },
        };

        let response = self
            .http
            .post(&url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let parsed: wire::SearchResponse = Self::decode(response).await?;
        let candidates = parsed.into_candidates();
        debug!(count = candidates.len(), "nearby search returned");
        Ok(candidates)
    }

    /// Free-text search within the requested circle. The provider only
    /// accepts rectangular bounds for text queries, so the circle is
    /// converted to its enclosing rectangle first.
    #[instrument(level = "debug", skip(self))]
    pub async fn search_by_text(
        &self,
        query: &str,
        center: Coordinate,
        radius_m: f64,
    ) -> Result<Vec<Candidate>> {
        let bounds = RectBounds::enclosing(center, radius_m.min(MAX_RADIUS_M));
        let url = format!("{}/v1/places:searchText", self.config.places_base_url);
        let body = wire::SearchTextRequest {
            text_query: query.to_string(),
            page_size: MAX_RESULT_COUNT,
            location_restriction: wire::RectangleRestriction {
                rectangle: wire::Rectangle {
                    low: wire::LatLng {
                        latitude: bounds.south,
                        longitude: bounds.west,
                    },
                    high: wire::LatLng {
                        latitude: bounds.north,
                        longitude: bounds.east,
                    },
                },
            },
        };

        let response = self
            .http
            .post(&url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let parsed: wire::SearchResponse = Self::decode(response).await?;
        let candidates = parsed.into_candidates();
        debug!(count = candidates.len(), "text search returned");
        Ok(candidates)
    }

    /// Resolve a free-text location to a coordinate.
    ///
    /// A literal `"lat,lng"` input is parsed directly, costing no API call.
    #[instrument(level = "debug", skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<Coordinate> {
        if let Some(coordinate) = geo::parse_lat_lng(query) {
            debug!(%coordinate, "geocode resolved via literal fast path");
            return Ok(coordinate);
        }

        let url = format!("{}/maps/api/geocode/json", self.config.geocode_base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("address", query), ("key", self.config.api_key.as_str())])
            .send()
            .await?;
        let parsed: wire::GeocodeResponse = Self::decode(response).await?;
        parsed
            .results
            .into_iter()
            .next()
            .map(|result| Coordinate {
                lat: result.geometry.location.lat,
                lng: result.geometry.location.lng,
            })
            .ok_or_else(|| ProviderError::GeocodeFailed {
                query: query.to_string(),
            })
    }

    /// Ranked completion suggestions for a partial query.
    ///
    /// Inputs shorter than two characters return no suggestions without a
    /// network call; the result is capped at five entries.
    #[instrument(level = "debug", skip(self))]
    pub async fn autocomplete(&self, input: &str) -> Result<Vec<Suggestion>> {
        if input.chars().count() < MIN_AUTOCOMPLETE_CHARS {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/places:autocomplete", self.config.places_base_url);
        let body = wire::AutocompleteRequest {
            input: input.to_string(),
        };
        let response = self
            .http
            .post(&url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: wire::AutocompleteResponse = Self::decode(response).await?;
        let mut suggestions = parsed.into_suggestions();
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }

    /// Decode a provider response, surfacing the provider's own error
    /// message on non-2xx statuses when the body carries one.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<wire::ErrorResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .map_or_else(|| "provider error".to_string(), |error| error.message);
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_rejected_before_any_network_call() {
        let err = PlacesClient::new(ProviderConfig::new("")).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));

        let err = PlacesClient::new(ProviderConfig::new("   ")).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));
    }

    #[test]
    fn category_maps_to_provider_types() {
        assert_eq!(Category::Restaurant.provider_type(), "restaurant");
        assert_eq!(Category::Supermarket.provider_type(), "supermarket");
    }

    #[tokio::test]
    async fn geocode_literal_pair_skips_the_network() {
        // Port 9 is the discard port; any actual request would fail loudly.
        let mut config = ProviderConfig::new("test-key");
        config.geocode_base_url = "http://127.0.0.1:9".to_string();
        let client = PlacesClient::new(config).expect("client");

        let coordinate = client
            .geocode("40.7128,-74.0060")
            .await
            .expect("fast path should not touch the network");
        assert!((coordinate.lat - 40.7128).abs() < 1e-9);
        assert!((coordinate.lng + 74.0060).abs() < 1e-9);
    }

    #[tokio::test]
    async fn autocomplete_short_input_returns_empty_without_request() {
        let mut config = ProviderConfig::new("test-key");
        config.places_base_url = "http://127.0.0.1:9".to_string();
        let client = PlacesClient::new(config).expect("client");

        let suggestions = client.autocomplete("b").await.expect("no request issued");
        assert!(suggestions.is_empty());
    }
}
