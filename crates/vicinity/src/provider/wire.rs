//! Serde types for the provider wire contract.

use serde::{Deserialize, Serialize};

use super::Suggestion;
use crate::{geo::Coordinate, search::Candidate};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for LatLng {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.lat,
            longitude: coordinate.lng,
        }
    }
}

impl From<LatLng> for Coordinate {
    fn from(lat_lng: LatLng) -> Self {
        Self {
            lat: lat_lng.latitude,
            lng: lat_lng.longitude,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchNearbyRequest {
    pub included_types: Vec<String>,
    pub max_result_count: u32,
    pub location_restriction: CircleRestriction,
}

#[derive(Debug, Serialize)]
pub(super) struct CircleRestriction {
    pub circle: Circle,
}

#[derive(Debug, Serialize)]
pub(super) struct Circle {
    pub center: LatLng,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchTextRequest {
    pub text_query: String,
    pub page_size: u32,
    pub location_restriction: RectangleRestriction,
}

#[derive(Debug, Serialize)]
pub(super) struct RectangleRestriction {
    pub rectangle: Rectangle,
}

#[derive(Debug, Serialize)]
pub(super) struct Rectangle {
    pub low: LatLng,
    pub high: LatLng,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

impl SearchResponse {
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.places
            .into_iter()
            .map(|place| Candidate {
                id: place.id,
                name: place
                    .display_name
                    .map(|text| text.text)
                    .unwrap_or_default(),
                rating: place.rating,
                user_rating_count: place.user_rating_count,
                address: place.formatted_address,
                location: place.location.map(Coordinate::from),
                distance_m: None,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Place {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(super) struct Geometry {
    pub location: GeocodeLatLng,
}

// The geocoding endpoint uses short field names, unlike the places API.
#[derive(Debug, Deserialize)]
pub(super) struct GeocodeLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct AutocompleteRequest {
    pub input: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<WireSuggestion>,
}

impl AutocompleteResponse {
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.suggestions
            .into_iter()
            .filter_map(|suggestion| suggestion.place_prediction)
            .map(|prediction| {
                let (primary, secondary) = prediction
                    .structured_format
                    .map_or((None, None), |format| {
                        (
                            format.main_text.map(|text| text.text),
                            format.secondary_text.map(|text| text.text),
                        )
                    });
                Suggestion {
                    place_id: prediction.place_id,
                    primary: primary.unwrap_or_default(),
                    secondary,
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireSuggestion {
    pub place_prediction: Option<PlacePrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlacePrediction {
    pub place_id: String,
    pub structured_format: Option<StructuredFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StructuredFormat {
    pub main_text: Option<LocalizedText>,
    pub secondary_text: Option<LocalizedText>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: String,
}
