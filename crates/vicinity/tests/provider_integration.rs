//! Wire-contract and end-to-end pipeline tests against a mocked provider.
//!
//! These cover what the unit tests cannot: the exact headers and body
//! shapes sent upstream, error-message surfacing from non-2xx responses,
//! and a full resolve-fetch-filter-score-truncate run through
//! [`NearbySearcher`].

use httpmock::prelude::*;
use serde_json::json;

use vicinity::{
    Algorithm, Category, LocationIntent, NearbySearcher, PlacesClient, ProviderConfig,
    ProviderError, QueryKind, SearchRequest,
};

const FIELD_MASK: &str = "places.id,places.displayName,places.rating,\
places.userRatingCount,places.formattedAddress,places.location";

const CENTER_LAT: f64 = 40.7128;
const CENTER_LNG: f64 = -74.0060;

fn mocked_config(server: &MockServer) -> ProviderConfig {
    let mut config = ProviderConfig::new("test-key");
    config.places_base_url = server.base_url();
    config.geocode_base_url = server.base_url();
    config
}

fn mocked_client(server: &MockServer) -> PlacesClient {
    PlacesClient::new(mocked_config(server)).expect("client with key")
}

fn place(id: &str, name: &str, rating: f64, reviews: u32, lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "id": id,
        "displayName": {"text": name},
        "rating": rating,
        "userRatingCount": reviews,
        "formattedAddress": "1 Test St",
        "location": {"latitude": lat, "longitude": lng}
    })
}

#[tokio::test]
async fn nearby_search_sends_credentials_field_mask_and_capped_radius() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/places:searchNearby")
                .header("X-Goog-Api-Key", "test-key")
                .header("X-Goog-FieldMask", FIELD_MASK)
                .json_body_partial(
                    r#"{
                        "includedTypes": ["cafe"],
                        "locationRestriction": {"circle": {"radius": 50000.0}}
                    }"#,
                );
            then.status(200).json_body(json!({"places": []}));
        })
        .await;

    let client = mocked_client(&server);
    let center = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid center");
    // 80 km exceeds the provider limit and must be capped, not rejected.
    let candidates = client
        .search_by_category(Category::Cafe, center, 80_000.0)
        .await
        .expect("mocked search");

    mock.assert_async().await;
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn text_search_sends_rectangle_bounds() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/places:searchText")
                .header("X-Goog-FieldMask", FIELD_MASK)
                .json_body_partial(r#"{"textQuery": "best coffee", "pageSize": 20}"#)
                .body_contains("rectangle");
            then.status(200).json_body(json!({
                "places": [place("p1", "Roast House", 4.4, 88, CENTER_LAT, CENTER_LNG)]
            }));
        })
        .await;

    let client = mocked_client(&server);
    let center = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid center");
    let candidates = client
        .search_by_text("best coffee", center, 2_000.0)
        .await
        .expect("mocked search");

    mock.assert_async().await;
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name, "Roast House");
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchNearby");
            then.status(403)
                .json_body(json!({"error": {"message": "API key not valid", "code": 403}}));
        })
        .await;

    let client = mocked_client(&server);
    let center = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid center");
    let err = client
        .search_by_category(Category::Bar, center, 1_000.0)
        .await
        .unwrap_err();

    match err {
        ProviderError::Upstream { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected an upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_a_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchNearby");
            then.status(500).body("upstream exploded");
        })
        .await;

    let client = mocked_client(&server);
    let center = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid center");
    let err = client
        .search_by_category(Category::Gym, center, 1_000.0)
        .await
        .unwrap_err();

    match err {
        ProviderError::Upstream { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "provider error");
        }
        other => panic!("expected an upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn geocode_maps_the_first_result() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/maps/api/geocode/json")
                .query_param("address", "Berlin")
                .query_param("key", "test-key");
            then.status(200).json_body(json!({
                "results": [
                    {"geometry": {"location": {"lat": 52.52, "lng": 13.405}}},
                    {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
                ]
            }));
        })
        .await;

    let client = mocked_client(&server);
    let coordinate = client.geocode("Berlin").await.expect("mocked geocode");

    mock.assert_async().await;
    assert!((coordinate.lat - 52.52).abs() < 1e-9);
    assert!((coordinate.lng - 13.405).abs() < 1e-9);
}

#[tokio::test]
async fn geocode_zero_results_is_a_geocode_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/maps/api/geocode/json");
            then.status(200).json_body(json!({"results": []}));
        })
        .await;

    let client = mocked_client(&server);
    let err = client.geocode("nowhere at all").await.unwrap_err();
    assert!(matches!(err, ProviderError::GeocodeFailed { query } if query == "nowhere at all"));
}

#[tokio::test]
async fn geocode_literal_pair_never_reaches_the_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/maps/api/geocode/json");
            then.status(200).json_body(json!({"results": []}));
        })
        .await;

    let client = mocked_client(&server);
    let coordinate = client.geocode("51.5074, -0.1278").await.expect("fast path");
    assert!((coordinate.lat - 51.5074).abs() < 1e-9);
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn autocomplete_caps_suggestions_at_five() {
    let server = MockServer::start_async().await;
    let suggestions: Vec<_> = (1..=7)
        .map(|n| {
            json!({
                "placePrediction": {
                    "placeId": format!("p{n}"),
                    "structuredFormat": {
                        "mainText": {"text": format!("Place {n}")},
                        "secondaryText": {"text": "Somewhere"}
                    }
                }
            })
        })
        .collect();
    server
        .mock_async(move |when, then| {
            when.method(POST)
                .path("/v1/places:autocomplete")
                .json_body_partial(r#"{"input": "cof"}"#);
            then.status(200).json_body(json!({"suggestions": suggestions}));
        })
        .await;

    let client = mocked_client(&server);
    let suggestions = client.autocomplete("cof").await.expect("mocked autocomplete");

    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0].place_id, "p1");
    assert_eq!(suggestions[4].primary, "Place 5");
}

#[tokio::test]
async fn pipeline_filters_scores_and_truncates() {
    let server = MockServer::start_async().await;
    // Two candidates inside the 1 km radius, one roughly 5.5 km north.
    // Under the Bayesian score the in-radius prior is 910/202, which puts
    // the 5.0-rated newcomer just above the 4.5-rated veteran.
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchNearby");
            then.status(200).json_body(json!({
                "places": [
                    place("steady", "Steady Cafe", 4.5, 200, CENTER_LAT + 0.005, CENTER_LNG),
                    place("far", "Far Cafe", 4.9, 500, CENTER_LAT + 0.05, CENTER_LNG),
                    place("fresh", "Fresh Cafe", 5.0, 2, CENTER_LAT, CENTER_LNG + 0.005),
                ]
            }));
        })
        .await;

    let searcher = NearbySearcher::builder()
        .provider(mocked_config(&server))
        .build()
        .expect("searcher");
    let origin = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid origin");
    let request = SearchRequest::new(
        QueryKind::Category(Category::Cafe),
        LocationIntent::Explicit(origin),
        1_000.0,
        Algorithm::Bayesian,
    )
    .expect("valid request");

    let ranked = searcher.execute(&request).await.expect("mocked pipeline");

    let ids: Vec<&str> = ranked.iter().map(|s| s.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["fresh", "steady"]);
    for scored in &ranked {
        assert!(scored.candidate.distance_m.expect("distance attached") <= 1_000.0);
        assert!(scored.score > 4.0);
    }
}

#[tokio::test]
async fn pipeline_truncates_to_configured_top_n() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchNearby");
            then.status(200).json_body(json!({
                "places": [
                    place("a", "A", 4.1, 40, CENTER_LAT, CENTER_LNG),
                    place("b", "B", 4.2, 40, CENTER_LAT, CENTER_LNG),
                    place("c", "C", 4.3, 40, CENTER_LAT, CENTER_LNG),
                    place("d", "D", 4.4, 40, CENTER_LAT, CENTER_LNG),
                ]
            }));
        })
        .await;

    let config = vicinity::SearchConfig::builder().top_n(2).build();
    let searcher = NearbySearcher::builder()
        .provider(mocked_config(&server))
        .search_config(config)
        .build()
        .expect("searcher");
    let origin = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid origin");
    let request = SearchRequest::new(
        QueryKind::Category(Category::Restaurant),
        LocationIntent::Explicit(origin),
        1_000.0,
        Algorithm::Popularity,
    )
    .expect("valid request");

    let ranked = searcher.execute(&request).await.expect("mocked pipeline");
    assert_eq!(ranked.len(), 2);
    // Equal review counts, so the higher rating wins under popularity too.
    assert_eq!(ranked[0].candidate.id, "d");
    assert_eq!(ranked[1].candidate.id, "c");
}

#[tokio::test]
async fn pipeline_treats_an_empty_response_as_a_valid_empty_result() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchText");
            then.status(200).json_body(json!({}));
        })
        .await;

    let searcher = NearbySearcher::builder()
        .provider(mocked_config(&server))
        .build()
        .expect("searcher");
    let origin = vicinity::Coordinate::new(CENTER_LAT, CENTER_LNG).expect("valid origin");
    let request = SearchRequest::new(
        QueryKind::Text("unicorn petting zoo".to_string()),
        LocationIntent::Explicit(origin),
        5_000.0,
        Algorithm::Bayesian,
    )
    .expect("valid request");

    let ranked = searcher.execute(&request).await.expect("empty is not an error");
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn free_text_origin_resolves_through_the_geocode_endpoint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/maps/api/geocode/json")
                .query_param("address", "Oslo");
            then.status(200).json_body(json!({
                "results": [{"geometry": {"location": {"lat": 59.9139, "lng": 10.7522}}}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchNearby");
            then.status(200).json_body(json!({
                "places": [place("oslo1", "Fjord Coffee", 4.7, 120, 59.9140, 10.7520)]
            }));
        })
        .await;

    let searcher = NearbySearcher::builder()
        .provider(mocked_config(&server))
        .build()
        .expect("searcher");
    let request = SearchRequest::new(
        QueryKind::Category(Category::Cafe),
        LocationIntent::FreeText("Oslo".to_string()),
        2_000.0,
        Algorithm::Bayesian,
    )
    .expect("valid request");

    let ranked = searcher.execute(&request).await.expect("mocked pipeline");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].candidate.id, "oslo1");
}
