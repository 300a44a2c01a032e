//! Basic nearby search functionality
//!
//! This example demonstrates the fundamental search operations:
//! - Creating a searcher instance from a provider API key
//! - Category and free-text searches around a fixed origin
//! - Working with ranked results
//!
//! Run with a real key: `PLACES_API_KEY=... cargo run --example basic_search`

use vicinity::{
    Algorithm, Category, LocationIntent, NearbySearcher, ProviderConfig, QueryKind,
    RankedResult, SearchRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vicinity::init_logging(tracing::Level::INFO)?;

    let api_key = std::env::var("PLACES_API_KEY")?;
    let searcher = NearbySearcher::builder()
        .provider(ProviderConfig::new(api_key))
        .build()?;

    // An explicit coordinate origin needs no resolution round-trip.
    let origin = LocationIntent::FreeText("52.52,13.405".to_string());

    // Top cafes within 2 km, Bayesian-ranked.
    println!("Cafes near Berlin's center:");
    let request = SearchRequest::new(
        QueryKind::Category(Category::Cafe),
        origin.clone(),
        2_000.0,
        Algorithm::Bayesian,
    )?;
    print_ranked(&searcher.execute(&request).await?);

    // Free-text search over the same circle.
    println!("\nBest ramen within 3 km:");
    let request = SearchRequest::new(
        QueryKind::Text("ramen".to_string()),
        origin,
        3_000.0,
        Algorithm::Bayesian,
    )?;
    print_ranked(&searcher.execute(&request).await?);

    Ok(())
}

fn print_ranked(ranked: &RankedResult) {
    if ranked.is_empty() {
        println!("  (no results in this radius)");
        return;
    }
    for (i, scored) in ranked.iter().enumerate() {
        println!("  {}. {scored}", i + 1);
    }
}
