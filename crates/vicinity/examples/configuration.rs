//! Search configuration and customization
//!
//! This example demonstrates how to customize ranking behavior using
//! different configurations, and how the two scoring algorithms order the
//! same candidate set differently.
//!
//! Run with a real key: `PLACES_API_KEY=... cargo run --example configuration`

use vicinity::{
    Algorithm, Category, LocationIntent, NearbySearcher, ProviderConfig, QueryKind,
    SearchConfig, SearchConfigBuilder, SearchRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vicinity::init_logging(tracing::Level::WARN)?;

    let api_key = std::env::var("PLACES_API_KEY")?;
    let origin = LocationIntent::FreeText("48.8566,2.3522".to_string());

    println!("Comparing configurations for restaurants near Paris:\n");

    // Default configuration: top 3, confidence 20, one-review floor.
    let default_searcher = searcher(&api_key, SearchConfig::default())?;
    run(&default_searcher, origin.clone(), Algorithm::Bayesian, "Default (Bayesian)").await?;

    // Preset that ignores places with fewer than five reviews and leans
    // harder on the prior.
    let strict = SearchConfigBuilder::well_reviewed().top_n(5).build();
    let strict_searcher = searcher(&api_key, strict)?;
    run(&strict_searcher, origin.clone(), Algorithm::Bayesian, "Well-reviewed preset").await?;

    // Custom tuning: a softer prior pull and a wider result list.
    let custom = SearchConfigBuilder::new()
        .top_n(5)
        .confidence(10.0)?
        .default_prior(3.5)?
        .build();
    let custom_searcher = searcher(&api_key, custom)?;
    run(&custom_searcher, origin.clone(), Algorithm::Bayesian, "Custom (confidence 10)").await?;

    // Same request, popularity scoring: review volume now earns a bonus.
    run(&default_searcher, origin, Algorithm::Popularity, "Default (popularity)").await?;

    Ok(())
}

fn searcher(api_key: &str, config: SearchConfig) -> vicinity::error::Result<NearbySearcher> {
    NearbySearcher::builder()
        .provider(ProviderConfig::new(api_key))
        .search_config(config)
        .build()
}

async fn run(
    searcher: &NearbySearcher,
    origin: LocationIntent,
    algorithm: Algorithm,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = SearchRequest::new(
        QueryKind::Category(Category::Restaurant),
        origin,
        1_500.0,
        algorithm,
    )?;
    let ranked = searcher.execute(&request).await?;

    println!("{label}: {} result(s)", ranked.len());
    for scored in &ranked {
        println!("  {scored}");
    }
    println!();
    Ok(())
}
