//! Location resolution and capability injection
//!
//! This example demonstrates how a search origin is resolved:
//! - Explicit coordinates and free-text locations
//! - The device-to-IP fallback chain with its consent gate
//! - Wiring host capabilities into the builder
//!
//! The injected capabilities here are toy implementations; a real host
//! would bridge its platform positioning stack and a geolocation service.
//!
//! Run with a real key: `PLACES_API_KEY=... cargo run --example location_resolution`

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use vicinity::{
    Algorithm, Category, ConsentPrompt, Coordinate, DevicePositioning, IpLocation, IpLookup,
    LocationIntent, NearbySearcher, ProviderConfig, QueryKind, SearchRequest, stubs,
};

/// Pretends the device GPS is broken, which exercises the IP fallback.
struct BrokenGps;

#[async_trait]
impl DevicePositioning for BrokenGps {
    async fn current_position(
        &self,
        _timeout: Duration,
        _high_accuracy: bool,
    ) -> anyhow::Result<Coordinate> {
        anyhow::bail!("no positioning hardware on this host")
    }
}

/// Answers every IP lookup with a fixed city-level coordinate.
struct FixedIp;

#[async_trait]
impl IpLocation for FixedIp {
    async fn lookup(&self) -> anyhow::Result<IpLookup> {
        Ok(IpLookup {
            coordinate: Coordinate::new(51.5074, -0.1278)?,
            city: Some("London".to_string()),
        })
    }
}

/// Prints the consent question and grants it, as a GUI prompt would.
struct AlwaysYesPrompt;

#[async_trait]
impl ConsentPrompt for AlwaysYesPrompt {
    async fn request(&self) -> bool {
        println!("  [prompt] Share your IP with a location service? -> yes");
        true
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vicinity::init_logging(tracing::Level::INFO)?;

    let api_key = std::env::var("PLACES_API_KEY")?;
    let searcher = NearbySearcher::builder()
        .provider(ProviderConfig::new(api_key))
        .device_positioning(Arc::new(BrokenGps))
        .ip_location(Arc::new(FixedIp))
        .consent(Arc::new(stubs::MemoryConsent::default()), Arc::new(AlwaysYesPrompt))
        .build()?;

    // Device positioning fails, the prompt grants consent once, and the IP
    // fallback supplies an approximate origin.
    println!("Resolving through the device fallback chain:");
    let request = SearchRequest::new(
        QueryKind::Category(Category::Pharmacy),
        LocationIntent::CurrentDevice,
        2_000.0,
        Algorithm::Bayesian,
    )?;
    for scored in searcher.execute(&request).await? {
        println!("  {scored}");
    }

    // Consent is persisted, so a second device search skips the prompt.
    println!("\nSecond device search (no prompt this time):");
    for scored in searcher.execute(&request).await? {
        println!("  {scored}");
    }

    // Free-text origins bypass the chain entirely.
    println!("\nFree-text origin:");
    let request = SearchRequest::new(
        QueryKind::Text("flat white".to_string()),
        LocationIntent::FreeText("Shoreditch, London".to_string()),
        1_000.0,
        Algorithm::Popularity,
    )?;
    for scored in searcher.execute(&request).await? {
        println!("  {scored}");
    }

    Ok(())
}
