//! Vicinity - Nearby Business Search and Ranking Library
//!
//! Vicinity finds businesses around a location through an external places
//! provider and ranks them with a statistically-motivated score, so callers
//! get the best few results instead of a raw popularity- or proximity-sorted
//! list. The search origin can come from device positioning (with a
//! consent-gated IP fallback), a free-text location query, or an explicit
//! coordinate.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vicinity::{
//!     Algorithm, Category, LocationIntent, NearbySearcher, ProviderConfig, QueryKind,
//!     SearchRequest,
//! };
//!
//! # async fn run() -> Result<(), vicinity::error::VicinityError> {
//! let searcher = NearbySearcher::builder()
//!     .provider(ProviderConfig::new(std::env::var("PLACES_API_KEY").unwrap_or_default()))
//!     .build()?;
//!
//! // Top three cafes within 2 km of Berlin's center, Bayesian-ranked.
//! let request = SearchRequest::new(
//!     QueryKind::Category(Category::Cafe),
//!     LocationIntent::FreeText("52.52,13.405".to_string()),
//!     2_000.0,
//!     Algorithm::Bayesian,
//! )?;
//!
//! for scored in searcher.execute(&request).await? {
//!     println!("{scored}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Ranking
//!
//! Two interchangeable algorithms order the results:
//!
//! - **Bayesian average**: each rating is blended with a review-count
//!   weighted prior mean, so a place with two glowing reviews regresses
//!   toward the pack instead of outranking hundreds of consistent ratings.
//! - **Popularity bonus**: `rating * (1 + log10(reviews + 1) * 0.3)`,
//!   deliberately favoring review volume.
//!
//! # Capabilities
//!
//! Device positioning, IP lookup and the consent store/prompt are injected
//! traits, not built-ins: hosts wire up their platform's stack, tests use
//! in-memory fakes, and everything degrades cleanly through the fallback
//! chain when a capability is absent.

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
mod geo;
mod provider;
mod resolve;
mod search;
mod suggest;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use self::core::{NearbySearcher, NearbySearcherBuilder};
pub use geo::{Coordinate, EARTH_RADIUS_M, RectBounds, haversine_m, parse_lat_lng};
pub use provider::{
    Category, MAX_RADIUS_M, PlacesClient, ProviderConfig, ProviderError, Suggestion,
};
pub use resolve::{
    ConsentPrompt, ConsentStore, DevicePositioning, GeoResolver, IpLocation, IpLookup,
    LocationIntent, OriginSource, ResolveError, ResolvedOrigin, stubs,
};
pub use search::{
    Algorithm, Candidate, QueryKind, RankedResult, RankingParams, ScoredCandidate,
    SearchRequest, filter_by_radius, score_candidates,
};
pub use suggest::Suggester;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Vicinity library.
///
/// This sets up structured logging with configurable levels and filtering.
/// Call this once at the start of your application to enable detailed
/// logging output from Vicinity operations.
///
/// # Arguments
///
/// * `level` - The minimum log level to display
///
/// # Examples
///
/// ```rust
/// use vicinity::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), vicinity::error::VicinityError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::VicinityError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
