//! One request/response cycle over an already-resolved origin.
//!
//! The orchestration is deliberately linear: fetch candidates by query
//! kind, re-check the true radius, score with the requested algorithm,
//! truncate. Any failure before the provider call succeeds short-circuits
//! the whole pipeline; an empty candidate list is a valid result and flows
//! through unchanged.

use tracing::{debug, info, instrument};

use super::{
    Candidate, ScoredCandidate,
    filter::filter_by_radius,
    rank::{Algorithm, score_candidates},
};
use crate::{
    config::SearchConfig,
    error::{Result, VicinityError},
    provider::{Category, MAX_RADIUS_M, PlacesClient},
    resolve::{LocationIntent, ResolvedOrigin},
};

/// What to search for: a closed business category or free text.
#[derive(Debug, Clone)]
pub enum QueryKind {
    Category(Category),
    Text(String),
}

/// One complete search request. Produces exactly one ranked list or one
/// terminal error.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: QueryKind,
    pub origin: LocationIntent,
    pub radius_m: f64,
    pub algorithm: Algorithm,
}

impl SearchRequest {
    /// Build a request, validating that the radius is positive and at most
    /// the 50 km provider cap.
    pub fn new(
        query: QueryKind,
        origin: LocationIntent,
        radius_m: f64,
        algorithm: Algorithm,
    ) -> Result<Self> {
        if !radius_m.is_finite() || radius_m <= 0.0 || radius_m > MAX_RADIUS_M {
            return Err(VicinityError::ConfigError(format!(
                "search radius must be within (0, {MAX_RADIUS_M}] meters, got {radius_m}"
            )));
        }
        Ok(Self {
            query,
            origin,
            radius_m,
            algorithm,
        })
    }
}

/// The final ranked list, at most the configured top-N entries.
pub type RankedResult = Vec<ScoredCandidate>;

/// Run the fetch-filter-score-truncate pipeline for one request against an
/// already-resolved origin.
#[instrument(
    level = "debug",
    skip_all,
    fields(radius_m = request.radius_m, algorithm = ?request.algorithm)
)]
pub async fn search_inner(
    gateway: &PlacesClient,
    origin: ResolvedOrigin,
    request: &SearchRequest,
    config: &SearchConfig,
) -> Result<RankedResult> {
    let center = origin.coordinate;
    let candidates: Vec<Candidate> = match &request.query {
        QueryKind::Category(category) => {
            gateway
                .search_by_category(*category, center, request.radius_m)
                .await?
        }
        QueryKind::Text(text) => {
            gateway
                .search_by_text(text, center, request.radius_m)
                .await?
        }
    };

    if candidates.is_empty() {
        // A valid empty result, distinct from failure.
        info!("provider returned no candidates");
        return Ok(Vec::new());
    }
    debug!(count = candidates.len(), "candidates fetched");

    let within = filter_by_radius(candidates, center, request.radius_m);
    let mut ranked = score_candidates(within, request.algorithm, &config.ranking);
    ranked.truncate(config.top_n);
    Ok(ranked)
}
