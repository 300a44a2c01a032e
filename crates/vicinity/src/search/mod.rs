//! The search pipeline: radius filtering, scoring and orchestration.
//!
//! Candidates flow strictly downstream — provider results are re-checked
//! against the true circular radius, scored by the requested algorithm, and
//! truncated to a small top-N. Each search owns its candidate set end to
//! end; nothing here is shared across requests.

use std::fmt;

mod filter;
mod orchestration;
mod rank;

pub use filter::filter_by_radius;
pub use orchestration::{QueryKind, RankedResult, SearchRequest, search_inner};
pub use rank::{Algorithm, RankingParams, score_candidates};

use crate::geo::Coordinate;

/// A business returned by the places provider. Created per search, never
/// persisted here.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Star rating within [0, 5], absent when the place has no reviews.
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    pub address: Option<String>,
    pub location: Option<Coordinate>,
    /// Great-circle distance from the search origin, attached by the
    /// radius filter.
    pub distance_m: Option<f64>,
}

/// A candidate with its final score. Immutable once produced; both scoring
/// algorithms write the same field, so consumers stay algorithm-agnostic.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

impl ScoredCandidate {
    /// Distance from the search origin in kilometers, rounded to one
    /// decimal place, when known.
    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        self.candidate.distance_m.map(|m| (m / 100.0).round() / 10.0)
    }
}

impl fmt::Display for ScoredCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.candidate.name)?;
        if let Some(rating) = self.candidate.rating {
            write!(
                f,
                " ({:.1} stars, {} reviews)",
                rating,
                self.candidate.user_rating_count.unwrap_or(0)
            )?;
        }
        if let Some(km) = self.distance_km() {
            write!(f, " {km:.1} km away")?;
        }
        write!(f, " - score {:.3}", self.score)
    }
}

#[cfg(test)]
pub(crate) fn test_candidate(id: &str, rating: Option<f64>, reviews: Option<u32>) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("candidate {id}"),
        rating,
        user_rating_count: reviews,
        address: None,
        location: None,
        distance_m: None,
    }
}
