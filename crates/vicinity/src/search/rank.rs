//! Scoring and ordering of filtered candidates.
//!
//! Two interchangeable algorithms produce the final order. The Bayesian
//! average regresses low-review candidates toward the dataset mean so a
//! single five-star review cannot beat hundreds of consistent ratings; the
//! popularity bonus deliberately rewards review volume instead. Both write
//! the same score field.

use tracing::debug;

use super::{Candidate, ScoredCandidate};

/// Which scoring formula orders the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Bayesian average: blend each rating with a prior mean, weighted by
    /// review count against a confidence threshold.
    Bayesian,
    /// Popularity bonus: `rating * (1 + log10(reviews + 1) * weight)`.
    Popularity,
}

/// Tunable scoring parameters. Injected rather than hardcoded so tests can
/// run with alternate thresholds.
#[derive(Debug, Clone)]
pub struct RankingParams {
    /// Candidates with fewer reviews than this are dropped before scoring.
    pub min_review_count: u32,
    /// Review count at which the prior and the observed rating carry equal
    /// weight in the Bayesian average.
    pub confidence: f64,
    /// Prior mean used when the candidate set carries no review weight at
    /// all.
    pub default_prior: f64,
    /// Multiplier applied to the log-scaled review bonus.
    pub popularity_weight: f64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            min_review_count: 1,
            confidence: 20.0,
            default_prior: 3.7,
            popularity_weight: 0.3,
        }
    }
}

/// Score the candidates with the selected algorithm and return them sorted
/// strictly descending, ties keeping input order.
///
/// Candidates without a positive rating or with too few reviews are dropped
/// first; an empty result is a valid outcome, not an error.
#[must_use]
pub fn score_candidates(
    candidates: Vec<Candidate>,
    algorithm: Algorithm,
    params: &RankingParams,
) -> Vec<ScoredCandidate> {
    let rated: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| {
            candidate.rating.is_some_and(|rating| rating > 0.0)
                && candidate.user_rating_count.unwrap_or(0) >= params.min_review_count
        })
        .collect();

    if rated.is_empty() {
        debug!("no rateable candidates survived the pre-filter");
        return Vec::new();
    }

    let mut scored: Vec<ScoredCandidate> = match algorithm {
        Algorithm::Bayesian => {
            let prior = prior_mean(&rated, params.default_prior);
            debug!(prior, count = rated.len(), "scoring with Bayesian average");
            rated
                .into_iter()
                .map(|candidate| {
                    let rating = candidate.rating.unwrap_or(0.0);
                    let reviews = f64::from(candidate.user_rating_count.unwrap_or(0));
                    let score = (params.confidence * prior + rating * reviews)
                        / (params.confidence + reviews);
                    ScoredCandidate { candidate, score }
                })
                .collect()
        }
        Algorithm::Popularity => {
            debug!(count = rated.len(), "scoring with popularity bonus");
            rated
                .into_iter()
                .map(|candidate| {
                    let rating = candidate.rating.unwrap_or(0.0);
                    let reviews = f64::from(candidate.user_rating_count.unwrap_or(0));
                    let bonus = (reviews + 1.0).log10();
                    let score = rating * (1.0 + bonus * params.popularity_weight);
                    ScoredCandidate { candidate, score }
                })
                .collect()
        }
    };

    // Stable sort: equal scores keep their provider order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

/// Review-count-weighted mean rating of the candidates being scored.
///
/// The prior is derived from the same set it regresses, so it shifts per
/// search; absolute scores are only comparable within a single result list,
/// never across searches.
fn prior_mean(candidates: &[Candidate], default_prior: f64) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for candidate in candidates {
        let weight = f64::from(candidate.user_rating_count.unwrap_or(0).max(1));
        weighted_sum += candidate.rating.unwrap_or(0.0) * weight;
        total_weight += weight;
    }
    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        default_prior
    }
}
