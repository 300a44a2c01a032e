//! Search configuration and its builder.

use std::time::Duration;

use crate::{error::VicinityError, search::RankingParams};

/// Everything tunable about a search, outside of the request itself.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of ranked results to return.
    pub top_n: usize,
    /// Scoring parameters shared by both algorithms.
    pub ranking: RankingParams,
    /// How long device positioning may take before it counts as failed.
    pub device_timeout: Duration,
    /// Input quiescence required before an autocomplete request is issued.
    pub autocomplete_debounce: Duration,
    /// Inputs shorter than this produce no autocomplete request.
    pub autocomplete_min_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            ranking: RankingParams::default(),
            device_timeout: Duration::from_secs(5),
            autocomplete_debounce: Duration::from_millis(300),
            autocomplete_min_chars: 2,
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for creating search configurations with ergonomic defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset that only trusts well-reviewed places: a higher confidence
    /// threshold and a five-review floor.
    pub fn well_reviewed() -> Self {
        let mut builder = Self::new();
        builder.config.ranking.confidence = 50.0;
        builder.config.ranking.min_review_count = 5;
        builder
    }

    /// Set the maximum number of ranked results to return.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n.max(1);
        self
    }

    /// Set the minimum review count a candidate needs to be scored.
    pub fn min_reviews(mut self, count: u32) -> Self {
        self.config.ranking.min_review_count = count;
        self
    }

    /// Set the Bayesian confidence threshold: the review count at which
    /// prior and observed rating weigh equally. Must be positive.
    pub fn confidence(mut self, confidence: f64) -> Result<Self, VicinityError> {
        if !confidence.is_finite() || confidence <= 0.0 {
            return Err(VicinityError::ConfigError(format!(
                "confidence threshold must be positive, got {confidence}"
            )));
        }
        self.config.ranking.confidence = confidence;
        Ok(self)
    }

    /// Set the fallback prior mean, used when the candidate set carries no
    /// review weight. Must lie within the rating scale [0, 5].
    pub fn default_prior(mut self, prior: f64) -> Result<Self, VicinityError> {
        if !(0.0..=5.0).contains(&prior) {
            return Err(VicinityError::ConfigError(format!(
                "default prior must be within [0, 5], got {prior}"
            )));
        }
        self.config.ranking.default_prior = prior;
        Ok(self)
    }

    /// Set the popularity bonus weight.
    pub fn popularity_weight(mut self, weight: f64) -> Self {
        self.config.ranking.popularity_weight = weight;
        self
    }

    /// Set the device positioning timeout.
    pub fn device_timeout(mut self, timeout: Duration) -> Self {
        self.config.device_timeout = timeout;
        self
    }

    /// Set the autocomplete debounce interval.
    pub fn autocomplete_debounce(mut self, debounce: Duration) -> Self {
        self.config.autocomplete_debounce = debounce;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> SearchConfig {
        self.config
    }
}
