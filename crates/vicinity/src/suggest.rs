//! Debounced autocomplete over the places gateway.
//!
//! Suggestion requests follow keystrokes, so they are debounced rather than
//! fired per character, and an in-flight request whose input has since
//! changed must have its result discarded instead of flickering stale
//! suggestions into view.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tracing::debug;

use crate::{
    error::Result,
    provider::{PlacesClient, Suggestion},
};

/// Issues autocomplete requests after a quiescence window, superseding any
/// older in-flight call.
///
/// Every call bumps a generation counter. A call that is no longer the
/// newest generation when its debounce elapses, or when its provider
/// response lands, returns `Ok(None)` and its result is dropped. Only the
/// newest call returns `Ok(Some(suggestions))`.
pub struct Suggester {
    gateway: Arc<PlacesClient>,
    debounce: Duration,
    min_chars: usize,
    generation: AtomicU64,
}

impl Suggester {
    pub fn new(gateway: Arc<PlacesClient>, debounce: Duration, min_chars: usize) -> Self {
        Self {
            gateway,
            debounce,
            min_chars,
            generation: AtomicU64::new(0),
        }
    }

    /// Suggest completions for the current input.
    ///
    /// Returns `Ok(None)` when superseded by newer input, `Ok(Some(vec))`
    /// otherwise; inputs below the minimum length yield an empty list
    /// without touching the network.
    pub async fn suggest(&self, input: &str) -> Result<Option<Vec<Suggestion>>> {
        // Bump first: even a too-short input invalidates older requests.
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if input.chars().count() < self.min_chars {
            return Ok(Some(Vec::new()));
        }

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!(input, "autocomplete superseded during debounce");
            return Ok(None);
        }

        let suggestions = self.gateway.autocomplete(input).await?;

        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!(input, "autocomplete superseded while in flight");
            return Ok(None);
        }
        Ok(Some(suggestions))
    }
}
