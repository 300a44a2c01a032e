//! The main [`NearbySearcher`] facade.
//!
//! Composes the resolver, the provider gateway and the ranking pipeline
//! into one request/response cycle: resolve the origin, fetch candidates,
//! filter to the true radius, score, truncate. Capabilities for device
//! positioning, IP lookup and consent are injected through the builder so
//! hosts and tests control them.
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
//!     .provider(ProviderConfig::new("your-api-key"))
//!     .build()?;
//!
//! let request = SearchRequest::new(
//!     QueryKind::Category(Category::Cafe),
//!     LocationIntent::FreeText("Berlin".to_string()),
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

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    config::SearchConfig,
    error::{Result, VicinityError},
    provider::{PlacesClient, ProviderConfig},
    resolve::{
        ConsentPrompt, ConsentStore, DevicePositioning, GeoResolver, IpLocation, stubs,
    },
    search::{RankedResult, SearchRequest, search_inner},
    suggest::Suggester,
};

/// Finds and ranks nearby businesses through a places provider.
///
/// One instance is cheap to share: each [`execute`](Self::execute) call
/// owns its candidate set end to end, and the only cross-request state is
/// the consent guard inside the resolver.
pub struct NearbySearcher {
    gateway: Arc<PlacesClient>,
    resolver: GeoResolver,
    config: SearchConfig,
}

impl std::fmt::Debug for NearbySearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearbySearcher")
            .field("gateway", &self.gateway)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NearbySearcher {
    pub fn builder() -> NearbySearcherBuilder {
        NearbySearcherBuilder::default()
    }

    /// Execute one search request end to end, returning at most the
    /// configured top-N scored candidates.
    ///
    /// Resolver and provider failures propagate unchanged; an empty ranked
    /// list is a valid outcome, not an error.
    #[instrument(name = "Execute Search", level = "info", skip_all)]
    pub async fn execute(&self, request: &SearchRequest) -> Result<RankedResult> {
        let origin = self.resolver.resolve(&request.origin, &self.gateway).await?;
        info!(source = ?origin.source, origin = %origin.coordinate, "search origin resolved");
        search_inner(&self.gateway, origin, request, &self.config).await
    }

    /// A debounced autocomplete frontend sharing this searcher's gateway.
    #[must_use]
    pub fn suggester(&self) -> Suggester {
        Suggester::new(
            Arc::clone(&self.gateway),
            self.config.autocomplete_debounce,
            self.config.autocomplete_min_chars,
        )
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

/// Builder for [`NearbySearcher`].
///
/// Only the provider configuration is required. Capabilities left unset
/// fall back to the [`stubs`] implementations: device and IP positioning
/// that always fail and a prompt that denies, so `CurrentDevice` searches
/// terminate cleanly on hosts without a positioning stack.
#[derive(Default)]
pub struct NearbySearcherBuilder {
    provider: Option<ProviderConfig>,
    device: Option<Arc<dyn DevicePositioning>>,
    ip: Option<Arc<dyn IpLocation>>,
    consent_store: Option<Arc<dyn ConsentStore>>,
    consent_prompt: Option<Arc<dyn ConsentPrompt>>,
    config: SearchConfig,
}

impl NearbySearcherBuilder {
    /// Set the places provider configuration (required).
    pub fn provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Inject the device positioning capability.
    pub fn device_positioning(mut self, device: Arc<dyn DevicePositioning>) -> Self {
        self.device = Some(device);
        self
    }

    /// Inject the IP-based location capability.
    pub fn ip_location(mut self, ip: Arc<dyn IpLocation>) -> Self {
        self.ip = Some(ip);
        self
    }

    /// Inject the consent store and prompt as a pair; the store persists
    /// the one-time IP-lookup consent, the prompt asks for it.
    pub fn consent(
        mut self,
        store: Arc<dyn ConsentStore>,
        prompt: Arc<dyn ConsentPrompt>,
    ) -> Self {
        self.consent_store = Some(store);
        self.consent_prompt = Some(prompt);
        self
    }

    /// Override the search configuration.
    pub fn search_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the searcher. Fails before any network call when the provider
    /// configuration is missing or carries no API key.
    pub fn build(self) -> Result<NearbySearcher> {
        let provider = self.provider.ok_or_else(|| {
            VicinityError::ConfigError("a provider configuration is required".to_string())
        })?;
        let gateway = Arc::new(PlacesClient::new(provider)?);

        let device = self
            .device
            .unwrap_or_else(|| Arc::new(stubs::UnsupportedPositioning));
        let ip = self
            .ip
            .unwrap_or_else(|| Arc::new(stubs::UnsupportedIpLocation));
        let consent_store = self
            .consent_store
            .unwrap_or_else(|| Arc::new(stubs::MemoryConsent::default()));
        let consent_prompt = self
            .consent_prompt
            .unwrap_or_else(|| Arc::new(stubs::StaticPrompt::deny()));

        let resolver = GeoResolver::new(
            device,
            ip,
            consent_store,
            consent_prompt,
            self.config.device_timeout,
        );

        Ok(NearbySearcher {
            gateway,
            resolver,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_a_provider() {
        let err = NearbySearcher::builder().build().unwrap_err();
        assert!(matches!(err, VicinityError::ConfigError(_)));
    }

    #[test]
    fn build_rejects_empty_api_key() {
        let err = NearbySearcher::builder()
            .provider(ProviderConfig::new(""))
            .build()
            .unwrap_err();
        assert!(matches!(err, VicinityError::Provider(_)));
    }

    #[test]
    fn build_with_defaults_succeeds() {
        let searcher = NearbySearcher::builder()
            .provider(ProviderConfig::new("test-key"))
            .build()
            .expect("defaults suffice");
        assert_eq!(searcher.config().top_n, 3);
    }
}
