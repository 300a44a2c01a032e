//! Turning a location intent into a usable search origin.
//!
//! A search can start from the device's own position, from a free-text
//! location query, or from an explicit coordinate. Only the device path has
//! real fallback logic: when device positioning fails, approximate IP-based
//! lookup may run instead, but discloses the user's network identity to a
//! third party and is therefore gated on a one-time, persisted consent.
//! That chain is modelled as an explicit state machine rather than nested
//! error handlers so the double-failure path stays unambiguous and testable.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::{
    geo::Coordinate,
    provider::{PlacesClient, ProviderError},
};

pub use error::ResolveError;
use error::Result;

pub mod stubs;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ResolveError {
        #[error("location access denied; enter a location manually")]
        Denied,
        #[error("no location source available; enter a location manually")]
        Unavailable,
        #[error("could not find a place named {0:?}; try a more specific query")]
        Geocode(String),
        #[error("Provider error: {0}")]
        Provider(#[from] crate::provider::ProviderError),
    }
    pub type Result<T> = std::result::Result<T, ResolveError>;
}

/// Where the search origin should come from, supplied by the caller once
/// per search.
#[derive(Debug, Clone)]
pub enum LocationIntent {
    /// Use device positioning, falling back to IP lookup with consent.
    CurrentDevice,
    /// Geocode a free-text location such as `"Berlin"` or `"52.52,13.40"`.
    FreeText(String),
    /// Use this coordinate as-is, no network involved.
    Explicit(Coordinate),
}

/// How trustworthy the resolved origin is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginSource {
    /// Device positioning succeeded.
    Precise,
    /// IP-based lookup; city-level accuracy at best.
    Approximate,
    /// The user supplied the location themselves.
    Manual,
}

/// A resolved search origin: the coordinate plus how it was obtained.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedOrigin {
    pub coordinate: Coordinate,
    pub source: OriginSource,
}

/// Result of an IP-based lookup: a coarse coordinate and, when known, the
/// city it maps to.
#[derive(Debug, Clone)]
pub struct IpLookup {
    pub coordinate: Coordinate,
    pub city: Option<String>,
}

/// Device-provided positioning (GPS or platform equivalent).
#[async_trait]
pub trait DevicePositioning: Send + Sync {
    /// Current position with a bounded timeout and an accuracy hint.
    /// Unsupported hardware, denied permission and timeout are all plain
    /// failures; the resolver treats them alike.
    async fn current_position(
        &self,
        timeout: Duration,
        high_accuracy: bool,
    ) -> anyhow::Result<Coordinate>;
}

/// IP-based approximate location. Which upstream service answers, and any
/// fallback between services, is this capability's own concern.
#[async_trait]
pub trait IpLocation: Send + Sync {
    async fn lookup(&self) -> anyhow::Result<IpLookup>;
}

/// Durable storage for the IP-lookup consent flag.
pub trait ConsentStore: Send + Sync {
    fn get(&self) -> bool;
    fn set(&self, granted: bool);
}

/// Presents the allow/deny consent choice to the user. The resolver invokes
/// this capability; rendering the actual prompt is the caller's problem.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    async fn request(&self) -> bool;
}

/// States of the device-location fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackState {
    TryDevice,
    CheckConsent,
    RequestConsent,
    TryIpFallback,
}

/// Resolves a [`LocationIntent`] to a coordinate through the injected
/// capabilities.
pub struct GeoResolver {
    device: Arc<dyn DevicePositioning>,
    ip: Arc<dyn IpLocation>,
    consent_store: Arc<dyn ConsentStore>,
    consent_prompt: Arc<dyn ConsentPrompt>,
    // Single-flight guard: two near-simultaneous resolutions must not both
    // reach the consent prompt.
    consent_flight: Mutex<()>,
    device_timeout: Duration,
}

impl GeoResolver {
    pub fn new(
        device: Arc<dyn DevicePositioning>,
        ip: Arc<dyn IpLocation>,
        consent_store: Arc<dyn ConsentStore>,
        consent_prompt: Arc<dyn ConsentPrompt>,
        device_timeout: Duration,
    ) -> Self {
        Self {
            device,
            ip,
            consent_store,
            consent_prompt,
            consent_flight: Mutex::new(()),
            device_timeout,
        }
    }

    /// Resolve the intent to an origin, or fail with a terminal
    /// [`ResolveError`].
    #[instrument(level = "debug", skip(self, gateway))]
    pub async fn resolve(
        &self,
        intent: &LocationIntent,
        gateway: &PlacesClient,
    ) -> Result<ResolvedOrigin> {
        match intent {
            LocationIntent::Explicit(coordinate) => Ok(ResolvedOrigin {
                coordinate: *coordinate,
                source: OriginSource::Manual,
            }),
            LocationIntent::FreeText(query) => {
                let coordinate = gateway.geocode(query).await.map_err(|err| match err {
                    ProviderError::GeocodeFailed { query } => ResolveError::Geocode(query),
                    other => ResolveError::Provider(other),
                })?;
                debug!(%coordinate, "free-text location geocoded");
                Ok(ResolvedOrigin {
                    coordinate,
                    source: OriginSource::Manual,
                })
            }
            LocationIntent::CurrentDevice => self.resolve_device().await,
        }
    }

    /// Drive the fallback state machine for [`LocationIntent::CurrentDevice`].
    async fn resolve_device(&self) -> Result<ResolvedOrigin> {
        let mut state = FallbackState::TryDevice;
        // Held from CheckConsent through RequestConsent so the check and
        // the store update are atomic across concurrent resolutions.
        let mut consent_guard: Option<MutexGuard<'_, ()>> = None;

        loop {
            state = match state {
                FallbackState::TryDevice => {
                    match self
                        .device
                        .current_position(self.device_timeout, true)
                        .await
                    {
                        Ok(coordinate) => {
                            debug!(%coordinate, "device positioning succeeded");
                            return Ok(ResolvedOrigin {
                                coordinate,
                                source: OriginSource::Precise,
                            });
                        }
                        Err(err) => {
                            warn!(%err, "device positioning failed, trying IP fallback");
                            FallbackState::CheckConsent
                        }
                    }
                }
                FallbackState::CheckConsent => {
                    consent_guard = Some(self.consent_flight.lock().await);
                    if self.consent_store.get() {
                        drop(consent_guard.take());
                        FallbackState::TryIpFallback
                    } else {
                        FallbackState::RequestConsent
                    }
                }
                FallbackState::RequestConsent => {
                    if self.consent_prompt.request().await {
                        // Persist before the lookup runs: a granted consent
                        // holds for every future search, lookup success or
                        // not.
                        self.consent_store.set(true);
                        drop(consent_guard.take());
                        FallbackState::TryIpFallback
                    } else {
                        return Err(ResolveError::Denied);
                    }
                }
                FallbackState::TryIpFallback => match self.ip.lookup().await {
                    Ok(found) => {
                        info!(city = found.city.as_deref(), "IP lookup resolved origin");
                        return Ok(ResolvedOrigin {
                            coordinate: found.coordinate,
                            source: OriginSource::Approximate,
                        });
                    }
                    Err(err) => {
                        warn!(%err, "IP lookup failed, all location sources exhausted");
                        return Err(ResolveError::Unavailable);
                    }
                },
            };
        }
    }
}
