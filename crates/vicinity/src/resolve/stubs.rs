//! Built-in capability implementations for hosts without a positioning
//! stack, and for tests.
//!
//! Device and IP lookups always fail (which sends the resolver down its
//! normal fallback chain), consent lives in process memory, and the default
//! prompt denies. Real deployments substitute their own implementations
//! through [`crate::NearbySearcherBuilder`].

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use super::{ConsentPrompt, ConsentStore, DevicePositioning, IpLocation, IpLookup};
use crate::geo::Coordinate;

/// Device positioning that always reports "unsupported".
#[derive(Debug, Default)]
pub struct UnsupportedPositioning;

#[async_trait]
impl DevicePositioning for UnsupportedPositioning {
    async fn current_position(
        &self,
        _timeout: Duration,
        _high_accuracy: bool,
    ) -> anyhow::Result<Coordinate> {
        Err(anyhow::anyhow!("device positioning is not supported here"))
    }
}

/// IP lookup that always fails.
#[derive(Debug, Default)]
pub struct UnsupportedIpLocation;

#[async_trait]
impl IpLocation for UnsupportedIpLocation {
    async fn lookup(&self) -> anyhow::Result<IpLookup> {
        Err(anyhow::anyhow!("no IP location service configured"))
    }
}

/// In-memory consent flag. Durable for the life of the process only; hosts
/// with real persistence wrap their own store instead.
#[derive(Debug, Default)]
pub struct MemoryConsent {
    granted: AtomicBool,
}

impl MemoryConsent {
    #[must_use]
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }
}

impl ConsentStore for MemoryConsent {
    fn get(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn set(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }
}

/// A prompt that answers the same way every time without user interaction.
#[derive(Debug)]
pub struct StaticPrompt {
    answer: bool,
}

impl StaticPrompt {
    #[must_use]
    pub fn allow() -> Self {
        Self { answer: true }
    }

    #[must_use]
    pub fn deny() -> Self {
        Self { answer: false }
    }
}

#[async_trait]
impl ConsentPrompt for StaticPrompt {
    async fn request(&self) -> bool {
        self.answer
    }
}
