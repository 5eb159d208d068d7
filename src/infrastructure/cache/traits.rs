//! # Rate Cache Port
//!
//! Key/value store with TTL holding per-courier rate bundles.
//!
//! Bundles are stored as serialized JSON so that a cache hit yields exactly
//! the record that was written. There is no invalidation: entries live until
//! their TTL expires, even if the catalog changes underneath them.

use crate::domain::entities::RateBundle;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error type for cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backend could not be reached or rejected the command.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A value could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Creates a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Rate bundle cache.
#[async_trait]
pub trait RateCache: Send + Sync + fmt::Debug {
    /// Returns the bundle stored under `fingerprint`, if present and fresh.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backend fails or the entry cannot be decoded.
    async fn get(&self, fingerprint: &str) -> CacheResult<Option<RateBundle>>;

    /// Stores `bundle` under `fingerprint` for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backend fails or the bundle cannot be encoded.
    async fn put(&self, fingerprint: &str, bundle: &RateBundle, ttl: Duration) -> CacheResult<()>;
}

pub(crate) fn encode(bundle: &RateBundle) -> CacheResult<String> {
    serde_json::to_string(bundle).map_err(|e| CacheError::serialization(e.to_string()))
}

pub(crate) fn decode(payload: &str) -> CacheResult<RateBundle> {
    serde_json::from_str(payload).map_err(|e| CacheError::serialization(e.to_string()))
}
