//! # Repository Traits
//!
//! Narrow read ports onto the management catalog.
//!
//! Channel, courier-service and coverage data are owned by an external
//! management store; the rate engine only reads them through these traits.
//!
//! - [`ChannelRepository`]: sales channel lookup
//! - [`CourierServiceRepository`]: services assigned to a channel
//! - [`CoverageRepository`]: courier area codes by address key
//!
//! # Examples
//!
//! ```ignore
//! use shipping_rates::infrastructure::persistence::traits::ChannelRepository;
//!
//! async fn channel_exists(repo: &impl ChannelRepository, id: &ChannelId) -> bool {
//!     matches!(repo.find_channel(id).await, Ok(Some(_)))
//! }
//! ```

use crate::domain::entities::{Channel, CourierCoverageCode, CourierServiceCandidate, CoverageKey};
use crate::domain::value_objects::{ChannelId, CourierId, CourierServiceId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Sales channel lookup.
#[async_trait]
pub trait ChannelRepository: Send + Sync + fmt::Debug {
    /// Finds a channel by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn find_channel(&self, id: &ChannelId) -> RepositoryResult<Option<Channel>>;
}

/// Courier services assigned to channels.
#[async_trait]
pub trait CourierServiceRepository: Send + Sync + fmt::Debug {
    /// Returns the requested services that are assigned to `channel_id`.
    ///
    /// Results follow the order of `service_ids`; ids that are unknown or not
    /// assigned to the channel are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn find_assigned_services(
        &self,
        channel_id: &ChannelId,
        service_ids: &[CourierServiceId],
    ) -> RepositoryResult<Vec<CourierServiceCandidate>>;
}

/// Courier coverage codes.
#[async_trait]
pub trait CoverageRepository: Send + Sync + fmt::Debug {
    /// Finds the coverage row matching courier, country and key exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn find_coverage(
        &self,
        courier_id: &CourierId,
        country_code: &str,
        key: &CoverageKey,
    ) -> RepositoryResult<Option<CourierCoverageCode>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let error = RepositoryError::connection("refused");
        assert_eq!(error.to_string(), "Connection error: refused");
        assert!(RepositoryError::query("bad").to_string().contains("Query"));
    }
}
