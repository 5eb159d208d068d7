//! # Application Errors
//!
//! Request-level failures of the rate aggregation use case.
//!
//! Only these abort a whole request, always before any provider is called.
//! Everything that goes wrong for a single courier (coverage miss, provider
//! failure, timeout) is reported inside that courier's rate records instead.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── CourierServiceRequired       - empty candidate set
//! ├── ChannelNotFound(ChannelId)   - unknown sales channel
//! ├── CourierServiceNotFound       - no candidate assigned to the channel
//! ├── Validation(String)           - malformed package or address input
//! └── Repository(RepositoryError)  - catalog store failure
//! ```
//!
//! # Examples
//!
//! ```
//! use shipping_rates::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("weight must not be negative");
//! assert!(err.is_validation());
//! assert_eq!(ApplicationError::CourierServiceRequired.code(), "COURIER_SERVICE_REQUIRED");
//! ```

use crate::domain::value_objects::ChannelId;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// The request named no courier services.
    #[error("courier service is required")]
    CourierServiceRequired,

    /// The sales channel does not exist.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// None of the requested services is assigned to the channel.
    #[error("courier service not found")]
    CourierServiceNotFound,

    /// Input validation failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// Catalog store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a referenced catalog entry does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_) | Self::CourierServiceNotFound
        )
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CourierServiceRequired => "COURIER_SERVICE_REQUIRED",
            Self::ChannelNotFound(_) => "CHANNEL_NOT_FOUND",
            Self::CourierServiceNotFound => "COURIER_SERVICE_NOT_FOUND",
            Self::Validation(_) => "VALIDATION",
            Self::Repository(_) => "REPOSITORY",
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(ApplicationError::ChannelNotFound(ChannelId::new_v4()).is_not_found());
        assert!(ApplicationError::CourierServiceNotFound.is_not_found());
        assert!(!ApplicationError::CourierServiceRequired.is_not_found());
    }

    #[test]
    fn repository_errors_convert() {
        let err: ApplicationError = RepositoryError::connection("down").into();
        assert_eq!(err.code(), "REPOSITORY");
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn display_includes_channel() {
        let id = ChannelId::new_v4();
        let err = ApplicationError::ChannelNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
