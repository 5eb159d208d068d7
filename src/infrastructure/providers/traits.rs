//! # Provider Adapter Trait
//!
//! Port definition for logistics provider integrations.
//!
//! Every provider (third-party API, internal price table, or the default
//! placeholder) implements [`ProviderAdapter`]. The aggregator only sees
//! this trait; request shaping, authentication and response parsing stay
//! inside each adapter.

use crate::domain::entities::{AreaToken, CoverageLookup, RateBundle};
use crate::domain::value_objects::{CourierCode, PackageAttributes, ShippingCode};
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use std::fmt;

/// Input for one provider call: a single courier's shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    /// Courier being quoted.
    pub courier_code: CourierCode,
    /// Resolved origin area.
    pub origin: AreaToken,
    /// Resolved destination area.
    pub destination: AreaToken,
    /// Package as declared by the caller.
    pub package: PackageAttributes,
    /// Shipping codes the caller asked for on this courier.
    pub shipping_codes: Vec<ShippingCode>,
}

impl QuoteRequest {
    /// Creates a new quote request.
    #[must_use]
    pub fn new(
        courier_code: CourierCode,
        origin: AreaToken,
        destination: AreaToken,
        package: PackageAttributes,
        shipping_codes: Vec<ShippingCode>,
    ) -> Self {
        Self {
            courier_code,
            origin,
            destination,
            package,
            shipping_codes,
        }
    }

    /// Returns true if the given shipping code was requested.
    #[must_use]
    pub fn wants(&self, shipping_code: &ShippingCode) -> bool {
        self.shipping_codes.contains(shipping_code)
    }
}

/// Trait defining the interface for provider adapters.
///
/// # Error Handling
///
/// A provider returning zero usable rate lines must fail with
/// `ProviderError::QuoteUnavailable` rather than an empty bundle, so that
/// nothing empty ever reaches the cache.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + fmt::Debug {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// How addresses are matched against coverage data for this provider.
    fn coverage_lookup(&self) -> CoverageLookup {
        CoverageLookup::PostalCode
    }

    /// Whether successful bundles from this adapter may be cached.
    fn is_cacheable(&self) -> bool {
        true
    }

    /// Produces a rate bundle for one courier's shipment.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Timeout` / `Connection` - transport failure
    /// - `ProviderError::Authentication` - credentials rejected
    /// - `ProviderError::QuoteUnavailable` - no usable rate lines
    /// - `ProviderError::InvalidRequest` - the shipment cannot be quoted as given
    async fn quote(&self, request: &QuoteRequest) -> ProviderResult<RateBundle>;
}
