//! # Default Adapter
//!
//! Fallback for courier codes with no registered integration. Every
//! requested shipping code comes back `unavailable` with
//! "shipping price not found". The result is a placeholder, so it is never
//! cached.

use crate::domain::entities::{RateBundle, RateError, RateRecord};
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::traits::{ProviderAdapter, QuoteRequest};
use async_trait::async_trait;

/// Placeholder adapter for unrecognized couriers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAdapter;

impl DefaultAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProviderAdapter for DefaultAdapter {
    fn name(&self) -> &str {
        "default"
    }

    fn is_cacheable(&self) -> bool {
        false
    }

    async fn quote(&self, request: &QuoteRequest) -> ProviderResult<RateBundle> {
        let record = RateRecord::unavailable(&RateError::ShippingPriceNotFound);
        Ok(request
            .shipping_codes
            .iter()
            .fold(RateBundle::new(request.courier_code.clone()), |bundle, code| {
                bundle.with_rate(code.clone(), record.clone())
            }))
    }
}
