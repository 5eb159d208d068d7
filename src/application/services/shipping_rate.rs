//! # Shipping Rate Service
//!
//! Orchestrates one rate request end to end.
//!
//! This module provides the [`ShippingRateService`] which resolves the sales
//! channel and its assigned courier services, fans out one task per courier
//! (coverage resolution, cache lookup, at most one provider call), and merges
//! the results into per-service quotes with per-shipping-type summaries.
//!
//! # Failure Isolation
//!
//! Only the request-level checks (empty candidate set, unknown channel, no
//! assigned service) abort the call. Every failure below that point is
//! captured into the affected candidates' [`RateRecord`]s:
//!
//! ```text
//! coverage miss        -> ORIGIN_NOT_FOUND / DESTINATION_NOT_FOUND
//! coverage store error -> COVERAGE_UNAVAILABLE
//! provider error       -> PROVIDER_UNAVAILABLE
//! code omitted         -> SHIPPING_RATE_NOT_FOUND
//! no integration       -> SHIPPING_PRICE_NOT_FOUND
//! over time budget     -> TIMEOUT
//! ```

use crate::application::dto::{ServiceQuote, ShippingRateRequest, ShippingRateResponse};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::coverage_resolver::{CoverageResolver, Endpoint};
use crate::domain::entities::{
    CourierIdentity, CourierServiceCandidate, RateBundle, RateError, RateKey, RateRecord,
    RateSummary,
};
use crate::domain::services::rate_fingerprint;
use crate::domain::value_objects::{ShippingCode, ShippingTypeCode};
use crate::infrastructure::cache::RateCache;
use crate::infrastructure::persistence::{
    ChannelRepository, CourierServiceRepository, CoverageRepository,
};
use crate::infrastructure::providers::{ProviderAdapter, ProviderRegistry, QuoteRequest};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Configuration for rate aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Maximum number of couriers quoted concurrently.
    pub max_concurrency: usize,
    /// Time budget of one courier task in milliseconds.
    pub per_courier_timeout_ms: u64,
    /// Time budget of the whole fan-out in milliseconds.
    pub overall_timeout_ms: u64,
    /// TTL of cached rate bundles.
    pub cache_ttl: Duration,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            per_courier_timeout_ms: 5000,
            overall_timeout_ms: 10000,
            cache_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl AggregationConfig {
    /// Creates a new configuration with the specified overall timeout.
    #[must_use]
    pub fn with_timeout(overall_timeout_ms: u64) -> Self {
        Self {
            overall_timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the maximum number of concurrent courier tasks (at least 1).
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Sets the per-courier timeout.
    #[must_use]
    pub fn with_per_courier_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_courier_timeout_ms = timeout_ms;
        self
    }

    /// Sets the cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Candidates of one courier, quoted with a single provider call.
#[derive(Debug)]
struct CourierGroup<'a> {
    courier: &'a CourierIdentity,
    candidates: Vec<&'a CourierServiceCandidate>,
}

impl<'a> CourierGroup<'a> {
    /// Groups candidates by courier code, in first-appearance order.
    fn partition(candidates: &'a [CourierServiceCandidate]) -> Vec<Self> {
        let mut groups: Vec<Self> = Vec::new();
        for candidate in candidates {
            match groups
                .iter_mut()
                .find(|g| g.courier.code == candidate.courier().code)
            {
                Some(group) => group.candidates.push(candidate),
                None => groups.push(Self {
                    courier: candidate.courier(),
                    candidates: vec![candidate],
                }),
            }
        }
        groups
    }

    fn shipping_codes(&self) -> Vec<ShippingCode> {
        let mut codes: Vec<ShippingCode> = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            if !codes.contains(candidate.shipping_code()) {
                codes.push(candidate.shipping_code().clone());
            }
        }
        codes
    }

    fn unavailable(&self, error: &RateError) -> Vec<(RateKey, RateRecord)> {
        self.candidates
            .iter()
            .map(|c| (c.rate_key(), RateRecord::unavailable(error)))
            .collect()
    }

    fn extract(&self, bundle: &RateBundle) -> Vec<(RateKey, RateRecord)> {
        self.candidates
            .iter()
            .map(|c| {
                let record = bundle.get(c.shipping_code()).cloned().unwrap_or_else(|| {
                    RateRecord::unavailable(&RateError::ShippingRateNotFound)
                });
                (c.rate_key(), record)
            })
            .collect()
    }
}

/// Rate aggregation use case.
#[derive(Debug, Clone)]
pub struct ShippingRateService {
    channels: Arc<dyn ChannelRepository>,
    courier_services: Arc<dyn CourierServiceRepository>,
    coverage: CoverageResolver,
    cache: Arc<dyn RateCache>,
    providers: Arc<ProviderRegistry>,
    config: AggregationConfig,
}

impl ShippingRateService {
    /// Creates a new ShippingRateService.
    #[must_use]
    pub fn new(
        channels: Arc<dyn ChannelRepository>,
        courier_services: Arc<dyn CourierServiceRepository>,
        coverage: Arc<dyn CoverageRepository>,
        cache: Arc<dyn RateCache>,
        providers: Arc<ProviderRegistry>,
        config: AggregationConfig,
    ) -> Self {
        Self {
            channels,
            courier_services,
            coverage: CoverageResolver::new(coverage),
            cache,
            providers,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Quotes every requested courier service assigned to the channel.
    ///
    /// Quotes come back in request order (after dropping duplicates and ids
    /// not assigned to the channel), independent of provider latency.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::CourierServiceRequired` if no service was requested
    /// - `ApplicationError::Validation` if the package or addresses are malformed
    /// - `ApplicationError::ChannelNotFound` if the channel does not exist
    /// - `ApplicationError::CourierServiceNotFound` if none of the services is
    ///   assigned to the channel
    /// - `ApplicationError::Repository` if the catalog store fails
    #[instrument(
        skip(self, request),
        fields(channel_id = %request.channel_id, candidates = request.courier_service_ids.len())
    )]
    pub async fn get_rates(
        &self,
        request: &ShippingRateRequest,
    ) -> ApplicationResult<Vec<ServiceQuote>> {
        let service_ids = request.unique_service_ids();
        if service_ids.is_empty() {
            return Err(ApplicationError::CourierServiceRequired);
        }
        request.validate().map_err(ApplicationError::Validation)?;

        let channel = self
            .channels
            .find_channel(&request.channel_id)
            .await?
            .ok_or(ApplicationError::ChannelNotFound(request.channel_id))?;

        let candidates = self
            .courier_services
            .find_assigned_services(&channel.id(), &service_ids)
            .await?;
        if candidates.is_empty() {
            return Err(ApplicationError::CourierServiceNotFound);
        }

        let groups = CourierGroup::partition(&candidates);
        let records = self.collect(&groups, request).await;
        let quotes = assemble(&candidates, &records);

        let quotable = quotes.iter().filter(|q| q.is_quotable()).count();
        info!(
            channel = channel.name(),
            couriers = groups.len(),
            quotable,
            unavailable = quotes.len().saturating_sub(quotable),
            "shipping rates aggregated"
        );

        Ok(quotes)
    }

    /// Like [`get_rates`](Self::get_rates), grouped by shipping type.
    ///
    /// # Errors
    ///
    /// Same as [`get_rates`](Self::get_rates).
    pub async fn get_rate_response(
        &self,
        request: &ShippingRateRequest,
    ) -> ApplicationResult<ShippingRateResponse> {
        let quotes = self.get_rates(request).await?;
        Ok(ShippingRateResponse::from_quotes(quotes))
    }

    /// Runs every courier group with bounded concurrency under the overall
    /// deadline. Groups still pending at the deadline are simply absent.
    async fn collect(
        &self,
        groups: &[CourierGroup<'_>],
        request: &ShippingRateRequest,
    ) -> HashMap<RateKey, RateRecord> {
        let mut merged: HashMap<RateKey, RateRecord> = HashMap::new();
        let mut pending = stream::iter(groups)
            .map(|group| self.quote_group(group, request))
            .buffer_unordered(self.config.max_concurrency.max(1));

        let drain = async {
            while let Some(records) = pending.next().await {
                merged.extend(records);
            }
        };

        let budget = Duration::from_millis(self.config.overall_timeout_ms);
        if timeout(budget, drain).await.is_err() {
            warn!(
                timeout_ms = self.config.overall_timeout_ms,
                "rate aggregation deadline reached"
            );
        }

        merged
    }

    async fn quote_group(
        &self,
        group: &CourierGroup<'_>,
        request: &ShippingRateRequest,
    ) -> Vec<(RateKey, RateRecord)> {
        let budget = Duration::from_millis(self.config.per_courier_timeout_ms);
        match timeout(budget, self.quote_courier(group, request)).await {
            Ok(records) => records,
            Err(_) => {
                warn!(
                    courier = %group.courier.code,
                    timeout_ms = self.config.per_courier_timeout_ms,
                    "courier timed out"
                );
                group.unavailable(&RateError::Timeout)
            }
        }
    }

    async fn quote_courier(
        &self,
        group: &CourierGroup<'_>,
        request: &ShippingRateRequest,
    ) -> Vec<(RateKey, RateRecord)> {
        let courier = group.courier;
        let adapter = self.providers.resolve(&courier.code);
        let lookup = adapter.coverage_lookup();

        let origin = match self
            .coverage
            .resolve(courier, &request.origin, lookup, Endpoint::Origin)
            .await
        {
            Ok(area) => area,
            Err(e) => return group.unavailable(&e),
        };
        let destination = match self
            .coverage
            .resolve(courier, &request.destination, lookup, Endpoint::Destination)
            .await
        {
            Ok(area) => area,
            Err(e) => return group.unavailable(&e),
        };

        let fingerprint = rate_fingerprint(
            &courier.code,
            &request.origin,
            &request.destination,
            &request.package,
        );
        let quote_request = QuoteRequest::new(
            courier.code.clone(),
            origin,
            destination,
            request.package.clone(),
            group.shipping_codes(),
        );

        match self
            .fetch_bundle(adapter.as_ref(), &fingerprint, &quote_request)
            .await
        {
            Ok(bundle) => group.extract(&bundle),
            Err(e) => group.unavailable(&e),
        }
    }

    /// Returns a bundle covering every requested code, from the cache when
    /// possible. Calls the adapter at most once.
    async fn fetch_bundle(
        &self,
        adapter: &dyn ProviderAdapter,
        fingerprint: &str,
        request: &QuoteRequest,
    ) -> Result<RateBundle, RateError> {
        let cacheable = adapter.is_cacheable();
        let mut cached = None;

        if cacheable {
            match self.cache.get(fingerprint).await {
                Ok(Some(bundle))
                    if request
                        .shipping_codes
                        .iter()
                        .all(|code| bundle.get(code).is_some()) =>
                {
                    debug!(fingerprint, "rate cache hit");
                    return Ok(bundle);
                }
                Ok(Some(bundle)) => {
                    debug!(fingerprint, "rate cache hit missing requested services");
                    cached = Some(bundle);
                }
                Ok(None) => debug!(fingerprint, "rate cache miss"),
                Err(e) => warn!(fingerprint, error = %e, "rate cache read failed"),
            }
        }

        let mut bundle = match adapter.quote(request).await {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!(
                    provider = adapter.name(),
                    courier = %request.courier_code,
                    error = %e,
                    "provider quote failed"
                );
                let error = RateError::ProviderUnavailable(e.message().to_string());
                // Cached codes are still served; only the missing ones fail.
                let Some(mut partial) = cached else {
                    return Err(error);
                };
                for code in &request.shipping_codes {
                    if partial.get(code).is_none() {
                        partial.insert(code.clone(), RateRecord::unavailable(&error));
                    }
                }
                return Ok(partial);
            }
        };

        for code in &request.shipping_codes {
            if bundle.get(code).is_none() {
                bundle.insert(
                    code.clone(),
                    RateRecord::unavailable(&RateError::ShippingRateNotFound),
                );
            }
        }

        if cacheable {
            if let Some(previous) = cached {
                for (code, record) in previous.rates() {
                    if bundle.get(code).is_none() {
                        bundle.insert(code.clone(), record.clone());
                    }
                }
            }
            if let Err(e) = self
                .cache
                .put(fingerprint, &bundle, self.config.cache_ttl)
                .await
            {
                warn!(fingerprint, error = %e, "rate cache write failed");
            }
        }

        Ok(bundle)
    }
}

/// Folds records into per-shipping-type summaries and builds the quotes in
/// candidate order. Candidates without a record timed out.
fn assemble(
    candidates: &[CourierServiceCandidate],
    records: &HashMap<RateKey, RateRecord>,
) -> Vec<ServiceQuote> {
    let rated: Vec<(&CourierServiceCandidate, RateRecord)> = candidates
        .iter()
        .map(|candidate| {
            let record = records
                .get(&candidate.rate_key())
                .cloned()
                .unwrap_or_else(|| RateRecord::unavailable(&RateError::Timeout));
            (candidate, record)
        })
        .collect();

    let mut summaries: HashMap<ShippingTypeCode, RateSummary> = HashMap::new();
    for (candidate, record) in &rated {
        summaries
            .entry(candidate.shipping_type_code().clone())
            .or_insert_with(|| RateSummary::new(candidate.shipping_type_code().clone()))
            .fold(record);
    }

    rated
        .into_iter()
        .map(|(candidate, record)| {
            let summary = summaries
                .get(candidate.shipping_type_code())
                .cloned()
                .unwrap_or_else(|| RateSummary::new(candidate.shipping_type_code().clone()));
            ServiceQuote::new(candidate, record, summary)
        })
        .collect()
}
