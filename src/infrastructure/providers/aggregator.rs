//! # Domestic Aggregator Adapter
//!
//! Adapter for a multi-courier domestic rate aggregator.
//!
//! - Static shared secret sent as `X-Api-Key`
//! - `POST {base}/v1/rates` with area ids, postal codes and weight in grams
//! - Envelope `{ success, message, data: { rates: [...] } }`
//!
//! Rate lines for other couriers, or for shipping codes nobody asked for,
//! are dropped before the bundle is built.

use crate::domain::entities::{DayRange, RateBundle, RatePrice, RateRecord};
use crate::domain::services::rate_normalizer::{
    distance_between, grams_to_kg, kg_to_grams, package_measures,
};
use crate::domain::value_objects::{CourierCode, ShippingCode};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{ProviderAdapter, QuoteRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Configuration for the aggregator adapter.
///
/// # Examples
///
/// ```
/// use shipping_rates::infrastructure::providers::aggregator::AggregatorConfig;
///
/// let config = AggregatorConfig::new("https://rates.example.com", "secret")
///     .with_timeout_ms(3000);
/// assert_eq!(config.rates_url(), "https://rates.example.com/v1/rates");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl AggregatorConfig {
    /// Creates a new configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the rates endpoint.
    #[must_use]
    pub fn rates_url(&self) -> String {
        format!("{}/v1/rates", self.base_url)
    }
}

/// Outbound rate request body.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatorRateRequest {
    /// Courier code.
    pub courier: String,
    /// Courier-specific origin area.
    pub origin_area_id: String,
    /// Courier-specific destination area.
    pub destination_area_id: String,
    /// Origin postal code.
    pub origin_postal_code: Option<String>,
    /// Destination postal code.
    pub destination_postal_code: Option<String>,
    /// Weight in whole grams.
    pub weight: Decimal,
    /// Length in cm.
    pub length: Decimal,
    /// Width in cm.
    pub width: Decimal,
    /// Height in cm.
    pub height: Decimal,
    /// Declared item value.
    pub item_value: Decimal,
    /// Requested service codes.
    pub services: Vec<String>,
}

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorEnvelope {
    /// Whether the provider accepted the request.
    pub success: bool,
    /// Provider message, populated on failure.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: Option<AggregatorRateData>,
}

/// Payload of a successful envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregatorRateData {
    /// Rate lines.
    #[serde(default)]
    pub rates: Vec<AggregatorRateLine>,
}

/// One priced service.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorRateLine {
    /// Courier code.
    pub courier_code: String,
    /// Service code.
    pub service_code: String,
    /// Price per chargeable kilogram, when the provider reports it.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Total price.
    pub price: Decimal,
    /// Minimum transit days.
    #[serde(default)]
    pub min_day: u32,
    /// Maximum transit days.
    #[serde(default)]
    pub max_day: u32,
    /// Weight the provider charged for, in grams.
    #[serde(default)]
    pub weight: Option<Decimal>,
    /// Insurance fee.
    #[serde(default)]
    pub insurance_fee: Decimal,
    /// Whether insurance is mandatory.
    #[serde(default)]
    pub must_use_insurance: bool,
}

/// Domestic multi-courier aggregator adapter.
pub struct AggregatorAdapter {
    config: AggregatorConfig,
    http_client: HttpClient,
}

impl AggregatorAdapter {
    /// Creates a new adapter.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the API key is not a valid
    /// header value or the HTTP client cannot be created.
    pub fn new(config: AggregatorConfig) -> ProviderResult<Self> {
        let headers = Self::build_headers(&config)?;
        let http_client = HttpClient::with_headers(config.timeout_ms(), headers)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn build_headers(config: &AggregatorConfig) -> ProviderResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ProviderError::internal_error("Invalid API key format"))?;
        headers.insert(API_KEY_HEADER, api_key);
        Ok(headers)
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Shapes the outbound request body.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRequest` if the weight overflows.
    pub fn build_request(&self, request: &QuoteRequest) -> ProviderResult<AggregatorRateRequest> {
        let weight = kg_to_grams(request.package.weight)
            .map_err(|e| ProviderError::invalid_request(e.to_string()))?;
        Ok(AggregatorRateRequest {
            courier: request.courier_code.to_string(),
            origin_area_id: request.origin.area_code.clone(),
            destination_area_id: request.destination.area_code.clone(),
            origin_postal_code: request.origin.address.postal_code().map(str::to_string),
            destination_postal_code: request
                .destination
                .address
                .postal_code()
                .map(str::to_string),
            weight,
            length: request.package.length,
            width: request.package.width,
            height: request.package.height,
            item_value: request.package.value,
            services: request
                .shipping_codes
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }

    /// Converts the provider envelope into a rate bundle.
    ///
    /// # Errors
    ///
    /// - `ProviderError::QuoteUnavailable` if the envelope reports failure or
    ///   no requested line survives filtering
    /// - `ProviderError::ProtocolError` if a line carries unusable numbers
    pub fn parse_envelope(
        &self,
        envelope: AggregatorEnvelope,
        request: &QuoteRequest,
    ) -> ProviderResult<RateBundle> {
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "provider reported failure".to_string());
            return Err(ProviderError::quote_unavailable(message));
        }

        let distance_km = distance_between(&request.origin.address, &request.destination.address);
        let mut bundle = RateBundle::new(request.courier_code.clone());

        for line in envelope.data.unwrap_or_default().rates {
            if CourierCode::new(&line.courier_code) != request.courier_code {
                continue;
            }
            let shipping_code = ShippingCode::new(&line.service_code);
            if !request.wants(&shipping_code) {
                continue;
            }

            let weight_kg = line
                .weight
                .map(grams_to_kg)
                .transpose()
                .map_err(|e| ProviderError::protocol_error(e.to_string()))?;
            let measures = package_measures(&request.package, weight_kg)
                .map_err(|e| ProviderError::protocol_error(e.to_string()))?;

            let price = RatePrice {
                unit_price: line.unit_price.unwrap_or(line.price),
                total_price: line.price,
                insurance_fee: line.insurance_fee,
                must_use_insurance: line.must_use_insurance,
            };
            bundle.insert(
                shipping_code,
                RateRecord::quotable(
                    measures,
                    price,
                    DayRange::new(line.min_day, line.max_day),
                    distance_km,
                ),
            );
        }

        if bundle.is_empty() {
            return Err(ProviderError::quote_unavailable(format!(
                "no rates returned for {}",
                request.courier_code
            )));
        }
        Ok(bundle)
    }
}

impl fmt::Debug for AggregatorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorAdapter")
            .field("base_url", &self.config.base_url())
            .field("timeout_ms", &self.config.timeout_ms())
            .finish()
    }
}

#[async_trait]
impl ProviderAdapter for AggregatorAdapter {
    fn name(&self) -> &str {
        "aggregator"
    }

    async fn quote(&self, request: &QuoteRequest) -> ProviderResult<RateBundle> {
        let body = self.build_request(request)?;
        debug!(
            courier = %request.courier_code,
            services = body.services.len(),
            "requesting aggregator rates"
        );

        let envelope: AggregatorEnvelope = self
            .http_client
            .post(&self.config.rates_url(), &body)
            .await?;
        self.parse_envelope(envelope, request)
    }
}
