//! # Ride-Hailing Delivery Adapter
//!
//! Adapter for an on-demand (instant / same-day) delivery provider.
//!
//! Authentication uses the OAuth2 client-credentials grant. The access token
//! is fetched from `POST {base}/oauth2/token` and reused until 60 seconds
//! before it expires. Quotes come from `POST {base}/v1/deliveries/quotes`,
//! which needs both coordinate pairs.
//!
//! Amounts pass through verbatim; the provider reports distance in meters.
//! A 401 on the quote call surfaces as `ProviderError::Authentication` and
//! is not retried.

use crate::domain::entities::{DayRange, RateBundle, RatePrice, RateRecord};
use crate::domain::services::rate_normalizer::{distance_between, meters_to_km, package_measures};
use crate::domain::value_objects::{Coordinates, ShippingCode};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{ProviderAdapter, QuoteRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Tokens are refreshed this long before the provider says they expire.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on how long a fetched token is reused.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the ride-hailing adapter.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideHailingConfig {
    base_url: String,
    client_id: String,
    client_secret: String,
    timeout_ms: u64,
}

impl RideHailingConfig {
    /// Creates a new configuration.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
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

    /// Returns the token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.base_url)
    }

    /// Returns the quote endpoint.
    #[must_use]
    pub fn quotes_url(&self) -> String {
        format!("{}/v1/deliveries/quotes", self.base_url)
    }
}

impl fmt::Debug for RideHailingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RideHailingConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// A delivery stop.
#[derive(Debug, Clone, Serialize)]
pub struct RideHailingStop {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Courier-specific area code.
    pub area_code: String,
}

/// Package section of a quote request.
#[derive(Debug, Clone, Serialize)]
pub struct RideHailingPackage {
    /// Weight in kilograms.
    pub weight_kg: Decimal,
    /// Length in cm.
    pub length: Decimal,
    /// Width in cm.
    pub width: Decimal,
    /// Height in cm.
    pub height: Decimal,
    /// Declared value.
    pub value: Decimal,
}

/// Outbound quote request body.
#[derive(Debug, Clone, Serialize)]
pub struct RideHailingQuoteRequest {
    /// Pickup stop.
    pub origin: RideHailingStop,
    /// Drop-off stop.
    pub destination: RideHailingStop,
    /// Package.
    pub package: RideHailingPackage,
    /// Requested service types.
    pub service_types: Vec<String>,
}

/// Quote response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RideHailingQuoteResponse {
    /// Quotes, one per service type.
    #[serde(default)]
    pub quotes: Vec<RideHailingQuote>,
}

/// One quoted service type.
#[derive(Debug, Clone, Deserialize)]
pub struct RideHailingQuote {
    /// Service type, matching a shipping code.
    pub service_type: String,
    /// Price.
    pub amount: Decimal,
    /// Trip distance in meters.
    #[serde(default)]
    pub distance: Option<Decimal>,
    /// Minimum transit days.
    #[serde(default)]
    pub min_day: u32,
    /// Maximum transit days.
    #[serde(default)]
    pub max_day: u32,
}

/// On-demand delivery provider adapter.
pub struct RideHailingAdapter {
    config: RideHailingConfig,
    http_client: HttpClient,
    token: Mutex<Option<CachedToken>>,
}

impl RideHailingAdapter {
    /// Creates a new adapter.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InternalError` if the HTTP client cannot be created.
    pub fn new(config: RideHailingConfig) -> ProviderResult<Self> {
        let http_client = HttpClient::new(config.timeout_ms())?;
        Ok(Self {
            config,
            http_client,
            token: Mutex::new(None),
        })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RideHailingConfig {
        &self.config
    }

    fn cached_token(&self) -> Option<String> {
        self.token
            .lock()
            .as_ref()
            .filter(|cached| Instant::now() < cached.refresh_at)
            .map(|cached| cached.access_token.clone())
    }

    async fn access_token(&self) -> ProviderResult<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };
        let response: TokenResponse = self
            .http_client
            .post(&self.config.token_url(), &body)
            .await?;

        let lifetime = Duration::from_secs(response.expires_in)
            .saturating_sub(TOKEN_REFRESH_MARGIN)
            .min(MAX_TOKEN_LIFETIME);
        debug!(expires_in = response.expires_in, "fetched ride-hailing access token");
        *self.token.lock() = Instant::now()
            .checked_add(lifetime)
            .map(|refresh_at| CachedToken {
                access_token: response.access_token.clone(),
                refresh_at,
            });
        Ok(response.access_token)
    }

    fn stop(
        coordinates: Option<Coordinates>,
        area_code: &str,
        side: &str,
    ) -> ProviderResult<RideHailingStop> {
        let coordinates = coordinates.ok_or_else(|| {
            ProviderError::invalid_request(format!("{side} coordinates missing or invalid"))
        })?;
        Ok(RideHailingStop {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            area_code: area_code.to_string(),
        })
    }

    /// Shapes the outbound quote request.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRequest` if either side lacks usable coordinates.
    pub fn build_request(&self, request: &QuoteRequest) -> ProviderResult<RideHailingQuoteRequest> {
        Ok(RideHailingQuoteRequest {
            origin: Self::stop(
                request.origin.address.coordinates(),
                &request.origin.area_code,
                "origin",
            )?,
            destination: Self::stop(
                request.destination.address.coordinates(),
                &request.destination.area_code,
                "destination",
            )?,
            package: RideHailingPackage {
                weight_kg: request.package.weight,
                length: request.package.length,
                width: request.package.width,
                height: request.package.height,
                value: request.package.value,
            },
            service_types: request
                .shipping_codes
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }

    /// Converts the provider response into a rate bundle.
    ///
    /// # Errors
    ///
    /// - `ProviderError::QuoteUnavailable` if no requested quote is present
    /// - `ProviderError::ProtocolError` if numbers cannot be normalized
    pub fn parse_response(
        &self,
        response: RideHailingQuoteResponse,
        request: &QuoteRequest,
    ) -> ProviderResult<RateBundle> {
        let measures = package_measures(&request.package, None)
            .map_err(|e| ProviderError::protocol_error(e.to_string()))?;
        let mut bundle = RateBundle::new(request.courier_code.clone());

        for quote in response.quotes {
            let shipping_code = ShippingCode::new(&quote.service_type);
            if !request.wants(&shipping_code) {
                continue;
            }

            let distance_km = match quote.distance {
                Some(meters) => {
                    meters_to_km(meters).map_err(|e| ProviderError::protocol_error(e.to_string()))?
                }
                None => distance_between(&request.origin.address, &request.destination.address),
            };
            let price = RatePrice {
                unit_price: quote.amount,
                total_price: quote.amount,
                ..RatePrice::default()
            };
            bundle.insert(
                shipping_code,
                RateRecord::quotable(
                    measures,
                    price,
                    DayRange::new(quote.min_day, quote.max_day),
                    distance_km,
                ),
            );
        }

        if bundle.is_empty() {
            return Err(ProviderError::quote_unavailable(format!(
                "no quotes returned for {}",
                request.courier_code
            )));
        }
        Ok(bundle)
    }
}

impl fmt::Debug for RideHailingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RideHailingAdapter")
            .field("config", &self.config)
            .field("has_token", &self.cached_token().is_some())
            .finish()
    }
}

#[async_trait]
impl ProviderAdapter for RideHailingAdapter {
    fn name(&self) -> &str {
        "ride_hailing"
    }

    async fn quote(&self, request: &QuoteRequest) -> ProviderResult<RateBundle> {
        let body = self.build_request(request)?;
        let token = self.access_token().await?;
        debug!(courier = %request.courier_code, "requesting ride-hailing quotes");

        let response: RideHailingQuoteResponse = self
            .http_client
            .post_with_bearer(&self.config.quotes_url(), &body, &token)
            .await?;
        self.parse_response(response, request)
    }
}
