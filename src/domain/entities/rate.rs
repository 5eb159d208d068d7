//! # Rate Records
//!
//! The normalized rate model every provider response is converted into.
//!
//! A [`RateRecord`] is either `quotable` (prices, transit days and package
//! measures populated) or `unavailable` (all price/day fields zero and an
//! error detail populated). Records are grouped per courier into a
//! [`RateBundle`], which is also the unit stored in the rate cache.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::entities::{Availability, RateError, RateRecord};
//!
//! let record = RateRecord::unavailable(&RateError::OriginNotFound);
//! assert_eq!(record.availability(), Availability::Unavailable);
//! assert_eq!(record.error().map(|e| e.code.as_str()), Some("ORIGIN_NOT_FOUND"));
//! ```

use crate::domain::value_objects::{CourierCode, ShippingCode};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Availability code of a rate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The service can be booked at the quoted price.
    Quotable,
    /// The service cannot be quoted; see the error detail.
    Unavailable,
}

impl Availability {
    /// Returns true if quotable.
    #[inline]
    #[must_use]
    pub const fn is_quotable(&self) -> bool {
        matches!(self, Self::Quotable)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quotable => write!(f, "quotable"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Per-candidate rate failure.
///
/// These never abort a request; each is captured into the candidate's
/// [`RateRecord`] while aggregation continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Origin did not resolve to an area for this courier.
    #[error("origin not found")]
    OriginNotFound,

    /// Destination did not resolve to an area for this courier.
    #[error("destination not found")]
    DestinationNotFound,

    /// The coverage store failed while resolving an address.
    #[error("coverage lookup failed: {0}")]
    CoverageUnavailable(String),

    /// The provider call failed (business, transport or auth error).
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered but omitted this service.
    #[error("shipping rate not found")]
    ShippingRateNotFound,

    /// No provider is registered for this courier.
    #[error("shipping price not found")]
    ShippingPriceNotFound,

    /// The courier did not answer within the time budget.
    #[error("shipping rate request timed out")]
    Timeout,
}

impl RateError {
    /// Returns the stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OriginNotFound => "ORIGIN_NOT_FOUND",
            Self::DestinationNotFound => "DESTINATION_NOT_FOUND",
            Self::CoverageUnavailable(_) => "COVERAGE_UNAVAILABLE",
            Self::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            Self::ShippingRateNotFound => "SHIPPING_RATE_NOT_FOUND",
            Self::ShippingPriceNotFound => "SHIPPING_PRICE_NOT_FOUND",
            Self::Timeout => "TIMEOUT",
        }
    }
}

/// Serializable error detail carried by an unavailable record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateErrorDetail {
    /// Stable error code (see [`RateError::code`]).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&RateError> for RateErrorDetail {
    fn from(error: &RateError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Inclusive day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DayRange {
    /// Minimum transit days.
    pub min: u32,
    /// Maximum transit days.
    pub max: u32,
}

impl DayRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Normalized package measures (kilograms, cubic centimeters, kilometers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PackageMeasures {
    /// Actual weight in kilograms.
    pub weight: Decimal,
    /// Volume in cubic centimeters.
    pub volume: Decimal,
    /// Volumetric weight in kilograms.
    pub volumetric_weight: Decimal,
    /// Chargeable weight: max(weight, volumetric weight).
    pub final_weight: Decimal,
}

/// Provider-supplied pricing, passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RatePrice {
    /// Price per chargeable unit.
    pub unit_price: Decimal,
    /// Total shipping price.
    pub total_price: Decimal,
    /// Insurance fee.
    pub insurance_fee: Decimal,
    /// Whether insurance is mandatory for this service.
    pub must_use_insurance: bool,
}

/// Normalized provider output for one (courier, shipping) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    availability: Availability,
    error: Option<RateErrorDetail>,
    weight: Decimal,
    volume: Decimal,
    volumetric_weight: Decimal,
    final_weight: Decimal,
    min_day: u32,
    max_day: u32,
    unit_price: Decimal,
    total_price: Decimal,
    insurance_fee: Decimal,
    must_use_insurance: bool,
    distance_km: Decimal,
}

impl RateRecord {
    /// Creates a quotable record.
    #[must_use]
    pub fn quotable(
        measures: PackageMeasures,
        price: RatePrice,
        etd: DayRange,
        distance_km: Decimal,
    ) -> Self {
        Self {
            availability: Availability::Quotable,
            error: None,
            weight: measures.weight,
            volume: measures.volume,
            volumetric_weight: measures.volumetric_weight,
            final_weight: measures.final_weight,
            min_day: etd.min,
            max_day: etd.max,
            unit_price: price.unit_price,
            total_price: price.total_price,
            insurance_fee: price.insurance_fee,
            must_use_insurance: price.must_use_insurance,
            distance_km,
        }
    }

    /// Creates an unavailable record; all numeric fields are zero.
    #[must_use]
    pub fn unavailable(error: &RateError) -> Self {
        Self {
            availability: Availability::Unavailable,
            error: Some(RateErrorDetail::from(error)),
            weight: Decimal::ZERO,
            volume: Decimal::ZERO,
            volumetric_weight: Decimal::ZERO,
            final_weight: Decimal::ZERO,
            min_day: 0,
            max_day: 0,
            unit_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
            insurance_fee: Decimal::ZERO,
            must_use_insurance: false,
            distance_km: Decimal::ZERO,
        }
    }

    /// Returns the availability code.
    #[inline]
    #[must_use]
    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Returns true if quotable.
    #[inline]
    #[must_use]
    pub fn is_quotable(&self) -> bool {
        self.availability.is_quotable()
    }

    /// Returns the error detail, present only when unavailable.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&RateErrorDetail> {
        self.error.as_ref()
    }

    /// Returns the package measures.
    #[must_use]
    pub fn measures(&self) -> PackageMeasures {
        PackageMeasures {
            weight: self.weight,
            volume: self.volume,
            volumetric_weight: self.volumetric_weight,
            final_weight: self.final_weight,
        }
    }

    /// Returns the transit day range.
    #[inline]
    #[must_use]
    pub fn etd(&self) -> DayRange {
        DayRange {
            min: self.min_day,
            max: self.max_day,
        }
    }

    /// Returns the pricing fields.
    #[must_use]
    pub fn price(&self) -> RatePrice {
        RatePrice {
            unit_price: self.unit_price,
            total_price: self.total_price,
            insurance_fee: self.insurance_fee,
            must_use_insurance: self.must_use_insurance,
        }
    }

    /// Returns the total price.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Returns the distance in kilometers.
    #[inline]
    #[must_use]
    pub fn distance_km(&self) -> Decimal {
        self.distance_km
    }
}

/// Unique key of a rate within one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RateKey {
    /// Courier code.
    pub courier_code: CourierCode,
    /// Shipping service code.
    pub shipping_code: ShippingCode,
}

impl RateKey {
    /// Creates a rate key.
    #[must_use]
    pub fn new(courier_code: CourierCode, shipping_code: ShippingCode) -> Self {
        Self {
            courier_code,
            shipping_code,
        }
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.courier_code, self.shipping_code)
    }
}

/// All rates one provider returned for one courier and one geo/package
/// combination, keyed by shipping code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBundle {
    courier_code: CourierCode,
    rates: BTreeMap<ShippingCode, RateRecord>,
    quoted_at: DateTime<Utc>,
}

impl RateBundle {
    /// Creates an empty bundle for a courier.
    #[must_use]
    pub fn new(courier_code: CourierCode) -> Self {
        Self {
            courier_code,
            rates: BTreeMap::new(),
            quoted_at: Utc::now(),
        }
    }

    /// Adds a record, replacing any previous record for the same code.
    #[must_use]
    pub fn with_rate(mut self, shipping_code: ShippingCode, record: RateRecord) -> Self {
        self.insert(shipping_code, record);
        self
    }

    /// Adds a record, replacing any previous record for the same code.
    pub fn insert(&mut self, shipping_code: ShippingCode, record: RateRecord) {
        self.rates.insert(shipping_code, record);
    }

    /// Returns the courier code.
    #[inline]
    #[must_use]
    pub fn courier_code(&self) -> &CourierCode {
        &self.courier_code
    }

    /// Returns the record for a shipping code.
    #[must_use]
    pub fn get(&self, shipping_code: &ShippingCode) -> Option<&RateRecord> {
        self.rates.get(shipping_code)
    }

    /// Returns all records keyed by shipping code.
    #[inline]
    #[must_use]
    pub fn rates(&self) -> &BTreeMap<ShippingCode, RateRecord> {
        &self.rates
    }

    /// Returns when the provider produced this bundle.
    #[inline]
    #[must_use]
    pub fn quoted_at(&self) -> DateTime<Utc> {
        self.quoted_at
    }

    /// Returns the number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the bundle holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
