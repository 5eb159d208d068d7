//! # Shipping Rate DTOs
//!
//! Request and response shapes of the rate aggregation use case.
//!
//! The response groups per-service quotes by shipping type, in the order the
//! shipping types first appear among the requested services.

use crate::domain::entities::{
    Availability, CourierServiceCandidate, DayRange, RateRecord, RateSummary, ValueRange,
};
use crate::domain::value_objects::{
    AddressToken, ChannelId, CourierCode, CourierServiceId, PackageAttributes, ShippingCode,
    ShippingTypeCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Request for rates across a set of courier services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRateRequest {
    /// Sales channel the request is made for.
    pub channel_id: ChannelId,
    /// Candidate courier services, in caller order.
    #[serde(default)]
    pub courier_service_ids: Vec<CourierServiceId>,
    /// Package attributes.
    pub package: PackageAttributes,
    /// Pickup address.
    pub origin: AddressToken,
    /// Delivery address.
    pub destination: AddressToken,
}

impl ShippingRateRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(
        channel_id: ChannelId,
        courier_service_ids: Vec<CourierServiceId>,
        package: PackageAttributes,
        origin: AddressToken,
        destination: AddressToken,
    ) -> Self {
        Self {
            channel_id,
            courier_service_ids,
            package,
            origin,
            destination,
        }
    }

    /// Candidate ids with duplicates removed, first occurrence kept.
    #[must_use]
    pub fn unique_service_ids(&self) -> Vec<CourierServiceId> {
        let mut seen = HashSet::with_capacity(self.courier_service_ids.len());
        self.courier_service_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Validates the package and address fields.
    ///
    /// The candidate set is checked separately so that an empty set reports
    /// its own error.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        self.package
            .validate()
            .map_err(|field| format!("{field} must not be negative"))?;

        if self.origin.country_code().is_empty() {
            return Err("origin country_code cannot be empty".to_string());
        }
        if self.destination.country_code().is_empty() {
            return Err("destination country_code cannot be empty".to_string());
        }

        Ok(())
    }
}

impl fmt::Display for ShippingRateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShippingRateRequest {{ channel: {}, services: {}, {} -> {} }}",
            self.channel_id,
            self.courier_service_ids.len(),
            self.origin,
            self.destination
        )
    }
}

/// Quote for one requested courier service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQuote {
    /// Courier service id.
    pub courier_service_id: CourierServiceId,
    /// Courier code.
    pub courier_code: CourierCode,
    /// Courier display name.
    pub courier_name: String,
    /// Shipping code.
    pub shipping_code: ShippingCode,
    /// Shipping display name.
    pub shipping_name: String,
    /// Shipping type code.
    pub shipping_type_code: ShippingTypeCode,
    /// Shipping type display name.
    pub shipping_type_name: String,
    /// ETD declared in the catalog.
    pub declared_etd: DayRange,
    /// Normalized provider result.
    pub rate: RateRecord,
    /// Final summary of this service's shipping type.
    pub summary: RateSummary,
}

impl ServiceQuote {
    /// Builds a quote from a candidate, its record and its type's summary.
    #[must_use]
    pub fn new(
        candidate: &CourierServiceCandidate,
        rate: RateRecord,
        summary: RateSummary,
    ) -> Self {
        Self {
            courier_service_id: candidate.id(),
            courier_code: candidate.courier().code.clone(),
            courier_name: candidate.courier().name.clone(),
            shipping_code: candidate.shipping_code().clone(),
            shipping_name: candidate.shipping_name().to_string(),
            shipping_type_code: candidate.shipping_type_code().clone(),
            shipping_type_name: candidate.shipping_type_name().to_string(),
            declared_etd: candidate.etd(),
            rate,
            summary,
        }
    }

    /// Returns true if the service could be quoted.
    #[must_use]
    pub fn is_quotable(&self) -> bool {
        self.rate.is_quotable()
    }
}

/// Quotes of one shipping type with their aggregate ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingTypeRates {
    /// Shipping type code.
    pub shipping_type_code: ShippingTypeCode,
    /// Shipping type display name.
    pub shipping_type_name: String,
    /// `Quotable` if any service of this type was quoted.
    pub availability: Availability,
    /// Price range across quotable services.
    pub price_range: Option<ValueRange<Decimal>>,
    /// ETD range across quotable services.
    pub etd_range: Option<ValueRange<u32>>,
    /// Services of this type, in request order.
    pub services: Vec<ServiceQuote>,
}

impl ShippingTypeRates {
    fn from_summary(summary: &RateSummary, shipping_type_name: &str) -> Self {
        Self {
            shipping_type_code: summary.shipping_type_code().clone(),
            shipping_type_name: shipping_type_name.to_string(),
            availability: summary.availability(),
            price_range: summary.price_range(),
            etd_range: summary.etd_range(),
            services: Vec::new(),
        }
    }
}

/// Grouped response for the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRateResponse {
    /// One entry per shipping type, in first-appearance order.
    pub shipping_types: Vec<ShippingTypeRates>,
}

impl ShippingRateResponse {
    /// Groups per-service quotes by shipping type.
    #[must_use]
    pub fn from_quotes(quotes: Vec<ServiceQuote>) -> Self {
        let mut shipping_types: Vec<ShippingTypeRates> = Vec::new();

        for quote in quotes {
            match shipping_types
                .iter_mut()
                .find(|group| group.shipping_type_code == quote.shipping_type_code)
            {
                Some(group) => group.services.push(quote),
                None => {
                    let mut group =
                        ShippingTypeRates::from_summary(&quote.summary, &quote.shipping_type_name);
                    group.services.push(quote);
                    shipping_types.push(group);
                }
            }
        }

        Self { shipping_types }
    }

    /// Total number of service quotes.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.shipping_types.iter().map(|g| g.services.len()).sum()
    }

    /// Number of shipping types with at least one quotable service.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.shipping_types
            .iter()
            .filter(|g| g.price_range.is_some())
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{CourierIdentity, PackageMeasures, RateError, RatePrice};
    use crate::domain::value_objects::CourierId;

    fn candidate(shipping: &str, shipping_type: &str) -> CourierServiceCandidate {
        CourierServiceCandidate::builder(
            CourierServiceId::new_v4(),
            CourierIdentity::new(CourierId::new_v4(), "jne", "JNE"),
        )
        .shipping(shipping, shipping)
        .shipping_type(shipping_type, shipping_type)
        .etd(1, 2)
        .build()
    }

    fn quotable(price: i64, min: u32, max: u32) -> RateRecord {
        RateRecord::quotable(
            PackageMeasures::default(),
            RatePrice {
                total_price: Decimal::new(price, 0),
                ..RatePrice::default()
            },
            DayRange::new(min, max),
            Decimal::ZERO,
        )
    }

    fn quote(candidate: &CourierServiceCandidate, record: RateRecord) -> ServiceQuote {
        let mut summary = RateSummary::new(candidate.shipping_type_code().clone());
        summary.fold(&record);
        ServiceQuote::new(candidate, record, summary)
    }

    #[test]
    fn unique_service_ids_keeps_first_occurrence() {
        let (a, b) = (CourierServiceId::new_v4(), CourierServiceId::new_v4());
        let request = ShippingRateRequest::new(
            ChannelId::new_v4(),
            vec![a, b, a],
            PackageAttributes::default(),
            AddressToken::new("id"),
            AddressToken::new("id"),
        );
        assert_eq!(request.unique_service_ids(), vec![a, b]);
    }

    #[test]
    fn validate_rejects_negative_weight_and_blank_country() {
        let mut request = ShippingRateRequest::new(
            ChannelId::new_v4(),
            vec![],
            PackageAttributes::default(),
            AddressToken::new("id"),
            AddressToken::new(""),
        );
        assert!(request.validate().unwrap_err().contains("destination"));

        request.destination = AddressToken::new("id");
        assert!(request.validate().is_ok());

        request.package.weight = Decimal::new(-1, 0);
        assert!(request.validate().unwrap_err().contains("weight"));
    }

    #[test]
    fn groups_by_shipping_type_in_first_appearance_order() {
        let reg = candidate("reg", "regular");
        let sameday = candidate("instant", "same_day");
        let oke = candidate("oke", "regular");

        let response = ShippingRateResponse::from_quotes(vec![
            quote(&reg, quotable(20000, 1, 2)),
            quote(&sameday, RateRecord::unavailable(&RateError::ShippingPriceNotFound)),
            quote(&oke, quotable(15000, 2, 3)),
        ]);

        assert_eq!(response.service_count(), 3);
        assert_eq!(response.shipping_types.len(), 2);
        assert_eq!(response.shipping_types[0].shipping_type_code.as_str(), "regular");
        assert_eq!(response.shipping_types[0].services.len(), 2);
        assert_eq!(response.shipping_types[1].availability, Availability::Unavailable);
        assert_eq!(response.populated_count(), 1);
    }
}
