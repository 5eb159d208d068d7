//! # Internal Price Table Adapter
//!
//! Quotes couriers whose prices live in an in-process table instead of a
//! third-party API.
//!
//! Rows are keyed by (courier, shipping code, origin area, destination area)
//! and carry a per-kilogram price plus the ETD. The total is the unit price
//! times the chargeable weight rounded up to whole kilograms, never less
//! than one kilogram.

use crate::domain::entities::{CoverageLookup, DayRange, RateBundle, RatePrice, RateRecord};
use crate::domain::services::rate_normalizer::{distance_between, package_measures};
use crate::domain::value_objects::arithmetic::{Rounding, checked_mul, div_round};
use crate::domain::value_objects::{CourierCode, ShippingCode};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::traits::{ProviderAdapter, QuoteRequest};
use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One price table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTableRow {
    /// Courier code.
    pub courier_code: CourierCode,
    /// Shipping code.
    pub shipping_code: ShippingCode,
    /// Origin area code.
    pub origin_area: String,
    /// Destination area code.
    pub destination_area: String,
    /// Price per chargeable kilogram.
    pub unit_price: Decimal,
    /// Minimum transit days.
    #[serde(default)]
    pub min_day: u32,
    /// Maximum transit days.
    #[serde(default)]
    pub max_day: u32,
    /// Flat insurance fee.
    #[serde(default)]
    pub insurance_fee: Decimal,
}

type RowKey = (CourierCode, ShippingCode, String, String);

/// Shared, read-mostly price table.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    rows: Arc<RwLock<HashMap<RowKey, PriceTableRow>>>,
}

impl PriceTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from rows; later rows replace earlier ones with the same key.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = PriceTableRow>) -> Self {
        let table = Self::new();
        for row in rows {
            table.insert(row);
        }
        table
    }

    /// Inserts or replaces a row.
    pub fn insert(&self, row: PriceTableRow) {
        let key = (
            row.courier_code.clone(),
            row.shipping_code.clone(),
            row.origin_area.clone(),
            row.destination_area.clone(),
        );
        self.rows.write().insert(key, row);
    }

    /// Looks up a row by exact key.
    #[must_use]
    pub fn find(
        &self,
        courier_code: &CourierCode,
        shipping_code: &ShippingCode,
        origin_area: &str,
        destination_area: &str,
    ) -> Option<PriceTableRow> {
        let key = (
            courier_code.clone(),
            shipping_code.clone(),
            origin_area.to_string(),
            destination_area.to_string(),
        );
        self.rows.read().get(&key).cloned()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

/// Adapter quoting from a [`PriceTable`].
#[derive(Debug, Clone)]
pub struct PriceTableAdapter {
    table: PriceTable,
    coverage_lookup: CoverageLookup,
}

impl PriceTableAdapter {
    /// Creates an adapter over `table`, resolving coverage by postal code.
    #[must_use]
    pub fn new(table: PriceTable) -> Self {
        Self {
            table,
            coverage_lookup: CoverageLookup::PostalCode,
        }
    }

    /// Sets how addresses are matched against coverage data.
    #[must_use]
    pub fn with_coverage_lookup(mut self, coverage_lookup: CoverageLookup) -> Self {
        self.coverage_lookup = coverage_lookup;
        self
    }

    /// Returns the underlying table.
    #[must_use]
    pub fn table(&self) -> &PriceTable {
        &self.table
    }
}

/// Whole chargeable kilograms for a final weight, at least one.
///
/// # Errors
///
/// Returns an arithmetic error on overflow.
pub fn chargeable_kilograms(final_weight: Decimal) -> ProviderResult<Decimal> {
    let whole = div_round(final_weight, Decimal::ONE, Rounding::CeilWhole)
        .map_err(|e| ProviderError::protocol_error(e.to_string()))?;
    Ok(whole.max(Decimal::ONE))
}

#[async_trait]
impl ProviderAdapter for PriceTableAdapter {
    fn name(&self) -> &str {
        "price_table"
    }

    fn coverage_lookup(&self) -> CoverageLookup {
        self.coverage_lookup
    }

    async fn quote(&self, request: &QuoteRequest) -> ProviderResult<RateBundle> {
        let measures = package_measures(&request.package, None)
            .map_err(|e| ProviderError::invalid_request(e.to_string()))?;
        let kilograms = chargeable_kilograms(measures.final_weight)?;
        let distance_km = distance_between(&request.origin.address, &request.destination.address);
        let mut bundle = RateBundle::new(request.courier_code.clone());

        for shipping_code in &request.shipping_codes {
            let Some(row) = self.table.find(
                &request.courier_code,
                shipping_code,
                &request.origin.area_code,
                &request.destination.area_code,
            ) else {
                continue;
            };

            let total_price = checked_mul(row.unit_price, kilograms)
                .map_err(|e| ProviderError::protocol_error(e.to_string()))?;
            let price = RatePrice {
                unit_price: row.unit_price,
                total_price,
                insurance_fee: row.insurance_fee,
                must_use_insurance: false,
            };
            bundle.insert(
                shipping_code.clone(),
                RateRecord::quotable(
                    measures,
                    price,
                    DayRange::new(row.min_day, row.max_day),
                    distance_km,
                ),
            );
        }

        if bundle.is_empty() {
            return Err(ProviderError::quote_unavailable(format!(
                "no price table rows for {} {} -> {}",
                request.courier_code, request.origin.area_code, request.destination.area_code
            )));
        }
        Ok(bundle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::AreaToken;
    use crate::domain::value_objects::{AddressToken, CourierId, PackageAttributes};

    fn row(unit_price: i64) -> PriceTableRow {
        PriceTableRow {
            courier_code: CourierCode::new("internal"),
            shipping_code: ShippingCode::new("reg"),
            origin_area: "JKT".to_string(),
            destination_area: "BDG".to_string(),
            unit_price: Decimal::new(unit_price, 0),
            min_day: 2,
            max_day: 3,
            insurance_fee: Decimal::ZERO,
        }
    }

    fn request(weight: Decimal, codes: &[&str]) -> QuoteRequest {
        let courier = CourierId::new_v4();
        QuoteRequest::new(
            CourierCode::new("internal"),
            AreaToken::new(courier, "JKT", AddressToken::new("id").with_postal_code("12190")),
            AreaToken::new(courier, "BDG", AddressToken::new("id").with_postal_code("40111")),
            PackageAttributes::new(weight, Decimal::ONE, Decimal::ONE, Decimal::ONE),
            codes.iter().map(|c| ShippingCode::new(c)).collect(),
        )
    }

    #[test]
    fn chargeable_kilograms_rounds_up_with_floor_of_one() {
        assert_eq!(chargeable_kilograms(Decimal::new(17, 2)).unwrap(), Decimal::ONE);
        assert_eq!(chargeable_kilograms(Decimal::ZERO).unwrap(), Decimal::ONE);
        assert_eq!(chargeable_kilograms(Decimal::new(21, 1)).unwrap(), Decimal::new(3, 0));
        assert_eq!(chargeable_kilograms(Decimal::new(2, 0)).unwrap(), Decimal::new(2, 0));
    }

    #[tokio::test]
    async fn quotes_matching_rows() {
        let adapter = PriceTableAdapter::new(PriceTable::from_rows([row(9000)]));
        let bundle = adapter
            .quote(&request(Decimal::new(21, 1), &["reg", "yes"]))
            .await
            .unwrap();

        assert_eq!(bundle.len(), 1);
        let record = bundle.get(&ShippingCode::new("reg")).unwrap();
        assert_eq!(record.total_price(), Decimal::new(27000, 0));
        assert_eq!(record.etd(), DayRange::new(2, 3));
    }

    #[tokio::test]
    async fn missing_rows_are_unavailable() {
        let adapter = PriceTableAdapter::new(PriceTable::new());
        let err = adapter
            .quote(&request(Decimal::ONE, &["reg"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::QuoteUnavailable { .. }));
    }

    #[test]
    fn later_rows_replace_earlier() {
        let table = PriceTable::from_rows([row(9000), row(10000)]);
        assert_eq!(table.len(), 1);
        let found = table
            .find(
                &CourierCode::new("internal"),
                &ShippingCode::new("reg"),
                "JKT",
                "BDG",
            )
            .unwrap();
        assert_eq!(found.unit_price, Decimal::new(10000, 0));
    }
}
