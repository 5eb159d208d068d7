//! # Rate Summaries
//!
//! Per shipping-type aggregates: the running price and ETD ranges across all
//! quotable records sharing that shipping type.
//!
//! Summaries are folded incrementally and only ever widen.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::entities::RateSummary;
//! use shipping_rates::domain::value_objects::ShippingTypeCode;
//!
//! let summary = RateSummary::new(ShippingTypeCode::new("regular"));
//! assert!(summary.price_range().is_none());
//! ```

use crate::domain::entities::rate::{Availability, RateRecord};
use crate::domain::value_objects::ShippingTypeCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive min/max range that only widens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueRange<T> {
    /// Lower bound.
    pub min: T,
    /// Upper bound.
    pub max: T,
}

impl<T: PartialOrd + Copy> ValueRange<T> {
    /// Creates a range covering `[low, high]`.
    #[must_use]
    pub fn new(low: T, high: T) -> Self {
        if low <= high {
            Self {
                min: low,
                max: high,
            }
        } else {
            Self {
                min: high,
                max: low,
            }
        }
    }

    /// Widens the range to include `[low, high]`.
    pub fn widen(&mut self, low: T, high: T) {
        let other = Self::new(low, high);
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
    }
}

fn widen_option<T: PartialOrd + Copy>(range: &mut Option<ValueRange<T>>, low: T, high: T) {
    match range {
        Some(r) => r.widen(low, high),
        None => *range = Some(ValueRange::new(low, high)),
    }
}

/// Running aggregate for one shipping type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSummary {
    shipping_type_code: ShippingTypeCode,
    price_range: Option<ValueRange<Decimal>>,
    etd_range: Option<ValueRange<u32>>,
    quotable_count: usize,
    unavailable_count: usize,
}

impl RateSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new(shipping_type_code: ShippingTypeCode) -> Self {
        Self {
            shipping_type_code,
            price_range: None,
            etd_range: None,
            quotable_count: 0,
            unavailable_count: 0,
        }
    }

    /// Folds one record into the summary.
    ///
    /// Unavailable records are counted but never touch the ranges.
    pub fn fold(&mut self, record: &RateRecord) {
        if !record.is_quotable() {
            self.unavailable_count = self.unavailable_count.saturating_add(1);
            return;
        }

        self.quotable_count = self.quotable_count.saturating_add(1);
        let total = record.total_price();
        widen_option(&mut self.price_range, total, total);
        let etd = record.etd();
        widen_option(&mut self.etd_range, etd.min, etd.max);
    }

    /// Returns the shipping type code.
    #[inline]
    #[must_use]
    pub fn shipping_type_code(&self) -> &ShippingTypeCode {
        &self.shipping_type_code
    }

    /// Returns the price range across quotable records, if any.
    #[inline]
    #[must_use]
    pub fn price_range(&self) -> Option<ValueRange<Decimal>> {
        self.price_range
    }

    /// Returns the ETD range across quotable records, if any.
    #[inline]
    #[must_use]
    pub fn etd_range(&self) -> Option<ValueRange<u32>> {
        self.etd_range
    }

    /// Returns the number of quotable records folded in.
    #[inline]
    #[must_use]
    pub fn quotable_count(&self) -> usize {
        self.quotable_count
    }

    /// Returns the number of unavailable records folded in.
    #[inline]
    #[must_use]
    pub fn unavailable_count(&self) -> usize {
        self.unavailable_count
    }

    /// Returns `Quotable` if at least one quotable record was folded in.
    #[must_use]
    pub fn availability(&self) -> Availability {
        if self.quotable_count > 0 {
            Availability::Quotable
        } else {
            Availability::Unavailable
        }
    }

    /// Returns true if any quotable record populated the ranges.
    #[inline]
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.price_range.is_some()
    }
}

impl fmt::Display for RateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RateSummary({}", self.shipping_type_code)?;
        if let (Some(p), Some(e)) = (self.price_range, self.etd_range) {
            write!(f, ": {}-{}, {}-{} days", p.min, p.max, e.min, e.max)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::rate::{DayRange, PackageMeasures, RateError, RatePrice};

    fn quotable(total: i64, min_day: u32, max_day: u32) -> RateRecord {
        RateRecord::quotable(
            PackageMeasures::default(),
            RatePrice {
                total_price: Decimal::new(total, 0),
                ..Default::default()
            },
            DayRange::new(min_day, max_day),
            Decimal::ZERO,
        )
    }

    #[test]
    fn folds_price_and_etd_ranges() {
        let mut summary = RateSummary::new(ShippingTypeCode::new("regular"));
        summary.fold(&quotable(20000, 1, 2));
        summary.fold(&quotable(35000, 2, 4));

        let price = summary.price_range().unwrap();
        assert_eq!(price.min, Decimal::new(20000, 0));
        assert_eq!(price.max, Decimal::new(35000, 0));
        let etd = summary.etd_range().unwrap();
        assert_eq!((etd.min, etd.max), (1, 4));
        assert_eq!(summary.availability(), Availability::Quotable);
    }

    #[test]
    fn unavailable_records_do_not_touch_ranges() {
        let mut summary = RateSummary::new(ShippingTypeCode::new("regular"));
        summary.fold(&RateRecord::unavailable(&RateError::OriginNotFound));
        assert!(!summary.is_populated());
        assert_eq!(summary.unavailable_count(), 1);
        assert_eq!(summary.availability(), Availability::Unavailable);

        summary.fold(&quotable(20000, 1, 2));
        summary.fold(&RateRecord::unavailable(&RateError::Timeout));
        let price = summary.price_range().unwrap();
        assert_eq!(price.min, Decimal::new(20000, 0));
        assert_eq!(price.max, Decimal::new(20000, 0));
    }

    #[test]
    fn range_never_shrinks() {
        let mut range = ValueRange::new(5u32, 10);
        range.widen(6, 7);
        assert_eq!((range.min, range.max), (5, 10));
        range.widen(1, 12);
        assert_eq!((range.min, range.max), (1, 12));
    }
}
