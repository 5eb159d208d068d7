//! # Courier Service Candidates
//!
//! A courier service resolved from a channel's assignment list, carrying
//! everything the aggregator needs to quote it: courier identity, shipping
//! service identity, shipping-type grouping and catalog ETD bounds.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::entities::{CourierIdentity, CourierServiceCandidate};
//! use shipping_rates::domain::value_objects::{CourierId, CourierServiceId};
//!
//! let jne = CourierIdentity::new(CourierId::new_v4(), "JNE", "JNE Express");
//! let reg = CourierServiceCandidate::builder(CourierServiceId::new_v4(), jne)
//!     .shipping("reg", "JNE Regular")
//!     .shipping_type("regular", "Regular")
//!     .etd(2, 3)
//!     .build();
//!
//! assert_eq!(reg.rate_key().to_string(), "jne/reg");
//! ```

use crate::domain::entities::rate::{DayRange, RateKey};
use crate::domain::value_objects::{
    CourierCode, CourierId, CourierServiceId, ShippingCode, ShippingTypeCode,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Courier identity: internal id plus the code used to select a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourierIdentity {
    /// Internal courier id (keys coverage data).
    pub id: CourierId,
    /// Courier code (keys provider selection and cache fingerprints).
    pub code: CourierCode,
    /// Display name.
    pub name: String,
}

impl CourierIdentity {
    /// Creates a courier identity.
    #[must_use]
    pub fn new(id: CourierId, code: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: CourierCode::new(code),
            name: name.into(),
        }
    }
}

impl fmt::Display for CourierIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// A courier service eligible for quoting on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierServiceCandidate {
    id: CourierServiceId,
    courier: CourierIdentity,
    shipping_code: ShippingCode,
    shipping_name: String,
    shipping_type_code: ShippingTypeCode,
    shipping_type_name: String,
    etd: DayRange,
}

impl CourierServiceCandidate {
    /// Starts building a candidate for the given service and courier.
    #[must_use]
    pub fn builder(
        id: CourierServiceId,
        courier: CourierIdentity,
    ) -> CourierServiceCandidateBuilder {
        CourierServiceCandidateBuilder::new(id, courier)
    }

    /// Returns the courier service ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> CourierServiceId {
        self.id
    }

    /// Returns the courier identity.
    #[inline]
    #[must_use]
    pub fn courier(&self) -> &CourierIdentity {
        &self.courier
    }

    /// Returns the shipping service code.
    #[inline]
    #[must_use]
    pub fn shipping_code(&self) -> &ShippingCode {
        &self.shipping_code
    }

    /// Returns the shipping service display name.
    #[inline]
    #[must_use]
    pub fn shipping_name(&self) -> &str {
        &self.shipping_name
    }

    /// Returns the shipping type code used for summary grouping.
    #[inline]
    #[must_use]
    pub fn shipping_type_code(&self) -> &ShippingTypeCode {
        &self.shipping_type_code
    }

    /// Returns the shipping type display name.
    #[inline]
    #[must_use]
    pub fn shipping_type_name(&self) -> &str {
        &self.shipping_type_name
    }

    /// Returns the ETD bounds declared by the catalog.
    #[inline]
    #[must_use]
    pub fn etd(&self) -> DayRange {
        self.etd
    }

    /// Returns the (courier, shipping) key identifying this candidate's rate.
    #[must_use]
    pub fn rate_key(&self) -> RateKey {
        RateKey::new(self.courier.code.clone(), self.shipping_code.clone())
    }
}

/// Builder for [`CourierServiceCandidate`].
#[derive(Debug, Clone)]
pub struct CourierServiceCandidateBuilder {
    id: CourierServiceId,
    courier: CourierIdentity,
    shipping_code: ShippingCode,
    shipping_name: String,
    shipping_type_code: ShippingTypeCode,
    shipping_type_name: String,
    etd: DayRange,
}

impl CourierServiceCandidateBuilder {
    /// Creates a builder with empty shipping metadata.
    #[must_use]
    pub fn new(id: CourierServiceId, courier: CourierIdentity) -> Self {
        Self {
            id,
            courier,
            shipping_code: ShippingCode::new(""),
            shipping_name: String::new(),
            shipping_type_code: ShippingTypeCode::new(""),
            shipping_type_name: String::new(),
            etd: DayRange::default(),
        }
    }

    /// Sets the shipping service code and name.
    #[must_use]
    pub fn shipping(mut self, code: impl AsRef<str>, name: impl Into<String>) -> Self {
        self.shipping_code = ShippingCode::new(code);
        self.shipping_name = name.into();
        self
    }

    /// Sets the shipping type code and name.
    #[must_use]
    pub fn shipping_type(mut self, code: impl AsRef<str>, name: impl Into<String>) -> Self {
        self.shipping_type_code = ShippingTypeCode::new(code);
        self.shipping_type_name = name.into();
        self
    }

    /// Sets the catalog ETD bounds in days.
    #[must_use]
    pub fn etd(mut self, min_day: u32, max_day: u32) -> Self {
        self.etd = DayRange::new(min_day, max_day);
        self
    }

    /// Builds the candidate.
    #[must_use]
    pub fn build(self) -> CourierServiceCandidate {
        CourierServiceCandidate {
            id: self.id,
            courier: self.courier,
            shipping_code: self.shipping_code,
            shipping_name: self.shipping_name,
            shipping_type_code: self.shipping_type_code,
            shipping_type_name: self.shipping_type_name,
            etd: self.etd,
        }
    }
}

impl fmt::Display for CourierServiceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({})",
            self.courier.code, self.shipping_code, self.shipping_type_code
        )
    }
}
