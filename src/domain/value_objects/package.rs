//! # Package Attributes
//!
//! Physical description of the parcel being quoted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Physical package attributes.
///
/// Weight is in kilograms, dimensions in centimeters, declared value in the
/// channel's currency minor-free unit (e.g. IDR).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PackageAttributes {
    /// Total declared weight in kilograms.
    pub weight: Decimal,
    /// Length in centimeters.
    pub length: Decimal,
    /// Width in centimeters.
    pub width: Decimal,
    /// Height in centimeters.
    pub height: Decimal,
    /// Declared value of the contents.
    #[serde(default)]
    pub value: Decimal,
    /// Whether the package contains prescription items.
    #[serde(default)]
    pub contains_prescription: bool,
}

impl PackageAttributes {
    /// Creates package attributes with zero declared value and no prescription content.
    #[must_use]
    pub fn new(weight: Decimal, length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            weight,
            length,
            width,
            height,
            value: Decimal::ZERO,
            contains_prescription: false,
        }
    }

    /// Sets the declared value.
    #[must_use]
    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = value;
        self
    }

    /// Marks the package as containing prescription items.
    #[must_use]
    pub fn with_prescription(mut self, contains_prescription: bool) -> Self {
        self.contains_prescription = contains_prescription;
        self
    }

    /// Validates that no attribute is negative.
    ///
    /// # Errors
    ///
    /// Returns the name of the first negative attribute.
    pub fn validate(&self) -> Result<(), &'static str> {
        let fields = [
            ("weight", self.weight),
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
            ("value", self.value),
        ];
        match fields.iter().find(|(_, v)| v.is_sign_negative() && !v.is_zero()) {
            Some((name, _)) => Err(*name),
            None => Ok(()),
        }
    }
}
