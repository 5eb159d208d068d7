//! # Identity Value Objects
//!
//! Type-safe identity wrappers for catalog identifiers and provider codes.
//!
//! ## UUID-based Identifiers
//!
//! - [`ChannelId`] - Sales channel identifier
//! - [`CourierId`] - Courier identifier
//! - [`CourierServiceId`] - Courier service identifier
//!
//! ## Code Identifiers
//!
//! - [`CourierCode`] - Courier code used to pick a provider adapter
//! - [`ShippingCode`] - Service code within a courier (e.g. `reg`, `yes`)
//! - [`ShippingTypeCode`] - Coarse class shared across couriers (e.g. `regular`)

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generates a new random identifier using UUID v4.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

macro_rules! code_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a code, normalized to lowercase with surrounding whitespace removed.
            #[must_use]
            pub fn new(code: impl AsRef<str>) -> Self {
                Self(code.as_ref().trim().to_lowercase())
            }

            /// Returns the code as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(code: $name) -> Self {
                code.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

uuid_id!(
    /// Sales channel identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use shipping_rates::domain::value_objects::ChannelId;
    ///
    /// let id = ChannelId::new_v4();
    /// assert_eq!(id, ChannelId::new(id.get()));
    /// ```
    ChannelId
);

uuid_id!(
    /// Courier identifier.
    CourierId
);

uuid_id!(
    /// Courier service identifier (one shipping service offered by one courier).
    CourierServiceId
);

code_id!(
    /// Courier code (e.g. `jne`, `sicepat`, `gosend`).
    ///
    /// Codes are case-insensitive; they are stored lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use shipping_rates::domain::value_objects::CourierCode;
    ///
    /// assert_eq!(CourierCode::new(" JNE ").as_str(), "jne");
    /// ```
    CourierCode
);

code_id!(
    /// Shipping service code within a courier (e.g. `reg`, `yes`, `instant`).
    ShippingCode
);

code_id!(
    /// Shipping type code grouping services across couriers (e.g. `regular`, `same_day`).
    ShippingTypeCode
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_display_hyphenated() {
        let uuid = Uuid::nil();
        assert_eq!(
            ChannelId::new(uuid).to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn codes_are_normalized() {
        assert_eq!(CourierCode::new("SiCepat"), CourierCode::new("sicepat"));
        assert_eq!(ShippingCode::from(" REG ").as_str(), "reg");
    }

    #[test]
    fn codes_deserialize_normalized() {
        let code: CourierCode = serde_json::from_str("\"JNE\"").unwrap();
        assert_eq!(code.as_str(), "jne");
    }

    #[test]
    fn codes_serialize_transparently() {
        let json = serde_json::to_string(&ShippingTypeCode::new("regular")).unwrap();
        assert_eq!(json, "\"regular\"");
    }
}
