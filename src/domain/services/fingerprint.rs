//! # Rate Cache Fingerprint
//!
//! Deterministic cache key for one courier's rate bundle.
//!
//! The key covers courier code, origin/destination postal codes, both
//! coordinate pairs (as received) and package height. Declared weight,
//! length, width and value are not part of it, so requests differing only
//! in those share an entry until it expires.

use crate::domain::value_objects::{AddressToken, CourierCode, PackageAttributes};

/// Prefix of every rate cache key.
pub const FINGERPRINT_PREFIX: &str = "shipping_rate";

/// Builds the cache fingerprint for a courier and shipment shape.
///
/// # Examples
///
/// ```
/// use shipping_rates::domain::services::fingerprint::rate_fingerprint;
/// use shipping_rates::domain::value_objects::{AddressToken, CourierCode, PackageAttributes};
/// use rust_decimal::Decimal;
///
/// let origin = AddressToken::new("id").with_postal_code("12190").with_coordinates("-6.2", "106.8");
/// let destination = AddressToken::new("id").with_postal_code("40111");
/// let package = PackageAttributes::new(Decimal::ONE, Decimal::ONE, Decimal::ONE, Decimal::new(100, 1));
///
/// assert_eq!(
///     rate_fingerprint(&CourierCode::new("jne"), &origin, &destination, &package),
///     "shipping_rate:jne:12190:40111:-6.2,106.8:,:10"
/// );
/// ```
#[must_use]
pub fn rate_fingerprint(
    courier_code: &CourierCode,
    origin: &AddressToken,
    destination: &AddressToken,
    package: &PackageAttributes,
) -> String {
    format!(
        "{}:{}:{}:{}:{}:{}:{}",
        FINGERPRINT_PREFIX,
        courier_code,
        origin.postal_code().unwrap_or_default().trim(),
        destination.postal_code().unwrap_or_default().trim(),
        lat_lng(origin),
        lat_lng(destination),
        package.height.normalize()
    )
}

fn lat_lng(token: &AddressToken) -> String {
    format!(
        "{},{}",
        token.latitude().unwrap_or_default().trim(),
        token.longitude().unwrap_or_default().trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn package(weight: i64, height: i64) -> PackageAttributes {
        PackageAttributes::new(
            Decimal::new(weight, 0),
            Decimal::new(10, 0),
            Decimal::new(10, 0),
            Decimal::new(height, 0),
        )
    }

    fn origin() -> AddressToken {
        AddressToken::new("id")
            .with_postal_code("12190")
            .with_coordinates("-6.2297", "106.8295")
    }

    fn destination() -> AddressToken {
        AddressToken::new("id")
            .with_postal_code("40111")
            .with_coordinates("-6.9175", "107.6191")
    }

    #[test]
    fn weight_does_not_change_fingerprint() {
        let jne = CourierCode::new("jne");
        assert_eq!(
            rate_fingerprint(&jne, &origin(), &destination(), &package(1, 10)),
            rate_fingerprint(&jne, &origin(), &destination(), &package(7, 10)),
        );
    }

    #[test]
    fn height_and_courier_change_fingerprint() {
        let jne = CourierCode::new("jne");
        let base = rate_fingerprint(&jne, &origin(), &destination(), &package(1, 10));
        assert_ne!(
            base,
            rate_fingerprint(&jne, &origin(), &destination(), &package(1, 11))
        );
        assert_ne!(
            base,
            rate_fingerprint(
                &CourierCode::new("sicepat"),
                &origin(),
                &destination(),
                &package(1, 10)
            )
        );
    }

    #[test]
    fn direction_matters() {
        let jne = CourierCode::new("jne");
        assert_ne!(
            rate_fingerprint(&jne, &origin(), &destination(), &package(1, 10)),
            rate_fingerprint(&jne, &destination(), &origin(), &package(1, 10)),
        );
    }
}
