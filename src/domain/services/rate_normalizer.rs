//! # Rate Normalizer
//!
//! Pure unit conversions and derived measures shared by every provider
//! adapter. Providers disagree on units (grams vs kilograms, meters vs
//! kilometers); each adapter converts through the helpers here so the
//! resulting [`RateRecord`](crate::domain::entities::RateRecord) is uniform.
//!
//! Monetary and day-range fields are never recomputed here.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::services::rate_normalizer::package_measures;
//! use shipping_rates::domain::value_objects::PackageAttributes;
//! use rust_decimal::Decimal;
//!
//! let package = PackageAttributes::new(
//!     Decimal::new(1, 1),
//!     Decimal::new(10, 0),
//!     Decimal::new(10, 0),
//!     Decimal::new(10, 0),
//! );
//! let measures = package_measures(&package, None).unwrap();
//! assert_eq!(measures.volume, Decimal::new(1000, 0));
//! assert_eq!(measures.volumetric_weight, Decimal::new(17, 2));
//! assert_eq!(measures.final_weight, Decimal::new(17, 2));
//! ```

use crate::domain::entities::PackageMeasures;
use crate::domain::value_objects::arithmetic::{
    ArithmeticResult, Rounding, checked_mul, div_round, round_2dp,
};
use crate::domain::value_objects::{AddressToken, Coordinates, PackageAttributes};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Divisor turning cubic centimeters into volumetric kilograms.
pub const VOLUMETRIC_DIVISOR: Decimal = Decimal::from_parts(6000, 0, 0, false, 0);

/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const THOUSAND: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Computes volume, volumetric weight and chargeable weight for a package.
///
/// `weight_kg` overrides the declared weight when the provider reports its
/// own (already converted to kilograms).
///
/// # Errors
///
/// Returns an arithmetic error if the dimensions overflow.
pub fn package_measures(
    package: &PackageAttributes,
    weight_kg: Option<Decimal>,
) -> ArithmeticResult<PackageMeasures> {
    let volume = round_2dp(checked_mul(
        checked_mul(package.length, package.width)?,
        package.height,
    )?);
    let volumetric_weight = div_round(volume, VOLUMETRIC_DIVISOR, Rounding::HalfUp)?;
    let weight = round_2dp(weight_kg.unwrap_or(package.weight));
    let final_weight = weight.max(volumetric_weight);

    Ok(PackageMeasures {
        weight,
        volume,
        volumetric_weight,
        final_weight,
    })
}

impl PackageMeasures {
    /// Derives the measures of a package; see [`package_measures`].
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the dimensions overflow.
    pub fn from_package(
        package: &PackageAttributes,
        weight_kg: Option<Decimal>,
    ) -> ArithmeticResult<Self> {
        package_measures(package, weight_kg)
    }
}

/// Great-circle distance between two points, in kilometers, rounded to 2 dp.
#[must_use]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> Decimal {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Decimal::from_f64(EARTH_RADIUS_KM * c)
        .map(round_2dp)
        .unwrap_or(Decimal::ZERO)
}

/// Distance between two address tokens.
///
/// Zero when either side lacks valid coordinates.
#[must_use]
pub fn distance_between(origin: &AddressToken, destination: &AddressToken) -> Decimal {
    match (origin.coordinates(), destination.coordinates()) {
        (Some(from), Some(to)) => haversine_km(from, to),
        _ => Decimal::ZERO,
    }
}

/// Converts grams to kilograms, rounded to 2 dp.
///
/// # Errors
///
/// Returns an arithmetic error on overflow.
pub fn grams_to_kg(grams: Decimal) -> ArithmeticResult<Decimal> {
    div_round(grams, THOUSAND, Rounding::HalfUp)
}

/// Converts kilograms to whole grams, rounding up.
///
/// # Errors
///
/// Returns an arithmetic error on overflow.
pub fn kg_to_grams(kg: Decimal) -> ArithmeticResult<Decimal> {
    checked_mul(kg, THOUSAND).map(|g| g.ceil().normalize())
}

/// Converts meters to kilometers, rounded to 2 dp.
///
/// # Errors
///
/// Returns an arithmetic error on overflow.
pub fn meters_to_km(meters: Decimal) -> ArithmeticResult<Decimal> {
    div_round(meters, THOUSAND, Rounding::HalfUp)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn package(weight: Decimal, l: i64, w: i64, h: i64) -> PackageAttributes {
        PackageAttributes::new(
            weight,
            Decimal::new(l, 0),
            Decimal::new(w, 0),
            Decimal::new(h, 0),
        )
    }

    #[test]
    fn small_box_uses_volumetric_weight() {
        let m = package_measures(&package(Decimal::new(1, 1), 10, 10, 10), None).unwrap();
        assert_eq!(m.volume, Decimal::new(1000, 0));
        assert_eq!(m.volumetric_weight, Decimal::new(17, 2));
        assert_eq!(m.weight, Decimal::new(10, 2));
        assert_eq!(m.final_weight, Decimal::new(17, 2));
    }

    #[test]
    fn heavy_box_uses_declared_weight() {
        let m = package_measures(&package(Decimal::new(5, 0), 10, 10, 10), None).unwrap();
        assert_eq!(m.final_weight, Decimal::new(5, 0));
    }

    #[test]
    fn provider_weight_overrides_declared() {
        let m = package_measures(
            &package(Decimal::new(5, 0), 10, 10, 10),
            Some(Decimal::new(2, 0)),
        )
        .unwrap();
        assert_eq!(m.weight, Decimal::new(2, 0));
        assert_eq!(m.final_weight, Decimal::new(2, 0));
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(grams_to_kg(Decimal::new(1500, 0)).unwrap(), Decimal::new(15, 1));
        assert_eq!(grams_to_kg(Decimal::new(1, 0)).unwrap(), Decimal::ZERO);
        assert_eq!(kg_to_grams(Decimal::new(1234, 4)).unwrap(), Decimal::new(124, 0));
        assert_eq!(meters_to_km(Decimal::new(12345, 0)).unwrap(), Decimal::new(1235, 2));
    }

    #[test]
    fn haversine_jakarta_bandung() {
        let jakarta = Coordinates::new(-6.2088, 106.8456).unwrap();
        let bandung = Coordinates::new(-6.9175, 107.6191).unwrap();
        let km = haversine_km(jakarta, bandung);
        assert!(km > Decimal::new(115, 0) && km < Decimal::new(118, 0), "{km}");
    }

    #[test]
    fn distance_without_coordinates_is_zero() {
        let a = AddressToken::new("id").with_postal_code("12190");
        let b = AddressToken::new("id").with_coordinates("-6.9", "107.6");
        assert_eq!(distance_between(&a, &b), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn final_weight_is_max_of_weights(
            grams in 0i64..100_000,
            l in 0i64..200,
            w in 0i64..200,
            h in 0i64..200,
        ) {
            let m = package_measures(&package(Decimal::new(grams, 3), l, w, h), None).unwrap();
            prop_assert!(m.final_weight >= m.weight);
            prop_assert!(m.final_weight >= m.volumetric_weight);
            prop_assert!(m.final_weight == m.weight || m.final_weight == m.volumetric_weight);
            prop_assert!(m.volumetric_weight.scale() <= 2);
        }

        #[test]
        fn distance_is_symmetric(
            lat1 in -89.0f64..89.0, lng1 in -179.0f64..179.0,
            lat2 in -89.0f64..89.0, lng2 in -179.0f64..179.0,
        ) {
            let a = Coordinates::new(lat1, lng1).unwrap();
            let b = Coordinates::new(lat2, lng2).unwrap();
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            prop_assert!((ab - ba).abs() <= Decimal::new(1, 2));
            prop_assert!(ab >= Decimal::ZERO);
        }
    }
}
