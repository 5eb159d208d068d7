//! # Address Tokens
//!
//! Generic address tokens supplied by callers, before they are resolved
//! into courier-specific service areas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A generic address token.
///
/// Carries the pieces of an address that couriers key their coverage on:
/// country and postal code, an administrative subdistrict code, and the
/// coordinates as text (as received from the caller).
///
/// # Examples
///
/// ```
/// use shipping_rates::domain::value_objects::AddressToken;
///
/// let token = AddressToken::new("ID")
///     .with_postal_code("12190")
///     .with_coordinates("-6.2297", "106.8295");
///
/// assert_eq!(token.country_code(), "id");
/// assert!(token.coordinates().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AddressToken {
    /// ISO 3166-1 alpha-2 country code, lowercase.
    country_code: String,
    /// Postal code.
    #[serde(default)]
    postal_code: Option<String>,
    /// Administrative subdistrict code.
    #[serde(default)]
    subdistrict_code: Option<String>,
    /// Latitude as text.
    #[serde(default)]
    latitude: Option<String>,
    /// Longitude as text.
    #[serde(default)]
    longitude: Option<String>,
}

impl AddressToken {
    /// Creates a token for the given country.
    #[must_use]
    pub fn new(country_code: impl AsRef<str>) -> Self {
        Self {
            country_code: country_code.as_ref().trim().to_lowercase(),
            ..Default::default()
        }
    }

    /// Sets the postal code.
    #[must_use]
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Sets the subdistrict code.
    #[must_use]
    pub fn with_subdistrict_code(mut self, subdistrict_code: impl Into<String>) -> Self {
        self.subdistrict_code = Some(subdistrict_code.into());
        self
    }

    /// Sets latitude and longitude.
    #[must_use]
    pub fn with_coordinates(
        mut self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }

    /// Returns the country code.
    #[inline]
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Returns the postal code, if any.
    #[inline]
    #[must_use]
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Returns the subdistrict code, if any.
    #[inline]
    #[must_use]
    pub fn subdistrict_code(&self) -> Option<&str> {
        self.subdistrict_code
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Returns the latitude text as received.
    #[inline]
    #[must_use]
    pub fn latitude(&self) -> Option<&str> {
        self.latitude.as_deref()
    }

    /// Returns the longitude text as received.
    #[inline]
    #[must_use]
    pub fn longitude(&self) -> Option<&str> {
        self.longitude.as_deref()
    }

    /// Parses the coordinates.
    ///
    /// Returns `None` when either side is missing, unparsable, or out of range.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        let lat = self.latitude.as_deref()?.trim().parse::<f64>().ok()?;
        let lng = self.longitude.as_deref()?.trim().parse::<f64>().ok()?;
        Coordinates::new(lat, lng)
    }
}

impl fmt::Display for AddressToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.country_code)?;
        if let Some(postal) = self.postal_code() {
            write!(f, "/{}", postal)?;
        }
        if let Some(subdistrict) = self.subdistrict_code() {
            write!(f, "/sd:{}", subdistrict)?;
        }
        Ok(())
    }
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, within [-180, 180].
    pub longitude: f64,
}

impl Coordinates {
    /// Creates coordinates, returning `None` when out of range or not finite.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}
