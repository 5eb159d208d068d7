//! # Courier Coverage
//!
//! Coverage codes map a generic address token onto a courier's own
//! area/region identifier. Lookups are exact: no fuzzy matching and no
//! fallback from subdistrict to city.

use crate::domain::value_objects::{AddressToken, CourierId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which piece of an address a courier keys its coverage on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLookup {
    /// Country code plus postal code.
    #[default]
    PostalCode,
    /// Country code plus administrative subdistrict code.
    Subdistrict,
}

impl fmt::Display for CoverageLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostalCode => write!(f, "postal_code"),
            Self::Subdistrict => write!(f, "subdistrict"),
        }
    }
}

/// Exact lookup key into the coverage store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CoverageKey {
    /// Lookup by postal code.
    PostalCode(String),
    /// Lookup by subdistrict code.
    Subdistrict(String),
}

impl CoverageKey {
    /// Builds the key for `token` under `lookup`.
    ///
    /// Returns `None` when the token lacks the piece the lookup needs.
    #[must_use]
    pub fn from_token(token: &AddressToken, lookup: CoverageLookup) -> Option<Self> {
        match lookup {
            CoverageLookup::PostalCode => token
                .postal_code()
                .map(|p| Self::PostalCode(p.trim().to_string())),
            CoverageLookup::Subdistrict => token
                .subdistrict_code()
                .map(|s| Self::Subdistrict(s.trim().to_string())),
        }
    }
}

impl fmt::Display for CoverageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostalCode(p) => write!(f, "postal:{}", p),
            Self::Subdistrict(s) => write!(f, "subdistrict:{}", s),
        }
    }
}

/// A coverage row: one courier's area code for one address key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierCoverageCode {
    /// The courier this row belongs to.
    pub courier_id: CourierId,
    /// Country code, lowercase.
    pub country_code: String,
    /// Postal code, if the row is keyed by postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Subdistrict code, if the row is keyed by subdistrict.
    #[serde(default)]
    pub subdistrict_code: Option<String>,
    /// The courier's own area/region identifier.
    pub area_code: String,
}

impl CourierCoverageCode {
    /// Returns true if this row matches the courier, country and key exactly.
    #[must_use]
    pub fn matches(&self, courier_id: &CourierId, country_code: &str, key: &CoverageKey) -> bool {
        if &self.courier_id != courier_id || !self.country_code.eq_ignore_ascii_case(country_code)
        {
            return false;
        }
        match key {
            CoverageKey::PostalCode(p) => self.postal_code.as_deref() == Some(p.as_str()),
            CoverageKey::Subdistrict(s) => self.subdistrict_code.as_deref() == Some(s.as_str()),
        }
    }
}

/// A courier-specific area identifier resolved from a generic address token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaToken {
    /// The courier this area belongs to.
    pub courier_id: CourierId,
    /// The courier's area/region identifier.
    pub area_code: String,
    /// The raw address token the area was resolved from.
    pub address: AddressToken,
}

impl AreaToken {
    /// Creates an area token.
    #[must_use]
    pub fn new(courier_id: CourierId, area_code: impl Into<String>, address: AddressToken) -> Self {
        Self {
            courier_id,
            area_code: area_code.into(),
            address,
        }
    }
}

impl fmt::Display for AreaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.area_code, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(courier_id: CourierId) -> CourierCoverageCode {
        CourierCoverageCode {
            courier_id,
            country_code: "id".to_string(),
            postal_code: Some("12190".to_string()),
            subdistrict_code: Some("3171".to_string()),
            area_code: "CGK10000".to_string(),
        }
    }

    #[test]
    fn key_from_token_requires_piece() {
        let token = AddressToken::new("id").with_postal_code("12190");
        assert_eq!(
            CoverageKey::from_token(&token, CoverageLookup::PostalCode),
            Some(CoverageKey::PostalCode("12190".to_string()))
        );
        assert_eq!(
            CoverageKey::from_token(&token, CoverageLookup::Subdistrict),
            None
        );
    }

    #[test]
    fn matches_is_exact() {
        let courier = CourierId::new_v4();
        let row = row(courier);
        assert!(row.matches(&courier, "ID", &CoverageKey::PostalCode("12190".into())));
        assert!(!row.matches(&courier, "id", &CoverageKey::PostalCode("1219".into())));
        assert!(!row.matches(&courier, "my", &CoverageKey::PostalCode("12190".into())));
        assert!(!row.matches(
            &CourierId::new_v4(),
            "id",
            &CoverageKey::PostalCode("12190".into())
        ));
        assert!(row.matches(&courier, "id", &CoverageKey::Subdistrict("3171".into())));
    }
}
