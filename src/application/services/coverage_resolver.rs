//! # Coverage Resolver
//!
//! Maps an address token to a courier's own area identifier.
//!
//! Lookup is an exact match on courier, country and either postal code or
//! subdistrict code, depending on what the courier's provider needs. There
//! is no fuzzy matching and no fallback to a coarser region: a token that
//! does not match is a miss for that courier only.

use crate::domain::entities::{
    AreaToken, CourierIdentity, CoverageKey, CoverageLookup, RateError,
};
use crate::domain::value_objects::AddressToken;
use crate::infrastructure::persistence::CoverageRepository;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which end of the shipment is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Pickup address.
    Origin,
    /// Delivery address.
    Destination,
}

impl Endpoint {
    /// The per-candidate error reported when this end does not resolve.
    #[must_use]
    pub fn not_found(self) -> RateError {
        match self {
            Self::Origin => RateError::OriginNotFound,
            Self::Destination => RateError::DestinationNotFound,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => write!(f, "origin"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Resolves address tokens into [`AreaToken`]s through a [`CoverageRepository`].
#[derive(Debug, Clone)]
pub struct CoverageResolver {
    repository: Arc<dyn CoverageRepository>,
}

impl CoverageResolver {
    /// Creates a resolver over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn CoverageRepository>) -> Self {
        Self { repository }
    }

    /// Resolves `token` for `courier`.
    ///
    /// # Errors
    ///
    /// - `RateError::OriginNotFound` / `DestinationNotFound` on a miss, or
    ///   when the token lacks the postal/subdistrict code the lookup needs
    /// - `RateError::CoverageUnavailable` if the store fails
    pub async fn resolve(
        &self,
        courier: &CourierIdentity,
        token: &AddressToken,
        lookup: CoverageLookup,
        endpoint: Endpoint,
    ) -> Result<AreaToken, RateError> {
        let Some(key) = CoverageKey::from_token(token, lookup) else {
            debug!(courier = %courier.code, %endpoint, ?lookup, "address token has no lookup key");
            return Err(endpoint.not_found());
        };

        match self
            .repository
            .find_coverage(&courier.id, token.country_code(), &key)
            .await
        {
            Ok(Some(coverage)) => Ok(AreaToken::new(
                courier.id,
                coverage.area_code,
                token.clone(),
            )),
            Ok(None) => {
                debug!(courier = %courier.code, %endpoint, %key, "no coverage");
                Err(endpoint.not_found())
            }
            Err(e) => {
                warn!(courier = %courier.code, %endpoint, error = %e, "coverage lookup failed");
                Err(RateError::CoverageUnavailable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::CourierCoverageCode;
    use crate::domain::value_objects::CourierId;
    use crate::infrastructure::persistence::in_memory::InMemoryCoverageRepository;
    use crate::infrastructure::persistence::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct BrokenCoverage;

    #[async_trait]
    impl CoverageRepository for BrokenCoverage {
        async fn find_coverage(
            &self,
            _courier_id: &CourierId,
            _country_code: &str,
            _key: &CoverageKey,
        ) -> RepositoryResult<Option<CourierCoverageCode>> {
            Err(RepositoryError::connection("coverage store down"))
        }
    }

    async fn resolver(courier: &CourierIdentity) -> CoverageResolver {
        let repo = InMemoryCoverageRepository::new();
        repo.save(CourierCoverageCode {
            courier_id: courier.id,
            country_code: "id".to_string(),
            postal_code: Some("12190".to_string()),
            subdistrict_code: None,
            area_code: "CGK10000".to_string(),
        })
        .await;
        repo.save(CourierCoverageCode {
            courier_id: courier.id,
            country_code: "id".to_string(),
            postal_code: None,
            subdistrict_code: Some("3273010".to_string()),
            area_code: "BDO-SD-01".to_string(),
        })
        .await;
        CoverageResolver::new(Arc::new(repo))
    }

    fn courier() -> CourierIdentity {
        CourierIdentity::new(CourierId::new_v4(), "jne", "JNE")
    }

    #[tokio::test]
    async fn resolves_by_postal_code() {
        let jne = courier();
        let token = AddressToken::new("ID").with_postal_code("12190");
        let area = resolver(&jne)
            .await
            .resolve(&jne, &token, CoverageLookup::PostalCode, Endpoint::Origin)
            .await
            .unwrap();
        assert_eq!(area.area_code, "CGK10000");
        assert_eq!(area.address, token);
    }

    #[tokio::test]
    async fn resolves_by_subdistrict() {
        let jne = courier();
        let token = AddressToken::new("id").with_subdistrict_code("3273010");
        let area = resolver(&jne)
            .await
            .resolve(&jne, &token, CoverageLookup::Subdistrict, Endpoint::Destination)
            .await
            .unwrap();
        assert_eq!(area.area_code, "BDO-SD-01");
    }

    #[tokio::test]
    async fn miss_reports_the_endpoint() {
        let jne = courier();
        let resolver = resolver(&jne).await;
        let unknown = AddressToken::new("id").with_postal_code("99999");

        let origin = resolver
            .resolve(&jne, &unknown, CoverageLookup::PostalCode, Endpoint::Origin)
            .await
            .unwrap_err();
        assert_eq!(origin, RateError::OriginNotFound);

        let no_key = AddressToken::new("id");
        let destination = resolver
            .resolve(&jne, &no_key, CoverageLookup::PostalCode, Endpoint::Destination)
            .await
            .unwrap_err();
        assert_eq!(destination, RateError::DestinationNotFound);
    }

    #[tokio::test]
    async fn other_courier_misses() {
        let jne = courier();
        let resolver = resolver(&jne).await;
        let token = AddressToken::new("id").with_postal_code("12190");
        let err = resolver
            .resolve(&courier(), &token, CoverageLookup::PostalCode, Endpoint::Origin)
            .await
            .unwrap_err();
        assert_eq!(err, RateError::OriginNotFound);
    }

    #[tokio::test]
    async fn store_failure_is_coverage_unavailable() {
        let resolver = CoverageResolver::new(Arc::new(BrokenCoverage));
        let token = AddressToken::new("id").with_postal_code("12190");
        let err = resolver
            .resolve(&courier(), &token, CoverageLookup::PostalCode, Endpoint::Origin)
            .await
            .unwrap_err();
        assert!(matches!(err, RateError::CoverageUnavailable(_)));
    }
}
