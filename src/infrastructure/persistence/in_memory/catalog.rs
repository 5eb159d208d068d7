//! # Catalog Fixture
//!
//! JSON snapshot of the management catalog used to seed the in-memory
//! repositories and the internal price table.
//!
//! ```json
//! {
//!   "channels": [{ "id": "…", "name": "web" }],
//!   "courier_services": [{ "id": "…", "courier": { … }, "shipping_code": "reg", … }],
//!   "assignments": [{ "channel_id": "…", "courier_service_ids": ["…"] }],
//!   "coverage": [{ "courier_id": "…", "country_code": "id", "postal_code": "12190", "area_code": "CGK10000" }],
//!   "price_table": [{ "courier_code": "internal", "shipping_code": "reg", … }]
//! }
//! ```

use crate::domain::entities::{Channel, CourierCoverageCode, CourierServiceCandidate};
use crate::domain::value_objects::{ChannelId, CourierServiceId};
use crate::infrastructure::persistence::in_memory::{
    InMemoryChannelRepository, InMemoryCourierServiceRepository, InMemoryCoverageRepository,
};
use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use crate::infrastructure::providers::price_table::{PriceTable, PriceTableRow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Services assigned to one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    /// The channel.
    pub channel_id: ChannelId,
    /// Services the channel may use.
    pub courier_service_ids: Vec<CourierServiceId>,
}

/// Serialized catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFixture {
    /// Sales channels.
    pub channels: Vec<Channel>,
    /// Courier services.
    pub courier_services: Vec<CourierServiceCandidate>,
    /// Channel → service assignments.
    pub assignments: Vec<ChannelAssignment>,
    /// Coverage rows.
    pub coverage: Vec<CourierCoverageCode>,
    /// Internal price table rows.
    pub price_table: Vec<PriceTableRow>,
}

impl CatalogFixture {
    /// Parses a fixture from JSON.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialization` if the JSON is malformed.
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        serde_json::from_str(json).map_err(|e| RepositoryError::serialization(e.to_string()))
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` if the file cannot be read and
    /// `RepositoryError::Serialization` if it is malformed.
    pub async fn from_path(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::connection(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

/// In-memory repositories plus the price table, seeded together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// Channel store.
    pub channels: InMemoryChannelRepository,
    /// Courier service store.
    pub courier_services: InMemoryCourierServiceRepository,
    /// Coverage store.
    pub coverage: InMemoryCoverageRepository,
    /// Internal price table.
    pub price_table: PriceTable,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded from `fixture`.
    pub async fn from_fixture(fixture: CatalogFixture) -> Self {
        let catalog = Self::new();
        catalog.seed(fixture).await;
        catalog
    }

    /// Adds every record of `fixture` to the stores.
    pub async fn seed(&self, fixture: CatalogFixture) {
        let counts = (
            fixture.channels.len(),
            fixture.courier_services.len(),
            fixture.coverage.len(),
            fixture.price_table.len(),
        );

        for channel in fixture.channels {
            self.channels.save(channel).await;
        }
        for service in fixture.courier_services {
            self.courier_services.save(service).await;
        }
        for assignment in fixture.assignments {
            self.courier_services
                .assign(assignment.channel_id, assignment.courier_service_ids)
                .await;
        }
        for row in fixture.coverage {
            self.coverage.save(row).await;
        }
        for row in fixture.price_table {
            self.price_table.insert(row);
        }

        info!(
            channels = counts.0,
            courier_services = counts.1,
            coverage_rows = counts.2,
            price_rows = counts.3,
            "catalog seeded"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::CoverageKey;
    use crate::domain::value_objects::CourierId;
    use crate::infrastructure::persistence::traits::{
        ChannelRepository, CourierServiceRepository, CoverageRepository,
    };

    const FIXTURE: &str = r#"{
        "channels": [
            { "id": "6f1c1a7e-0c7a-4d6e-9f51-2b8f2f0b9a11", "name": "web" }
        ],
        "courier_services": [
            {
                "id": "0b8e2f4c-7c1d-4f5a-8a36-0e5b7d9c1f22",
                "courier": {
                    "id": "9a2d6b3e-1f4c-4e8a-b7d5-3c6f8e0a2b33",
                    "code": "JNE",
                    "name": "JNE"
                },
                "shipping_code": "REG",
                "shipping_name": "Reguler",
                "shipping_type_code": "regular",
                "shipping_type_name": "Regular",
                "etd": { "min": 1, "max": 2 }
            }
        ],
        "assignments": [
            {
                "channel_id": "6f1c1a7e-0c7a-4d6e-9f51-2b8f2f0b9a11",
                "courier_service_ids": ["0b8e2f4c-7c1d-4f5a-8a36-0e5b7d9c1f22"]
            }
        ],
        "coverage": [
            {
                "courier_id": "9a2d6b3e-1f4c-4e8a-b7d5-3c6f8e0a2b33",
                "country_code": "id",
                "postal_code": "12190",
                "area_code": "CGK10000"
            }
        ]
    }"#;

    #[tokio::test]
    async fn seeds_all_stores() {
        let fixture = CatalogFixture::from_json(FIXTURE).unwrap();
        assert!(fixture.price_table.is_empty());

        let catalog = InMemoryCatalog::from_fixture(fixture.clone()).await;
        let channel_id = fixture.channels[0].id();
        let service_id = fixture.courier_services[0].id();

        assert!(catalog.channels.find_channel(&channel_id).await.unwrap().is_some());

        let services = catalog
            .courier_services
            .find_assigned_services(&channel_id, &[service_id])
            .await
            .unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].shipping_code().as_str(), "reg");
        assert_eq!(services[0].courier().code.as_str(), "jne");

        let coverage = catalog
            .coverage
            .find_coverage(
                &services[0].courier().id,
                "id",
                &CoverageKey::PostalCode("12190".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(coverage.unwrap().area_code, "CGK10000");
        assert!(
            catalog
                .coverage
                .find_coverage(
                    &CourierId::new_v4(),
                    "id",
                    &CoverageKey::PostalCode("12190".to_string())
                )
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = CatalogFixture::from_json("{ not json").unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
