//! # In-Memory Coverage Repository
//!
//! In-memory implementation of [`CoverageRepository`], indexed by courier.

use crate::domain::entities::{CourierCoverageCode, CoverageKey};
use crate::domain::value_objects::CourierId;
use crate::infrastructure::persistence::traits::{CoverageRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`CoverageRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCoverageRepository {
    storage: Arc<RwLock<HashMap<CourierId, Vec<CourierCoverageCode>>>>,
}

impl InMemoryCoverageRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a coverage row.
    pub async fn save(&self, coverage: CourierCoverageCode) {
        self.storage
            .write()
            .await
            .entry(coverage.courier_id)
            .or_default()
            .push(coverage);
    }

    /// Returns the total number of rows.
    pub async fn len(&self) -> usize {
        self.storage.read().await.values().map(Vec::len).sum()
    }

    /// Returns true if the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CoverageRepository for InMemoryCoverageRepository {
    async fn find_coverage(
        &self,
        courier_id: &CourierId,
        country_code: &str,
        key: &CoverageKey,
    ) -> RepositoryResult<Option<CourierCoverageCode>> {
        let storage = self.storage.read().await;
        Ok(storage.get(courier_id).and_then(|rows| {
            rows.iter()
                .find(|row| row.matches(courier_id, country_code, key))
                .cloned()
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(courier_id: CourierId, postal: &str, area: &str) -> CourierCoverageCode {
        CourierCoverageCode {
            courier_id,
            country_code: "id".to_string(),
            postal_code: Some(postal.to_string()),
            subdistrict_code: None,
            area_code: area.to_string(),
        }
    }

    #[tokio::test]
    async fn exact_match_only() {
        let repo = InMemoryCoverageRepository::new();
        let jne = CourierId::new_v4();
        repo.save(row(jne, "12190", "CGK10000")).await;
        repo.save(row(jne, "40111", "BDO10000")).await;
        assert_eq!(repo.len().await, 2);

        let hit = repo
            .find_coverage(&jne, "ID", &CoverageKey::PostalCode("40111".to_string()))
            .await
            .unwrap();
        assert_eq!(hit.unwrap().area_code, "BDO10000");

        let prefix = repo
            .find_coverage(&jne, "id", &CoverageKey::PostalCode("4011".to_string()))
            .await
            .unwrap();
        assert!(prefix.is_none());

        let other_courier = repo
            .find_coverage(
                &CourierId::new_v4(),
                "id",
                &CoverageKey::PostalCode("12190".to_string()),
            )
            .await
            .unwrap();
        assert!(other_courier.is_none());
    }

    #[tokio::test]
    async fn subdistrict_key_does_not_match_postal_rows() {
        let repo = InMemoryCoverageRepository::new();
        let jne = CourierId::new_v4();
        repo.save(row(jne, "12190", "CGK10000")).await;

        let miss = repo
            .find_coverage(&jne, "id", &CoverageKey::Subdistrict("12190".to_string()))
            .await
            .unwrap();
        assert!(miss.is_none());
    }
}
