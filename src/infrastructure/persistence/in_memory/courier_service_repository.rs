//! # In-Memory Courier Service Repository
//!
//! In-memory implementation of [`CourierServiceRepository`].
//!
//! Services and channel assignments are stored separately so the same
//! service can be assigned to several channels.

use crate::domain::entities::CourierServiceCandidate;
use crate::domain::value_objects::{ChannelId, CourierServiceId};
use crate::infrastructure::persistence::traits::{CourierServiceRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Storage {
    services: HashMap<CourierServiceId, CourierServiceCandidate>,
    assignments: HashMap<ChannelId, HashSet<CourierServiceId>>,
}

/// In-memory implementation of [`CourierServiceRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourierServiceRepository {
    storage: Arc<RwLock<Storage>>,
}

impl InMemoryCourierServiceRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a courier service.
    pub async fn save(&self, service: CourierServiceCandidate) {
        self.storage
            .write()
            .await
            .services
            .insert(service.id(), service);
    }

    /// Assigns services to a channel.
    pub async fn assign(
        &self,
        channel_id: ChannelId,
        service_ids: impl IntoIterator<Item = CourierServiceId>,
    ) {
        self.storage
            .write()
            .await
            .assignments
            .entry(channel_id)
            .or_default()
            .extend(service_ids);
    }

    /// Returns the number of stored services.
    pub async fn service_count(&self) -> usize {
        self.storage.read().await.services.len()
    }
}

#[async_trait]
impl CourierServiceRepository for InMemoryCourierServiceRepository {
    async fn find_assigned_services(
        &self,
        channel_id: &ChannelId,
        service_ids: &[CourierServiceId],
    ) -> RepositoryResult<Vec<CourierServiceCandidate>> {
        let storage = self.storage.read().await;
        let Some(assigned) = storage.assignments.get(channel_id) else {
            return Ok(Vec::new());
        };

        Ok(service_ids
            .iter()
            .filter(|id| assigned.contains(*id))
            .filter_map(|id| storage.services.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::CourierIdentity;
    use crate::domain::value_objects::CourierId;

    fn service(code: &str) -> CourierServiceCandidate {
        CourierServiceCandidate::builder(
            CourierServiceId::new_v4(),
            CourierIdentity::new(CourierId::new_v4(), "jne", "JNE"),
        )
        .shipping(code, code.to_uppercase())
        .shipping_type("regular", "Regular")
        .etd(1, 2)
        .build()
    }

    #[tokio::test]
    async fn returns_assigned_services_in_request_order() {
        let repo = InMemoryCourierServiceRepository::new();
        let channel = ChannelId::new_v4();
        let (reg, yes, oke) = (service("reg"), service("yes"), service("oke"));
        for s in [&reg, &yes, &oke] {
            repo.save(s.clone()).await;
        }
        repo.assign(channel, [reg.id(), yes.id()]).await;

        let found = repo
            .find_assigned_services(
                &channel,
                &[yes.id(), oke.id(), CourierServiceId::new_v4(), reg.id()],
            )
            .await
            .unwrap();

        assert_eq!(found, vec![yes, reg]);
        assert_eq!(repo.service_count().await, 3);
    }

    #[tokio::test]
    async fn unknown_channel_has_no_services() {
        let repo = InMemoryCourierServiceRepository::new();
        let reg = service("reg");
        repo.save(reg.clone()).await;

        let found = repo
            .find_assigned_services(&ChannelId::new_v4(), &[reg.id()])
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
