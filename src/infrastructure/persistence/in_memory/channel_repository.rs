//! # In-Memory Channel Repository
//!
//! In-memory implementation of [`ChannelRepository`] for tests and fixtures.

use crate::domain::entities::Channel;
use crate::domain::value_objects::ChannelId;
use crate::infrastructure::persistence::traits::{ChannelRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ChannelRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryChannelRepository {
    storage: Arc<RwLock<HashMap<ChannelId, Channel>>>,
}

impl InMemoryChannelRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a channel.
    pub async fn save(&self, channel: Channel) {
        self.storage.write().await.insert(channel.id(), channel);
    }

    /// Returns the number of channels.
    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Returns true if the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn find_channel(&self, id: &ChannelId) -> RepositoryResult<Option<Channel>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryChannelRepository::new();
        assert!(repo.is_empty().await);

        let channel = Channel::new(ChannelId::new_v4(), "web store");
        repo.save(channel.clone()).await;

        assert_eq!(repo.find_channel(&channel.id()).await.unwrap(), Some(channel));
        assert_eq!(repo.find_channel(&ChannelId::new_v4()).await.unwrap(), None);
    }
}
