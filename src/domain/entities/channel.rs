//! # Channel Entity
//!
//! A sales channel (storefront, marketplace, app) whose assigned courier
//! services are eligible for quoting.

use crate::domain::value_objects::ChannelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    id: ChannelId,
    name: String,
}

impl Channel {
    /// Creates a channel.
    #[must_use]
    pub fn new(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the channel ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the channel name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({}: {})", self.id, self.name)
    }
}
