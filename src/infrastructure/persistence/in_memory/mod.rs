//! # In-Memory Repositories
//!
//! In-memory implementations of the catalog ports, used by tests, benches
//! and the `quote-rates` binary.
//!
//! ## Available Repositories
//!
//! - [`InMemoryChannelRepository`]: channels
//! - [`InMemoryCourierServiceRepository`]: courier services and channel assignments
//! - [`InMemoryCoverageRepository`]: coverage rows
//!
//! [`InMemoryCatalog`] bundles the three with the internal price table and
//! seeds them from a [`CatalogFixture`].
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<…>>` and are cheap to clone.

pub mod catalog;
pub mod channel_repository;
pub mod courier_service_repository;
pub mod coverage_repository;

pub use catalog::{CatalogFixture, ChannelAssignment, InMemoryCatalog};
pub use channel_repository::InMemoryChannelRepository;
pub use courier_service_repository::InMemoryCourierServiceRepository;
pub use coverage_repository::InMemoryCoverageRepository;
