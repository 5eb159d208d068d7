//! # Persistence Layer
//!
//! Read ports onto the management catalog and their in-memory implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`ChannelRepository`]
//! - [`CourierServiceRepository`]
//! - [`CoverageRepository`]
//!
//! ## Implementations
//!
//! - `in_memory`: in-memory stores seeded from a JSON catalog fixture

pub mod in_memory;
pub mod traits;

pub use traits::{
    ChannelRepository, CourierServiceRepository, CoverageRepository, RepositoryError,
    RepositoryResult,
};
