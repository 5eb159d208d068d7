//! # Infrastructure Layer
//!
//! External adapters and implementations of the application's ports.
//!
//! ## Providers
//!
//! Rate sources selected per courier:
//! - domestic multi-courier aggregator (HTTP, shared secret)
//! - on-demand ride-hailing delivery (HTTP, OAuth2)
//! - internal price table
//! - default placeholder for unknown couriers
//!
//! ## Cache
//!
//! Rate bundle cache with in-memory and Redis backends.
//!
//! ## Persistence
//!
//! Read ports onto the management catalog with in-memory implementations.

pub mod cache;
pub mod persistence;
pub mod providers;
