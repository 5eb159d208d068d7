//! # Domain Services
//!
//! Pure functions that don't belong to a single entity.
//!
//! - [`rate_normalizer`]: unit conversions, volumetric weight, distance
//! - [`fingerprint`]: deterministic rate cache keys

pub mod fingerprint;
pub mod rate_normalizer;

pub use fingerprint::rate_fingerprint;
pub use rate_normalizer::{distance_between, haversine_km, package_measures};
