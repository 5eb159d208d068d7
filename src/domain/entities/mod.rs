//! # Domain Entities
//!
//! Catalog data consumed by the rate engine and the normalized rate model
//! it produces.
//!
//! ## Catalog
//!
//! - [`Channel`]: sales channel whose assigned services can be quoted
//! - [`CourierServiceCandidate`]: a courier service resolved for a channel
//! - [`CourierCoverageCode`]: courier area codes keyed by address pieces
//!
//! ## Rates
//!
//! - [`RateRecord`]: normalized provider output for one service
//! - [`RateBundle`]: all records of one courier for one shipment shape
//! - [`RateSummary`]: per shipping-type price/ETD ranges

pub mod channel;
pub mod courier_service;
pub mod coverage;
pub mod rate;
pub mod summary;

pub use channel::Channel;
pub use courier_service::{CourierIdentity, CourierServiceCandidate, CourierServiceCandidateBuilder};
pub use coverage::{AreaToken, CourierCoverageCode, CoverageKey, CoverageLookup};
pub use rate::{
    Availability, DayRange, PackageMeasures, RateBundle, RateError, RateErrorDetail, RateKey,
    RatePrice, RateRecord,
};
pub use summary::{RateSummary, ValueRange};
