//! # Application Layer
//!
//! Use cases on top of the domain: the rate aggregation service, its request
//! and response DTOs, and the request-level error type.

pub mod dto;
pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{AggregationConfig, ShippingRateService};
