//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ShippingRateService`]: concurrent per-courier quoting, caching and
//!   summary folding
//! - [`CoverageResolver`]: address token to courier area resolution

pub mod coverage_resolver;
pub mod shipping_rate;

pub use coverage_resolver::{CoverageResolver, Endpoint};
pub use shipping_rate::{AggregationConfig, ShippingRateService};
