//! # Provider Adapters
//!
//! Integrations that turn one courier's shipment into a [`RateBundle`].
//!
//! - [`aggregator`]: domestic multi-courier aggregator (shared secret header)
//! - [`ride_hailing`]: on-demand delivery provider (OAuth2 bearer token)
//! - [`price_table`]: internal per-kilogram price table
//! - [`default`]: placeholder for couriers without an integration
//!
//! [`ProviderRegistry`] selects the adapter by courier code.
//!
//! [`RateBundle`]: crate::domain::entities::RateBundle

pub mod aggregator;
pub mod default;
pub mod error;
pub mod http_client;
pub mod price_table;
pub mod registry;
pub mod ride_hailing;
pub mod traits;


pub use aggregator::{AggregatorAdapter, AggregatorConfig};
pub use default::DefaultAdapter;
pub use error::{ProviderError, ProviderResult};
pub use http_client::HttpClient;
pub use price_table::{PriceTable, PriceTableAdapter, PriceTableRow};
pub use registry::ProviderRegistry;
pub use ride_hailing::{RideHailingAdapter, RideHailingConfig};
pub use traits::{ProviderAdapter, QuoteRequest};
