//! # Shipping Rates
//!
//! Shipping rate aggregation engine: given a package, an origin and a
//! destination, and a set of candidate courier services, answers "what will
//! it cost and how long will it take" for each service.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): catalog entities, the normalized rate model,
//!   package/address value objects, fingerprinting and unit normalization
//! - **Application Layer** (`application`): the [`ShippingRateService`]
//!   orchestrator, its DTOs and request-level errors
//! - **Infrastructure Layer** (`infrastructure`): catalog repositories, rate
//!   cache backends and provider adapters
//!
//! [`config`] and [`telemetry`] wire these together for the `quote-rates`
//! binary.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shipping_rates::application::ShippingRateService;
//!
//! let service = ShippingRateService::new(channels, services, coverage, cache, providers, config);
//! let response = service.get_rate_response(&request).await?;
//! ```
//!
//! [`ShippingRateService`]: application::ShippingRateService

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
