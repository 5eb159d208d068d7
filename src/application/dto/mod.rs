//! # Data Transfer Objects
//!
//! Request and response types of the application layer.

pub mod shipping_rate_dto;

pub use shipping_rate_dto::{
    ServiceQuote, ShippingRateRequest, ShippingRateResponse, ShippingTypeRates,
};
