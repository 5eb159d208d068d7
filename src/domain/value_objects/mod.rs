//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`ids`]: catalog identifiers and courier/shipping codes
//! - [`AddressToken`]: generic origin/destination address pieces
//! - [`PackageAttributes`]: parcel weight, dimensions, declared value
//! - [`arithmetic`]: rounding rules for normalized measurements

pub mod address;
pub mod arithmetic;
pub mod ids;
pub mod package;

pub use address::{AddressToken, Coordinates};
pub use arithmetic::{ArithmeticError, ArithmeticResult, Rounding, div_round, round_2dp};
pub use ids::{ChannelId, CourierCode, CourierId, CourierServiceId, ShippingCode, ShippingTypeCode};
pub use package::PackageAttributes;
