//! # Domain Layer
//!
//! Core rate aggregation model, free of I/O.
//!
//! This layer contains:
//! - **Entities**: channels, courier services, coverage codes, rate records and summaries
//! - **Value Objects**: identifiers, address tokens, package attributes, decimal helpers
//! - **Services**: unit normalization and cache fingerprints

pub mod entities;
pub mod services;
pub mod value_objects;
