//! # Provider Registry
//!
//! Maps courier codes to the adapter that quotes them.
//!
//! Couriers without a registration fall through to a default adapter
//! ([`DefaultAdapter`] unless replaced). Adding a provider is a call to
//! [`ProviderRegistry::register`].
//!
//! # Examples
//!
//! ```
//! use shipping_rates::infrastructure::providers::registry::ProviderRegistry;
//! use shipping_rates::infrastructure::providers::price_table::{PriceTable, PriceTableAdapter};
//! use shipping_rates::domain::value_objects::CourierCode;
//! use std::sync::Arc;
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register("internal", Arc::new(PriceTableAdapter::new(PriceTable::new())));
//!
//! assert_eq!(registry.resolve(&CourierCode::new("INTERNAL")).name(), "price_table");
//! assert_eq!(registry.resolve(&CourierCode::new("jne")).name(), "default");
//! ```

use crate::domain::value_objects::CourierCode;
use crate::infrastructure::providers::default::DefaultAdapter;
use crate::infrastructure::providers::traits::ProviderAdapter;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Courier code → provider adapter map with a fallback.
#[derive(Clone)]
pub struct ProviderRegistry {
    adapters: HashMap<CourierCode, Arc<dyn ProviderAdapter>>,
    fallback: Arc<dyn ProviderAdapter>,
}

impl ProviderRegistry {
    /// Creates an empty registry falling back to [`DefaultAdapter`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: Arc::new(DefaultAdapter::new()),
        }
    }

    /// Replaces the fallback adapter.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn ProviderAdapter>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Registers `adapter` for a courier code, replacing any previous one.
    pub fn register(
        &mut self,
        courier_code: impl Into<CourierCode>,
        adapter: Arc<dyn ProviderAdapter>,
    ) {
        self.adapters.insert(courier_code.into(), adapter);
    }

    /// Registers the same adapter for several courier codes.
    pub fn register_all<I, C>(&mut self, courier_codes: I, adapter: Arc<dyn ProviderAdapter>)
    where
        I: IntoIterator<Item = C>,
        C: Into<CourierCode>,
    {
        for code in courier_codes {
            self.register(code, Arc::clone(&adapter));
        }
    }

    /// Returns the adapter registered for `courier_code`, if any.
    #[must_use]
    pub fn get(&self, courier_code: &CourierCode) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(courier_code).cloned()
    }

    /// Returns the adapter for `courier_code`, or the fallback.
    #[must_use]
    pub fn resolve(&self, courier_code: &CourierCode) -> Arc<dyn ProviderAdapter> {
        self.get(courier_code)
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// Returns true if `courier_code` has a registered adapter.
    #[must_use]
    pub fn contains(&self, courier_code: &CourierCode) -> bool {
        self.adapters.contains_key(courier_code)
    }

    /// Number of registered couriers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut couriers: Vec<_> = self.adapters.keys().map(CourierCode::as_str).collect();
        couriers.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("couriers", &couriers)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::providers::price_table::{PriceTable, PriceTableAdapter};

    #[test]
    fn unregistered_courier_resolves_to_default() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(&CourierCode::new("jne")).name(), "default");
    }

    #[test]
    fn register_all_shares_adapter() {
        let mut registry = ProviderRegistry::new();
        registry.register_all(
            ["jne", "sicepat"],
            Arc::new(PriceTableAdapter::new(PriceTable::new())),
        );
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&CourierCode::new("SiCepat")));
        assert_eq!(
            registry.resolve(&CourierCode::new("jne")).name(),
            "price_table"
        );
    }
}
