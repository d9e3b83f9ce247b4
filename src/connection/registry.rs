//! Connector registration and lookup.
//!
//! The ORM layer registers the connectors its application links in;
//! resolving a connection URL then looks the scheme up here. A missing
//! connector is reported to the caller instead of aborting the process,
//! so startup code can decide how to surface it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{ConnectionError, ConnectionResult};

/// A datasource backend, registered under its canonical name.
pub trait Connector: Send + Sync {
    /// Canonical name used as the connection URL scheme.
    fn name(&self) -> &str;
}

/// Registry of available connectors, keyed by name.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: HashMap<String, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under its canonical name, replacing any
    /// previous registration of that name.
    pub fn register(&mut self, connector: Arc<dyn Connector>) {
        let name = connector.name().to_string();
        debug!(connector = %name, "registering connector");
        self.connectors.insert(name, connector);
    }

    /// Look up a connector by name.
    pub fn get(&self, name: &str) -> ConnectionResult<Arc<dyn Connector>> {
        self.connectors
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectionError::ConnectorNotRegistered(name.to_string()))
    }

    /// Whether a connector is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.connectors.contains_key(name)
    }

    /// Registered connector names.
    pub fn names(&self) -> Vec<&str> {
        self.connectors.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeConnector(&'static str);

    impl Connector for FakeConnector {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ConnectorRegistry::new();
        registry.register(Arc::new(FakeConnector("memory")));
        assert!(registry.contains("memory"));
        assert_eq!(registry.get("memory").unwrap().name(), "memory");
    }

    #[test]
    fn test_missing_connector_is_an_error() {
        let registry = ConnectorRegistry::new();
        let err = registry.get("mysql").err().unwrap();
        let message = err.to_string();
        assert!(message.contains("mysql"));
        assert!(message.contains("register"));
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = ConnectorRegistry::new();
        registry.register(Arc::new(FakeConnector("memory")));
        registry.register(Arc::new(FakeConnector("memory")));
        assert_eq!(registry.names(), vec!["memory"]);
    }
}
