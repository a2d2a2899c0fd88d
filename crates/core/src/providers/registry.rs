use std::time::Duration;

use crate::config::CompanionConfig;

use super::mock::MockCatalog;
use super::swudb::SwudbProvider;
use super::traits::CardCatalog;

/// Ordered list of catalog providers.
///
/// Earlier registrations have priority; `CatalogService` falls back to the
/// next provider when one fails.
pub struct CatalogRegistry {
    providers: Vec<Box<dyn CardCatalog>>,
}

impl CatalogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// SWUDB first (unless offline), then the bundled dataset as last resort.
    pub fn new_with_defaults(config: &CompanionConfig) -> Self {
        let mut registry = Self::new();

        if !config.offline {
            registry.register(Box::new(SwudbProvider::new(
                &config.api_base_url,
                &config.image_base_url,
                Duration::from_secs(config.request_timeout_secs),
            )));
        }

        registry.register(Box::new(MockCatalog::new()));
        registry
    }

    /// Register a provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn CardCatalog>) {
        self.providers.push(provider);
    }

    /// All providers in priority order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn CardCatalog> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::new()
    }
}
