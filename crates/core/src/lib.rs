pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod state;
pub mod storage;

use std::sync::Arc;
use tracing::info;

use config::CompanionConfig;
use models::card::Card;
use models::filters::Page;
use providers::registry::CatalogRegistry;
use services::catalog_service::CatalogService;
use state::{collection::CollectionManager, decks::DeckManager, filters::FilterState};
use storage::{file::FileStore, memory::MemoryStore, traits::KeyValueStore};

/// Main entry point for the companion core library.
///
/// Built once at start-up and handed to the UI by reference. Owns the
/// collection, the decks, the browse filters and the catalog client.
#[must_use]
pub struct Companion {
    collection: CollectionManager,
    decks: DeckManager,
    filters: FilterState,
    catalog: CatalogService,
}

impl std::fmt::Debug for Companion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Companion")
            .field("collection_entries", &self.collection.collection().entries.len())
            .field("decks", &self.decks.decks().len())
            .field("filters", self.filters.filters())
            .field("providers", &self.catalog.provider_names())
            .finish()
    }
}

impl Companion {
    /// Open the store named by `config`, hydrate the collection and decks,
    /// and register the default catalog providers.
    pub async fn open(config: CompanionConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        };
        let registry = CatalogRegistry::new_with_defaults(&config);
        Self::with_parts(&config, store, registry).await
    }

    /// Assemble from an explicit store and catalog registry.
    pub async fn with_parts(
        config: &CompanionConfig,
        store: Arc<dyn KeyValueStore>,
        registry: CatalogRegistry,
    ) -> Self {
        let collection = CollectionManager::load(Arc::clone(&store)).await;
        let decks = DeckManager::load(store, config.deck_format.clone()).await;
        let catalog = CatalogService::new(registry);
        info!(
            entries = collection.collection().entries.len(),
            decks = decks.decks().len(),
            providers = ?catalog.provider_names(),
            "Companion ready"
        );
        Self {
            collection,
            decks,
            filters: FilterState::new(),
            catalog,
        }
    }

    // ── State accessors ─────────────────────────────────────────────

    pub fn collection(&self) -> &CollectionManager {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut CollectionManager {
        &mut self.collection
    }

    pub fn decks(&self) -> &DeckManager {
        &self.decks
    }

    pub fn decks_mut(&mut self) -> &mut DeckManager {
        &mut self.decks
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    // ── Catalog conveniences ────────────────────────────────────────

    /// Search the catalog with the current browse filters.
    pub async fn search_cards(&self, page: u32, page_size: u32) -> Page<Card> {
        self.catalog
            .search(self.filters.filters(), page, page_size)
            .await
    }

    /// Fetch current market prices for every collection entry and recompute
    /// the collection value. Returns the number of entries repriced.
    pub async fn refresh_collection_prices(&mut self) -> usize {
        let ids = self.collection.card_ids();
        if ids.is_empty() {
            return 0;
        }
        let prices = self.catalog.get_prices(&ids).await;
        let updated = self.collection.apply_prices(&prices);
        info!(requested = ids.len(), updated, "Collection prices refreshed");
        updated
    }

    /// Wait until both namespaces have written their latest snapshot.
    pub async fn flush(&self) {
        self.collection.flush().await;
        self.decks.flush().await;
    }
}
