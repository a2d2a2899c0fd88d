use std::collections::HashMap;
use std::sync::Arc;

use super::hydrate;
use crate::models::card::{Card, PriceInfo};
use crate::models::collection::{Collection, CollectionEntry, CollectionStats, CollectionView};
use crate::services::collection_service::CollectionService;
use crate::storage::keys;
use crate::storage::traits::KeyValueStore;
use crate::storage::writer::SnapshotWriter;

/// The user's collection and wishlist, persisted under
/// [`keys::COLLECTION`].
///
/// Mutators never fail: unknown ids are ignored, and persistence errors
/// are logged by the writer without touching the in-memory state.
pub struct CollectionManager {
    collection: Collection,
    service: CollectionService,
    writer: SnapshotWriter,
}

impl CollectionManager {
    /// Hydrate from `store`. Must complete before any mutation is accepted,
    /// which the async constructor enforces.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut collection: Collection = hydrate(store.as_ref(), keys::COLLECTION).await;
        collection.normalize();
        Self {
            collection,
            service: CollectionService::new(),
            writer: SnapshotWriter::spawn(store, keys::COLLECTION),
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn total_value(&self) -> f64 {
        self.collection.total_value
    }

    pub fn add(&mut self, card: Card, quantity: u32) {
        if self.service.add(&mut self.collection, card, quantity) {
            self.persist();
        }
    }

    /// Remove `quantity` copies, or the whole entry when `quantity` is `None`.
    pub fn remove(&mut self, card_id: &str, quantity: Option<u32>) {
        if self.service.remove(&mut self.collection, card_id, quantity) {
            self.persist();
        }
    }

    pub fn set_quantity(&mut self, card_id: &str, quantity: i64) {
        if self.service.set_quantity(&mut self.collection, card_id, quantity) {
            self.persist();
        }
    }

    pub fn toggle_wishlist(&mut self, card: Card) {
        if self.service.toggle_wishlist(&mut self.collection, card) {
            self.persist();
        }
    }

    pub fn is_owned(&self, card_id: &str) -> bool {
        self.quantity_of(card_id) > 0
    }

    pub fn is_wishlisted(&self, card_id: &str) -> bool {
        self.collection.get(card_id).is_some_and(|e| e.wishlisted)
    }

    pub fn quantity_of(&self, card_id: &str) -> u32 {
        self.collection.get(card_id).map(|e| e.quantity).unwrap_or(0)
    }

    pub fn clear(&mut self) {
        if self.service.clear(&mut self.collection) {
            self.persist();
        }
    }

    pub fn entries(&self, view: CollectionView) -> Vec<&CollectionEntry> {
        self.collection.view(view)
    }

    pub fn stats(&self) -> CollectionStats {
        self.collection.stats()
    }

    /// Ids of every card in the collection, for a bulk price lookup.
    pub fn card_ids(&self) -> Vec<String> {
        self.collection.entries.iter().map(|e| e.card.id.clone()).collect()
    }

    /// Attach fresh prices and recompute the total value. Returns how many
    /// entries were updated.
    pub fn apply_prices(&mut self, prices: &HashMap<String, PriceInfo>) -> usize {
        let updated = self.service.apply_prices(&mut self.collection, prices);
        if updated > 0 {
            self.persist();
        }
        updated
    }

    /// Wait for every scheduled snapshot to reach the store.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    fn persist(&self) {
        self.writer.schedule(&self.collection);
    }
}
