// ═══════════════════════════════════════════════════════════════════
// Collection Tests — CollectionService rules, CollectionManager
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;
use std::sync::Arc;

use swudb_companion_core::models::card::{Card, CardType, PriceInfo, Rarity};
use swudb_companion_core::models::collection::{Collection, CollectionView};
use swudb_companion_core::services::collection_service::CollectionService;
use swudb_companion_core::state::collection::CollectionManager;
use swudb_companion_core::storage::keys;
use swudb_companion_core::storage::memory::MemoryStore;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn priced(id: &str, market: f64) -> Card {
    Card::new(id, id, CardType::Unit, Rarity::Common).with_price(PriceInfo::market(market))
}

fn unpriced(id: &str) -> Card {
    Card::new(id, id, CardType::Unit, Rarity::Common)
}

fn expected_total(collection: &Collection) -> f64 {
    collection
        .entries
        .iter()
        .filter_map(|e| e.card.market_price().map(|m| m * f64::from(e.quantity)))
        .sum()
}

async fn manager() -> (CollectionManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let manager = CollectionManager::load(store.clone()).await;
    (manager, store)
}

// ═══════════════════════════════════════════════════════════════════
// CollectionService
// ═══════════════════════════════════════════════════════════════════

mod service_add_remove {
    use super::*;

    #[test]
    fn add_creates_unwishlisted_entry() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 2.0), 2);

        let entry = collection.get("A_001").unwrap();
        assert_eq!(entry.quantity, 2);
        assert!(!entry.wishlisted);
        assert_eq!(collection.total_value, 4.0);
    }

    #[test]
    fn add_increments_existing_entry() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 1);
        svc.add(&mut collection, priced("A_001", 1.0), 4);

        assert_eq!(collection.entries.len(), 1);
        assert_eq!(collection.get("A_001").unwrap().quantity, 5);
    }

    #[test]
    fn add_zero_of_unknown_card_leaves_nothing() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, unpriced("A_001"), 0);
        assert!(collection.entries.is_empty());
    }

    #[test]
    fn remove_with_quantity_floors_at_zero_and_prunes() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 2);
        svc.remove(&mut collection, "A_001", Some(5));
        assert!(collection.get("A_001").is_none());
        assert_eq!(collection.total_value, 0.0);
    }

    #[test]
    fn remove_with_quantity_keeps_wishlisted_entry() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 1);
        svc.toggle_wishlist(&mut collection, priced("A_001", 1.0));
        svc.remove(&mut collection, "A_001", Some(1));

        let entry = collection.get("A_001").unwrap();
        assert_eq!(entry.quantity, 0);
        assert!(entry.wishlisted);
    }

    #[test]
    fn remove_without_quantity_drops_wishlisted_entry() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 3);
        svc.toggle_wishlist(&mut collection, priced("A_001", 1.0));
        svc.remove(&mut collection, "A_001", None);
        assert!(collection.get("A_001").is_none());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 1);
        assert!(!svc.remove(&mut collection, "nope", None));
        assert_eq!(collection.entries.len(), 1);
    }
}

mod service_set_quantity {
    use super::*;

    #[test]
    fn overwrites_existing() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 0.5), 1);
        assert!(svc.set_quantity(&mut collection, "A_001", 8));
        assert_eq!(collection.get("A_001").unwrap().quantity, 8);
        assert_eq!(collection.total_value, 4.0);
    }

    #[test]
    fn does_not_create_entries() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        assert!(!svc.set_quantity(&mut collection, "A_001", 3));
        assert!(collection.entries.is_empty());
    }

    #[test]
    fn zero_and_negative_remove_entirely() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 2);
        svc.toggle_wishlist(&mut collection, priced("A_001", 1.0));
        svc.add(&mut collection, priced("A_002", 1.0), 2);

        svc.set_quantity(&mut collection, "A_001", 0);
        svc.set_quantity(&mut collection, "A_002", -4);
        assert!(collection.entries.is_empty());
    }
}

mod service_wishlist {
    use super::*;

    #[test]
    fn toggle_on_absent_creates_wishlist_only_entry() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.toggle_wishlist(&mut collection, priced("A_001", 10.0));

        let entry = collection.get("A_001").unwrap();
        assert_eq!(entry.quantity, 0);
        assert!(entry.wishlisted);
        assert_eq!(collection.total_value, 0.0);
    }

    #[test]
    fn double_toggle_restores_flag_on_owned_card() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 1);

        svc.toggle_wishlist(&mut collection, priced("A_001", 1.0));
        svc.toggle_wishlist(&mut collection, priced("A_001", 1.0));

        let entry = collection.get("A_001").unwrap();
        assert!(!entry.wishlisted);
        assert_eq!(entry.quantity, 1);
    }

    #[test]
    fn double_toggle_on_absent_card_leaves_it_absent() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.toggle_wishlist(&mut collection, unpriced("A_001"));
        svc.toggle_wishlist(&mut collection, unpriced("A_001"));
        assert!(collection.get("A_001").is_none());
    }
}

mod service_value {
    use super::*;

    #[test]
    fn total_value_tracks_every_step() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();

        svc.add(&mut collection, priced("A_001", 1.25), 3);
        assert_eq!(collection.total_value, expected_total(&collection));
        svc.add(&mut collection, unpriced("A_002"), 10);
        assert_eq!(collection.total_value, expected_total(&collection));
        svc.add(&mut collection, priced("A_003", 0.1), 7);
        assert_eq!(collection.total_value, expected_total(&collection));
        svc.remove(&mut collection, "A_001", Some(2));
        assert_eq!(collection.total_value, expected_total(&collection));
        svc.remove(&mut collection, "A_003", None);
        assert_eq!(collection.total_value, expected_total(&collection));
        assert_eq!(collection.total_value, 1.25);
    }

    #[test]
    fn apply_prices_updates_matching_entries() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, unpriced("A_001"), 2);
        svc.add(&mut collection, priced("A_002", 1.0), 1);

        let mut prices = HashMap::new();
        prices.insert("A_001".to_string(), PriceInfo::market(3.0));
        prices.insert("Z_999".to_string(), PriceInfo::market(100.0));

        assert_eq!(svc.apply_prices(&mut collection, &prices), 1);
        assert_eq!(collection.total_value, 7.0);
    }

    #[test]
    fn clear_resets_value() {
        let svc = CollectionService::new();
        let mut collection = Collection::new();
        svc.add(&mut collection, priced("A_001", 1.0), 2);
        assert!(svc.clear(&mut collection));
        assert!(collection.entries.is_empty());
        assert_eq!(collection.total_value, 0.0);
        assert!(!svc.clear(&mut collection));
    }
}

// ═══════════════════════════════════════════════════════════════════
// CollectionManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[tokio::test]
    async fn add_then_partial_remove() {
        let (mut mgr, _store) = manager().await;
        mgr.add(unpriced("CARD_A"), 2);
        mgr.remove("CARD_A", Some(1));

        assert_eq!(mgr.quantity_of("CARD_A"), 1);
        assert!(mgr.is_owned("CARD_A"));
    }

    #[tokio::test]
    async fn set_quantity_zero_and_remove_both_disown() {
        let (mut mgr, _store) = manager().await;
        mgr.add(unpriced("A"), 2);
        mgr.add(unpriced("B"), 2);

        mgr.set_quantity("A", 0);
        mgr.remove("B", None);

        for id in ["A", "B"] {
            assert_eq!(mgr.quantity_of(id), 0);
            assert!(!mgr.is_owned(id));
        }
    }

    #[tokio::test]
    async fn wishlist_queries() {
        let (mut mgr, _store) = manager().await;
        mgr.toggle_wishlist(unpriced("A"));
        assert!(mgr.is_wishlisted("A"));
        assert!(!mgr.is_owned("A"));
        assert_eq!(mgr.entries(CollectionView::Wishlist).len(), 1);
        assert_eq!(mgr.entries(CollectionView::Owned).len(), 0);
        assert_eq!(mgr.stats().wishlist_count, 1);
    }

    #[tokio::test]
    async fn mutations_persist_full_snapshot() {
        let (mut mgr, store) = manager().await;
        mgr.add(priced("A", 2.0), 1);
        mgr.add(priced("B", 1.0), 3);
        mgr.flush().await;

        let doc = store.get(keys::COLLECTION).unwrap();
        assert_eq!(doc["entries"].as_array().unwrap().len(), 2);
        assert_eq!(doc["totalValue"], 5.0);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn last_snapshot_wins() {
        let (mut mgr, store) = manager().await;
        for _ in 0..20 {
            mgr.add(unpriced("A"), 1);
        }
        mgr.remove("A", Some(5));
        mgr.flush().await;

        let doc = store.get(keys::COLLECTION).unwrap();
        assert_eq!(doc["entries"][0]["quantity"], 15);
    }

    #[tokio::test]
    async fn noop_mutation_does_not_write() {
        let (mut mgr, store) = manager().await;
        mgr.remove("missing", None);
        mgr.set_quantity("missing", 4);
        mgr.flush().await;
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn apply_prices_recomputes_total() {
        let (mut mgr, _store) = manager().await;
        mgr.add(unpriced("A"), 4);
        assert_eq!(mgr.total_value(), 0.0);

        let prices = HashMap::from([("A".to_string(), PriceInfo::market(0.5))]);
        assert_eq!(mgr.apply_prices(&prices), 1);
        assert_eq!(mgr.total_value(), 2.0);
        assert_eq!(mgr.card_ids(), vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn clear_empties_collection() {
        let (mut mgr, store) = manager().await;
        mgr.add(priced("A", 1.0), 1);
        mgr.clear();
        mgr.flush().await;

        assert!(mgr.collection().entries.is_empty());
        assert_eq!(mgr.total_value(), 0.0);
        assert_eq!(store.get(keys::COLLECTION).unwrap()["entries"], serde_json::json!([]));
    }
}
