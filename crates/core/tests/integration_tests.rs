use std::sync::Arc;

use swudb_companion_core::config::CompanionConfig;
use swudb_companion_core::models::card::{Aspect, Card, CardType, PriceInfo, Rarity};
use swudb_companion_core::models::collection::CollectionView;
use swudb_companion_core::models::filters::{CardFilters, SortOption};
use swudb_companion_core::providers::mock::MockCatalog;
use swudb_companion_core::providers::registry::CatalogRegistry;
use swudb_companion_core::storage::keys;
use swudb_companion_core::storage::memory::MemoryStore;
use swudb_companion_core::Companion;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn offline() -> Companion {
    init_tracing();
    Companion::open(CompanionConfig::offline()).await
}

async fn with_memory_store() -> (Companion, Arc<MemoryStore>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let mut registry = CatalogRegistry::new();
    registry.register(Box::new(MockCatalog::new()));
    let companion =
        Companion::with_parts(&CompanionConfig::offline(), store.clone(), registry).await;
    (companion, store)
}

fn unit(id: &str, name: &str, cost: u32) -> Card {
    Card::new(id, name, CardType::Unit, Rarity::Common).with_cost(cost)
}

// ═══════════════════════════════════════════════════════════════════
// Full Workflow
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn browse_collect_and_build() {
    let (mut app, store) = with_memory_store().await;

    // Browse leaders from the catalog.
    app.filters_mut().toggle_type(CardType::Leader);
    let leaders = app.search_cards(1, 10).await;
    assert_eq!(leaders.total_items, 3);

    let luke = app.catalog().get_card("SOR_005").await.unwrap();
    let base = app.catalog().get_card("SOR_023").await.unwrap();
    let pathfinder = app.catalog().get_card("SOR_060").await.unwrap();

    // Track it in the collection.
    app.collection_mut().add(luke.clone(), 1);
    app.collection_mut().add(pathfinder.clone(), 3);
    assert_eq!(app.collection().total_value(), 45.99 + 0.25 * 3.0);

    // Build a deck around it.
    let deck = app.decks_mut().create("Luke Aggro", None);
    app.decks_mut().set_current_deck(Some(deck.id.as_str()));
    app.decks_mut().set_leader(&deck.id, luke);
    app.decks_mut().set_base(&deck.id, base);
    for _ in 0..4 {
        app.decks_mut().add_card(&deck.id, pathfinder.clone());
    }

    let current = app.decks().current_deck().unwrap();
    assert_eq!(app.decks().card_count(current), 3);
    let validation = app.decks().validate(current);
    assert_eq!(
        validation.errors,
        vec!["Deck needs at least 50 cards (currently 3)".to_string()]
    );

    let export = app.decks().export(current);
    assert!(export.starts_with("# Luke Aggro\n"));
    assert!(export.contains("## Leader\n1x Luke Skywalker\n"));
    assert!(export.contains("## Main Deck (3 cards)\n3x Rebel Pathfinder\n"));

    app.flush().await;
    assert!(store.get(keys::COLLECTION).is_some());
    assert_eq!(store.get(keys::DECKS).unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn concrete_collection_scenario() {
    let mut app = offline().await;
    let card_a = unit("CARD_A", "Card A", 1);

    app.collection_mut().add(card_a, 2);
    app.collection_mut().remove("CARD_A", Some(1));

    assert_eq!(app.collection().quantity_of("CARD_A"), 1);
    assert!(app.collection().is_owned("CARD_A"));
}

#[tokio::test]
async fn concrete_deck_scenario() {
    let mut app = offline().await;
    let deck = app.decks_mut().create("Test", None);
    let unit_x = unit("UNIT_X", "UnitX", 2);

    for _ in 0..3 {
        assert!(app.decks_mut().add_card(&deck.id, unit_x.clone()));
    }
    assert!(!app.decks_mut().add_card(&deck.id, unit_x));
    assert_eq!(app.decks().get(&deck.id).unwrap().quantity_of("UNIT_X"), 3);
}

// ═══════════════════════════════════════════════════════════════════
// Persistence Across Sessions
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn data_dir_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = CompanionConfig::offline().with_data_dir(dir.path());

    let deck_id = {
        let mut app = Companion::open(config.clone()).await;
        app.collection_mut()
            .add(unit("A_001", "A", 1).with_price(PriceInfo::market(2.0)), 2);
        app.collection_mut().toggle_wishlist(unit("A_002", "B", 1));
        let deck = app.decks_mut().create("Kept", Some("across restarts".into()));
        app.decks_mut().add_card(&deck.id, unit("A_001", "A", 1));
        app.flush().await;
        deck.id
    };

    let app = Companion::open(config).await;
    assert_eq!(app.collection().quantity_of("A_001"), 2);
    assert!(app.collection().is_wishlisted("A_002"));
    assert_eq!(app.collection().total_value(), 4.0);

    let deck = app.decks().get(&deck_id).unwrap();
    assert_eq!(deck.description.as_deref(), Some("across restarts"));
    assert_eq!(deck.quantity_of("A_001"), 1);
}

#[tokio::test]
async fn failing_store_never_blocks_the_app() {
    let (mut app, store) = with_memory_store().await;
    store.set_failing(true);

    app.collection_mut().add(unit("A_001", "A", 1), 5);
    let deck = app.decks_mut().create("Unsaved", None);
    app.flush().await;

    assert_eq!(app.collection().quantity_of("A_001"), 5);
    assert!(app.decks().get(&deck.id).is_some());
    assert_eq!(store.write_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════
// Catalog Conveniences
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn filters_drive_search() {
    let mut app = offline().await;
    assert!(!app.filters().has_active_filters());

    app.filters_mut().update(|f| {
        f.aspects = vec![Aspect::Villainy];
        f.sort_by = SortOption::Cost;
    });
    let page = app.search_cards(1, 20).await;
    assert!(!page.items.is_empty());
    assert!(page
        .items
        .iter()
        .all(|c| c.aspects.contains(&Aspect::Villainy)));

    app.filters_mut().reset();
    assert_eq!(app.filters().filters(), &CardFilters::default());
    assert_eq!(app.search_cards(1, 100).await.total_items, 12);
}

#[tokio::test]
async fn filter_toggles() {
    let mut app = offline().await;
    app.filters_mut().toggle_set("SOR");
    app.filters_mut().toggle_rarity(Rarity::Legendary);
    app.filters_mut().toggle_aspect(Aspect::Heroism);
    assert!(app.filters().has_active_filters());

    let names: Vec<String> = app
        .search_cards(1, 20)
        .await
        .items
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Luke Skywalker", "Millennium Falcon"]);

    app.filters_mut().toggle_set("SOR");
    app.filters_mut().toggle_rarity(Rarity::Legendary);
    app.filters_mut().toggle_aspect(Aspect::Heroism);
    assert!(!app.filters().has_active_filters());
}

#[tokio::test]
async fn refresh_prices_updates_collection_value() {
    let mut app = offline().await;
    // Stored without a price; the offline catalog knows SOR_010 at 52.50.
    app.collection_mut()
        .add(Card::new("SOR_010", "Darth Vader", CardType::Leader, Rarity::Legendary), 2);
    app.collection_mut().add(unit("ZZZ_001", "Unknown", 1), 1);
    assert_eq!(app.collection().total_value(), 0.0);

    assert_eq!(app.refresh_collection_prices().await, 1);
    assert_eq!(app.collection().total_value(), 105.0);
    assert_eq!(app.collection().stats().total_value, 105.0);
}

#[tokio::test]
async fn refresh_prices_on_empty_collection() {
    let mut app = offline().await;
    assert_eq!(app.refresh_collection_prices().await, 0);
}

#[tokio::test]
async fn import_hot_deck() {
    let mut app = offline().await;
    let hot = app.catalog().get_hot_decks(1, 10).await;
    let community = hot.items.first().unwrap().clone();

    let local = app.decks_mut().import_deck(&community);
    assert_eq!(local.name, community.name);
    assert!(!local.is_public);
    assert!(local.likes.is_none());
    assert_eq!(app.decks().decks().len(), 1);
}

#[tokio::test]
async fn wishlist_view_through_facade() {
    let mut app = offline().await;
    app.collection_mut().toggle_wishlist(unit("A_001", "A", 1));
    app.collection_mut().add(unit("A_002", "B", 1), 1);

    assert_eq!(app.collection().entries(CollectionView::Wishlist).len(), 1);
    assert_eq!(app.collection().entries(CollectionView::Owned).len(), 1);
    assert_eq!(app.collection().entries(CollectionView::All).len(), 2);
}

#[tokio::test]
async fn debug_output_summarizes_state() {
    let app = offline().await;
    let debug = format!("{:?}", app);
    assert!(debug.contains("Companion"));
    assert!(debug.contains("Offline"));
}
