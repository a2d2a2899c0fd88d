use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::hydrate;
use crate::models::card::Card;
use crate::models::deck::{Deck, DeckStats, DeckUpdate, DeckValidation};
use crate::models::format::DeckFormat;
use crate::services::deck_service::DeckService;
use crate::storage::keys;
use crate::storage::traits::KeyValueStore;
use crate::storage::writer::SnapshotWriter;

/// The user's decks, persisted as one JSON array under [`keys::DECKS`],
/// plus the id of the deck currently open in the editor (not persisted).
pub struct DeckManager {
    decks: Vec<Deck>,
    current_deck_id: Option<String>,
    service: DeckService,
    writer: SnapshotWriter,
}

impl DeckManager {
    /// Hydrate from `store`. Records that no longer parse as a [`Deck`] are
    /// skipped individually so one bad deck does not cost the others; the
    /// rest go through [`Deck::normalize`].
    pub async fn load(store: Arc<dyn KeyValueStore>, format: DeckFormat) -> Self {
        let raw: Vec<Value> = hydrate(store.as_ref(), keys::DECKS).await;
        let decks = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Deck>(value) {
                Ok(mut deck) => {
                    if deck.normalize() {
                        warn!(deck_id = %deck.id, "Repaired stored deck contents");
                    }
                    Some(deck)
                }
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable stored deck");
                    None
                }
            })
            .collect();

        Self {
            decks,
            current_deck_id: None,
            service: DeckService::new(format),
            writer: SnapshotWriter::spawn(store, keys::DECKS),
        }
    }

    pub fn format(&self) -> &DeckFormat {
        self.service.format()
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn get(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    /// New empty private deck. The name is taken as given.
    pub fn create(&mut self, name: &str, description: Option<String>) -> Deck {
        let deck = Deck::new(name, description);
        debug!(deck_id = %deck.id, "Deck created");
        self.decks.push(deck.clone());
        self.persist();
        deck
    }

    /// Remove a deck, closing it first if it is the current one.
    pub fn delete(&mut self, deck_id: &str) {
        let before = self.decks.len();
        self.decks.retain(|d| d.id != deck_id);
        if self.decks.len() == before {
            return;
        }
        if self.current_deck_id.as_deref() == Some(deck_id) {
            self.current_deck_id = None;
        }
        self.persist();
    }

    pub fn update(&mut self, deck_id: &str, update: DeckUpdate) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        self.service.apply_update(deck, update);
        self.persist();
    }

    pub fn set_current_deck(&mut self, deck_id: Option<&str>) {
        self.current_deck_id = deck_id.map(str::to_string);
    }

    /// The open deck, or `None` if none is open or it no longer exists.
    pub fn current_deck(&self) -> Option<&Deck> {
        self.current_deck_id.as_deref().and_then(|id| self.get(id))
    }

    /// Add one copy of a main-deck card. See [`DeckService::add_card`].
    pub fn add_card(&mut self, deck_id: &str, card: Card) -> bool {
        self.mutate(deck_id, |service, deck| service.add_card(deck, card))
    }

    pub fn remove_card(&mut self, deck_id: &str, card_id: &str) {
        self.mutate(deck_id, |service, deck| service.remove_card(deck, card_id));
    }

    pub fn set_leader(&mut self, deck_id: &str, card: Card) {
        self.mutate(deck_id, |service, deck| service.set_leader(deck, card));
    }

    pub fn set_base(&mut self, deck_id: &str, card: Card) {
        self.mutate(deck_id, |service, deck| service.set_base(deck, card));
    }

    pub fn card_count(&self, deck: &Deck) -> u32 {
        self.service.card_count(deck)
    }

    pub fn validate(&self, deck: &Deck) -> DeckValidation {
        self.service.validate(deck)
    }

    pub fn stats(&self, deck: &Deck) -> DeckStats {
        deck.stats()
    }

    pub fn export(&self, deck: &Deck) -> String {
        self.service.export(deck)
    }

    /// Copy an existing deck into a new private deck, appended to the list.
    pub fn duplicate(&mut self, deck_id: &str, new_name: Option<&str>) -> Option<Deck> {
        let copy = self.service.duplicate(self.get(deck_id)?, new_name);
        self.decks.push(copy.clone());
        self.persist();
        Some(copy)
    }

    /// Save a community deck locally as a private deck under its own name.
    pub fn import_deck(&mut self, deck: &Deck) -> Deck {
        let mut copy = deck.private_copy(deck.name.clone());
        copy.normalize();
        debug!(source_id = %deck.id, deck_id = %copy.id, "Deck imported");
        self.decks.push(copy.clone());
        self.persist();
        copy
    }

    /// Wait for every scheduled snapshot to reach the store.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Apply a rule-checked mutation and persist it if it took effect.
    fn mutate<F>(&mut self, deck_id: &str, f: F) -> bool
    where
        F: FnOnce(&DeckService, &mut Deck) -> bool,
    {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return false;
        };
        let changed = f(&self.service, deck);
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        self.writer.schedule(&self.decks);
    }
}
