use serde::{Deserialize, Serialize};

use super::card::Card;

/// One card in the user's collection.
///
/// A card can be wishlisted without being owned (`quantity == 0`).
/// Entries that are neither owned nor wishlisted are never kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub card: Card,
    pub quantity: u32,
    #[serde(default)]
    pub wishlisted: bool,
}

impl CollectionEntry {
    /// True when the entry carries no information and must be pruned.
    pub fn is_dead(&self) -> bool {
        self.quantity == 0 && !self.wishlisted
    }

    /// `quantity × market` or `None` when the card has no known price.
    pub fn value(&self) -> Option<f64> {
        self.card.market_price().map(|m| m * f64::from(self.quantity))
    }
}

/// The persisted collection document.
///
/// `total_value` is a cache of Σ(quantity × market price); it is rebuilt
/// from `entries` after every mutation and after loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default, alias = "cards")]
    pub entries: Vec<CollectionEntry>,
    #[serde(default)]
    pub total_value: f64,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, card_id: &str) -> Option<&CollectionEntry> {
        self.entries.iter().find(|e| e.card.id == card_id)
    }

    pub fn get_mut(&mut self, card_id: &str) -> Option<&mut CollectionEntry> {
        self.entries.iter_mut().find(|e| e.card.id == card_id)
    }

    /// Sum of known entry values. Cards without a price contribute nothing.
    pub fn compute_total_value(&self) -> f64 {
        self.entries.iter().filter_map(CollectionEntry::value).sum()
    }

    pub fn recompute_total_value(&mut self) {
        self.total_value = self.compute_total_value();
    }

    /// Drop dead entries and merge duplicates by card id (first entry wins,
    /// quantities summed). Used when hydrating a document written elsewhere.
    pub fn normalize(&mut self) {
        let mut merged: Vec<CollectionEntry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match merged.iter_mut().find(|e| e.card.id == entry.card.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                    existing.wishlisted |= entry.wishlisted;
                }
                None => merged.push(entry),
            }
        }
        merged.retain(|e| !e.is_dead());
        self.entries = merged;
        self.recompute_total_value();
    }

    pub fn stats(&self) -> CollectionStats {
        let owned = self.entries.iter().filter(|e| e.quantity > 0);
        let (total_cards, unique_cards) =
            owned.fold((0u64, 0usize), |(t, u), e| (t + u64::from(e.quantity), u + 1));
        CollectionStats {
            total_cards,
            unique_cards,
            wishlist_count: self.entries.iter().filter(|e| e.wishlisted).count(),
            total_value: self.total_value,
        }
    }

    pub fn view(&self, view: CollectionView) -> Vec<&CollectionEntry> {
        self.entries
            .iter()
            .filter(|e| match view {
                CollectionView::All => true,
                CollectionView::Owned => e.quantity > 0,
                CollectionView::Wishlist => e.wishlisted,
            })
            .collect()
    }
}

/// Summary numbers shown on the collection screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    /// Total owned copies.
    pub total_cards: u64,
    /// Distinct owned cards.
    pub unique_cards: usize,
    pub wishlist_count: usize,
    pub total_value: f64,
}

/// Which slice of the collection to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionView {
    #[default]
    All,
    Owned,
    Wishlist,
}
