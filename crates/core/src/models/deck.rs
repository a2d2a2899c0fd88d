use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::card::{ArenaType, Aspect, Card, CardType};

/// Highest cost bucket in the cost curve; anything more expensive is folded
/// into it.
pub const COST_CURVE_CAP: u32 = 7;

/// A main-deck card and how many copies of it are in the deck (always ≥ 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    pub card: Card,
    pub quantity: u32,
}

/// A user deck (or a community deck fetched from the catalog).
///
/// Legality is not stored: it is recomputed from the contents
/// whenever asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub leader: Option<Card>,
    #[serde(default)]
    pub base: Option<Card>,
    #[serde(default)]
    pub cards: Vec<DeckCard>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,

    // ── Community metadata ──────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_swudb_deck: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_url: Option<String>,
}

impl Deck {
    /// Fresh private deck with no cards, stamped with the current time.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Self::generate_id(),
            name: name.into(),
            description,
            leader: None,
            base: None,
            cards: Vec::new(),
            created_at: now,
            updated_at: now,
            is_public: false,
            author: None,
            likes: None,
            views: None,
            leader_image_url: None,
            base_image_url: None,
            is_swudb_deck: None,
            editable: None,
            deck_url: None,
        }
    }

    pub fn generate_id() -> String {
        format!("deck_{}", Uuid::new_v4().simple())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Copies of `card_id` in the main deck (0 if absent).
    pub fn quantity_of(&self, card_id: &str) -> u32 {
        self.cards
            .iter()
            .find(|dc| dc.card.id == card_id)
            .map(|dc| dc.quantity)
            .unwrap_or(0)
    }

    /// Main-deck size. Leader and base are not counted. Saturates at
    /// `u32::MAX`.
    pub fn card_count(&self) -> u32 {
        self.cards
            .iter()
            .fold(0u32, |n, dc| n.saturating_add(dc.quantity))
    }

    /// Bring contents that bypassed the rule-checked mutators (a stored
    /// document, a bulk update, a community deck) back in line with the
    /// deck invariants:
    ///
    /// - one entry per card id, later entries merged into the first;
    /// - no zero-quantity or Leader/Base entries in the main deck;
    /// - `leader` holds a Leader and `base` holds a Base, otherwise cleared.
    ///
    /// Copy limits are left to validation. Returns `true` if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self
            .leader
            .as_ref()
            .is_some_and(|c| c.card_type != CardType::Leader)
        {
            self.leader = None;
            changed = true;
        }
        if self
            .base
            .as_ref()
            .is_some_and(|c| c.card_type != CardType::Base)
        {
            self.base = None;
            changed = true;
        }

        let mut merged: Vec<DeckCard> = Vec::with_capacity(self.cards.len());
        for dc in std::mem::take(&mut self.cards) {
            if dc.quantity == 0 || dc.card.card_type.is_deck_slot() {
                changed = true;
                continue;
            }
            match merged.iter_mut().find(|m| m.card.id == dc.card.id) {
                Some(first) => {
                    first.quantity = first.quantity.saturating_add(dc.quantity);
                    changed = true;
                }
                None => merged.push(dc),
            }
        }
        self.cards = merged;
        changed
    }

    /// Private copy with a new identity and no community metadata.
    pub fn private_copy(&self, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Self::generate_id(),
            name: name.into(),
            description: self.description.clone(),
            leader: self.leader.clone(),
            base: self.base.clone(),
            cards: self.cards.clone(),
            created_at: now,
            updated_at: now,
            is_public: false,
            author: None,
            likes: None,
            views: None,
            leader_image_url: self.leader_image_url.clone(),
            base_image_url: self.base_image_url.clone(),
            is_swudb_deck: None,
            editable: None,
            deck_url: None,
        }
    }

    pub fn stats(&self) -> DeckStats {
        let mut stats = DeckStats::default();
        fn bump(slot: &mut u32, n: u32) {
            *slot = slot.saturating_add(n);
        }

        for dc in &self.cards {
            let n = dc.quantity;
            bump(stats.by_type.entry(dc.card.card_type).or_insert(0), n);
            bump(
                stats
                    .cost_curve
                    .entry(dc.card.cost.min(COST_CURVE_CAP))
                    .or_insert(0),
                n,
            );
            for aspect in &dc.card.aspects {
                bump(stats.by_aspect.entry(*aspect).or_insert(0), n);
            }
            match dc.card.arena_type {
                Some(ArenaType::Ground) => bump(&mut stats.ground_units, n),
                Some(ArenaType::Space) => bump(&mut stats.space_units, n),
                None => {}
            }
        }
        stats.total_cards = self.card_count();
        stats
    }
}

/// Partial update for [`Deck`]. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub leader: Option<Option<Card>>,
    #[serde(default)]
    pub base: Option<Option<Card>>,
    #[serde(default)]
    pub cards: Option<Vec<DeckCard>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl DeckUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of checking a deck against a format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl DeckValidation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Derived composition figures for the deck editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: u32,
    pub by_type: BTreeMap<CardType, u32>,
    /// Cost → copies, with costs above [`COST_CURVE_CAP`] folded into the cap.
    pub cost_curve: BTreeMap<u32, u32>,
    pub by_aspect: BTreeMap<Aspect, u32>,
    pub ground_units: u32,
    pub space_units: u32,
}
