use std::fmt::Write as _;
use tracing::debug;

use crate::models::card::{Card, CardType};
use crate::models::deck::{Deck, DeckCard, DeckUpdate, DeckValidation};
use crate::models::format::DeckFormat;

/// Deck-building rules for one format.
///
/// Pure business logic with no I/O. Mutators never fail loudly: a rule
/// violation leaves the deck untouched and is reported as `false`.
pub struct DeckService {
    format: DeckFormat,
}

impl DeckService {
    pub fn new(format: DeckFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &DeckFormat {
        &self.format
    }

    pub fn copy_limit(&self, card: &Card) -> u32 {
        self.format.copy_limit(&card.name)
    }

    /// Add one copy of `card` to the main deck.
    ///
    /// Rejected when the card is a Leader or Base (those go through
    /// [`set_leader`](Self::set_leader) / [`set_base`](Self::set_base)) or
    /// when the deck already holds the card's copy limit.
    pub fn add_card(&self, deck: &mut Deck, card: Card) -> bool {
        if card.card_type.is_deck_slot() {
            debug!(deck_id = %deck.id, card_id = %card.id, card_type = %card.card_type, "Rejected slot card in main deck");
            return false;
        }

        let current = deck.quantity_of(&card.id);
        let limit = self.copy_limit(&card);
        if current >= limit {
            debug!(deck_id = %deck.id, card_id = %card.id, limit, "Copy limit reached");
            return false;
        }

        match deck.cards.iter_mut().find(|dc| dc.card.id == card.id) {
            Some(dc) => dc.quantity += 1,
            None => deck.cards.push(DeckCard { card, quantity: 1 }),
        }
        deck.touch();
        true
    }

    /// Remove one copy; the last copy removes the card from the deck.
    pub fn remove_card(&self, deck: &mut Deck, card_id: &str) -> bool {
        let Some(idx) = deck.cards.iter().position(|dc| dc.card.id == card_id) else {
            return false;
        };
        if deck.cards[idx].quantity > 1 {
            deck.cards[idx].quantity -= 1;
        } else {
            deck.cards.remove(idx);
        }
        deck.touch();
        true
    }

    /// Replace the leader. Cards that are not Leaders are ignored.
    pub fn set_leader(&self, deck: &mut Deck, card: Card) -> bool {
        if card.card_type != CardType::Leader {
            return false;
        }
        deck.leader = Some(card);
        deck.touch();
        true
    }

    /// Replace the base. Cards that are not Bases are ignored.
    pub fn set_base(&self, deck: &mut Deck, card: Card) -> bool {
        if card.card_type != CardType::Base {
            return false;
        }
        deck.base = Some(card);
        deck.touch();
        true
    }

    /// Merge a partial update and refresh `updated_at`.
    ///
    /// A non-Leader leader or non-Base base is ignored. A replacement main
    /// deck goes through [`Deck::normalize`], so repeated card ids are
    /// merged and slot cards or empty entries are dropped.
    pub fn apply_update(&self, deck: &mut Deck, update: DeckUpdate) {
        if let Some(name) = update.name {
            deck.name = name;
        }
        if let Some(description) = update.description {
            deck.description = description;
        }
        if let Some(leader) = update.leader {
            match leader {
                Some(card) if card.card_type != CardType::Leader => {
                    debug!(deck_id = %deck.id, card_id = %card.id, "Ignored non-Leader leader update");
                }
                other => deck.leader = other,
            }
        }
        if let Some(base) = update.base {
            match base {
                Some(card) if card.card_type != CardType::Base => {
                    debug!(deck_id = %deck.id, card_id = %card.id, "Ignored non-Base base update");
                }
                other => deck.base = other,
            }
        }
        if let Some(cards) = update.cards {
            deck.cards = cards;
            if deck.normalize() {
                debug!(deck_id = %deck.id, "Normalized main deck from update");
            }
        }
        if let Some(is_public) = update.is_public {
            deck.is_public = is_public;
        }
        deck.touch();
    }

    /// Main-deck size (leader and base excluded).
    pub fn card_count(&self, deck: &Deck) -> u32 {
        deck.card_count()
    }

    /// Check the deck against the format.
    ///
    /// Error order is fixed: leader, base, minimum size, maximum size, then
    /// one entry per card over its copy limit in deck order.
    pub fn validate(&self, deck: &Deck) -> DeckValidation {
        let mut errors = Vec::new();
        let count = self.card_count(deck);

        if self.format.requires_leader && deck.leader.is_none() {
            errors.push("Deck requires a Leader".to_string());
        }
        if self.format.requires_base && deck.base.is_none() {
            errors.push("Deck requires a Base".to_string());
        }
        if count < self.format.min_cards {
            errors.push(format!(
                "Deck needs at least {} cards (currently {count})",
                self.format.min_cards
            ));
        }
        if count > self.format.max_cards {
            errors.push(format!(
                "Deck cannot exceed {} cards (currently {count})",
                self.format.max_cards
            ));
        }
        for dc in &deck.cards {
            let limit = self.copy_limit(&dc.card);
            if dc.quantity > limit {
                errors.push(format!(
                    "{} exceeds the copy limit of {limit} (currently {})",
                    dc.card.name, dc.quantity
                ));
            }
        }

        DeckValidation::from_errors(errors)
    }

    /// Private copy of `deck`, named `"{name} (Copy)"` unless a name is given.
    pub fn duplicate(&self, deck: &Deck, new_name: Option<&str>) -> Deck {
        let name = match new_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} (Copy)", deck.name),
        };
        deck.private_copy(name)
    }

    /// Plain-text deck list. The main deck is listed by ascending cost;
    /// cards of equal cost keep their deck order.
    pub fn export(&self, deck: &Deck) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", deck.name);
        if let Some(description) = deck.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "{description}");
        }
        out.push('\n');

        if let Some(leader) = &deck.leader {
            let _ = write!(out, "## Leader\n1x {}\n\n", leader.name);
        }
        if let Some(base) = &deck.base {
            let _ = write!(out, "## Base\n1x {}\n\n", base.name);
        }

        let _ = writeln!(out, "## Main Deck ({} cards)", self.card_count(deck));
        let mut main: Vec<&DeckCard> = deck.cards.iter().collect();
        main.sort_by_key(|dc| dc.card.cost);
        for dc in main {
            let _ = writeln!(out, "{}x {}", dc.quantity, dc.card.name);
        }

        out
    }
}

impl Default for DeckService {
    fn default() -> Self {
        Self::new(DeckFormat::default())
    }
}
