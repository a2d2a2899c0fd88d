use std::collections::HashMap;

use crate::models::card::{Card, PriceInfo};
use crate::models::collection::{Collection, CollectionEntry};

/// Collection bookkeeping: owned quantities, wishlist flags, total value.
///
/// Pure business logic with no I/O. Every method that changes the collection
/// rebuilds `total_value` from the entries before returning, and reports
/// whether anything changed so the caller knows to persist.
pub struct CollectionService;

impl CollectionService {
    pub fn new() -> Self {
        Self
    }

    /// Add `quantity` copies, creating a non-wishlisted entry if needed.
    pub fn add(&self, collection: &mut Collection, card: Card, quantity: u32) -> bool {
        match collection.get_mut(&card.id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => collection.entries.push(CollectionEntry {
                card,
                quantity,
                wishlisted: false,
            }),
        }
        // Adding zero copies of an unknown card must not leave a dead entry.
        collection.entries.retain(|e| !e.is_dead());
        collection.recompute_total_value();
        true
    }

    /// With `Some(q)`: subtract `q` copies (floored at 0), pruning the entry
    /// if it ends up unowned and not wishlisted. With `None`: drop the entry
    /// regardless of its wishlist flag. Unknown ids are ignored.
    pub fn remove(&self, collection: &mut Collection, card_id: &str, quantity: Option<u32>) -> bool {
        let Some(idx) = collection.entries.iter().position(|e| e.card.id == card_id) else {
            return false;
        };

        match quantity {
            Some(q) => {
                let entry = &mut collection.entries[idx];
                entry.quantity = entry.quantity.saturating_sub(q);
                if entry.is_dead() {
                    collection.entries.remove(idx);
                }
            }
            None => {
                collection.entries.remove(idx);
            }
        }

        collection.recompute_total_value();
        true
    }

    /// Overwrite the owned quantity of an existing entry. `quantity <= 0`
    /// removes the entry entirely; an absent entry is left absent.
    pub fn set_quantity(&self, collection: &mut Collection, card_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(collection, card_id, None);
        }

        let Some(entry) = collection.get_mut(card_id) else {
            return false;
        };
        entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        collection.recompute_total_value();
        true
    }

    /// Flip the wishlist flag. A card not in the collection becomes a
    /// wishlisted entry with zero copies.
    pub fn toggle_wishlist(&self, collection: &mut Collection, card: Card) -> bool {
        match collection.get_mut(&card.id) {
            Some(entry) => entry.wishlisted = !entry.wishlisted,
            None => collection.entries.push(CollectionEntry {
                card,
                quantity: 0,
                wishlisted: true,
            }),
        }
        collection.entries.retain(|e| !e.is_dead());
        collection.recompute_total_value();
        true
    }

    /// Replace the price of every entry whose card id appears in `prices`.
    /// Returns the number of entries updated.
    pub fn apply_prices(
        &self,
        collection: &mut Collection,
        prices: &HashMap<String, PriceInfo>,
    ) -> usize {
        let mut updated = 0;
        for entry in &mut collection.entries {
            if let Some(price) = prices.get(&entry.card.id) {
                entry.card.price = Some(price.clone());
                updated += 1;
            }
        }
        collection.recompute_total_value();
        updated
    }

    pub fn clear(&self, collection: &mut Collection) -> bool {
        let changed = !collection.entries.is_empty() || collection.total_value != 0.0;
        collection.entries.clear();
        collection.total_value = 0.0;
        changed
    }
}

impl Default for CollectionService {
    fn default() -> Self {
        Self::new()
    }
}
