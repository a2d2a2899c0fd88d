use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deck-construction rules for a play format.
///
/// The per-card copy limit table is keyed by card *name* (all printings of a
/// card share the limit) and is configuration, not card data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckFormat {
    pub min_cards: u32,
    pub max_cards: u32,
    pub default_copy_limit: u32,
    pub requires_leader: bool,
    pub requires_base: bool,
    #[serde(default)]
    pub copy_limit_overrides: BTreeMap<String, u32>,
}

impl Default for DeckFormat {
    fn default() -> Self {
        let mut copy_limit_overrides = BTreeMap::new();
        copy_limit_overrides.insert("Swarming Vulture Droid".to_string(), 15);
        Self {
            min_cards: 50,
            max_cards: 50,
            default_copy_limit: 3,
            requires_leader: true,
            requires_base: true,
            copy_limit_overrides,
        }
    }
}

impl DeckFormat {
    /// Maximum copies of the named card allowed in one deck.
    pub fn copy_limit(&self, card_name: &str) -> u32 {
        self.copy_limit_overrides
            .get(card_name)
            .copied()
            .unwrap_or(self.default_copy_limit)
    }

    pub fn with_copy_limit(mut self, card_name: impl Into<String>, limit: u32) -> Self {
        self.copy_limit_overrides.insert(card_name.into(), limit);
        self
    }
}
