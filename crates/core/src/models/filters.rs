use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::card::{Aspect, Card, CardType, Rarity};

/// Field to sort catalog results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Name,
    Cost,
    Rarity,
    Price,
    Set,
}

impl SortOption {
    /// Value used for the `sortBy` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Name => "name",
            SortOption::Cost => "cost",
            SortOption::Rarity => "rarity",
            SortOption::Price => "price",
            SortOption::Set => "set",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

pub const DEFAULT_COST_MIN: u32 = 0;
pub const DEFAULT_COST_MAX: u32 = 10;

/// Catalog query criteria. Transient: never persisted. Missing fields
/// deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardFilters {
    pub search: String,
    pub sets: Vec<String>,
    pub rarities: Vec<Rarity>,
    pub types: Vec<CardType>,
    pub aspects: Vec<Aspect>,
    pub cost_min: u32,
    pub cost_max: u32,
    pub sort_by: SortOption,
    pub sort_order: SortOrder,
}

impl Default for CardFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            sets: Vec::new(),
            rarities: Vec::new(),
            types: Vec::new(),
            aspects: Vec::new(),
            cost_min: DEFAULT_COST_MIN,
            cost_max: DEFAULT_COST_MAX,
            sort_by: SortOption::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl CardFilters {
    /// Filters restricted to a single set, everything else default.
    pub fn for_set(set_code: impl Into<String>) -> Self {
        Self {
            sets: vec![set_code.into()],
            ..Self::default()
        }
    }

    /// True if any narrowing criterion differs from the defaults.
    /// Sort settings do not count.
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.sets.is_empty()
            || !self.rarities.is_empty()
            || !self.types.is_empty()
            || !self.aspects.is_empty()
            || self.cost_min != DEFAULT_COST_MIN
            || self.cost_max != DEFAULT_COST_MAX
    }

    /// Does `card` satisfy every criterion?
    pub fn matches(&self, card: &Card) -> bool {
        let query = self.search.trim().to_lowercase();
        if !query.is_empty() {
            let hit = card.name.to_lowercase().contains(&query)
                || card
                    .subtitle
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&query))
                || card
                    .front_text
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        if !self.types.is_empty() && !self.types.contains(&card.card_type) {
            return false;
        }
        if !self.aspects.is_empty() && !card.aspects.iter().any(|a| self.aspects.contains(a)) {
            return false;
        }
        if !self.rarities.is_empty() && !self.rarities.contains(&card.rarity) {
            return false;
        }
        if !self.sets.is_empty() && !self.sets.iter().any(|s| s == &card.set_code) {
            return false;
        }

        card.cost >= self.cost_min && card.cost <= self.cost_max
    }

    /// Stable sort by the selected field and direction.
    pub fn sort(&self, cards: &mut [Card]) {
        cards.sort_by(|a, b| {
            let ord = match self.sort_by {
                SortOption::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortOption::Cost => a.cost.cmp(&b.cost),
                SortOption::Rarity => a.rarity.cmp(&b.rarity),
                SortOption::Price => {
                    let pa = a.market_price().unwrap_or(0.0);
                    let pb = b.market_price().unwrap_or(0.0);
                    pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
                }
                SortOption::Set => a
                    .set_code
                    .cmp(&b.set_code)
                    .then_with(|| a.card_number.cmp(&b.card_number)),
            };
            match self.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    /// Filter then sort.
    pub fn apply(&self, cards: &[Card]) -> Vec<Card> {
        let mut out: Vec<Card> = cards.iter().filter(|c| self.matches(c)).cloned().collect();
        self.sort(&mut out);
        out
    }
}

/// One page of a paginated listing. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u32,
}

impl<T> Page<T> {
    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            total_pages: 0,
            total_items: 0,
        }
    }

    /// Slice `all` into the requested page. Page 0 is treated as page 1.
    pub fn paginate(all: Vec<T>, page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        if page_size == 0 {
            return Self::empty(page);
        }
        let total_items = all.len() as u32;
        let total_pages = total_items.div_ceil(page_size);
        let start = ((page - 1) as usize).saturating_mul(page_size as usize);
        let items = all
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}
