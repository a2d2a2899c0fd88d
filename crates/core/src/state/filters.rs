use crate::models::card::{Aspect, CardType, Rarity};
use crate::models::filters::{CardFilters, SortOption, SortOrder};

/// Catalog filter criteria for the browse screen. Lives only in memory.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    filters: CardFilters,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &CardFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: CardFilters) {
        self.filters = filters;
    }

    /// Edit the criteria in place.
    pub fn update(&mut self, f: impl FnOnce(&mut CardFilters)) {
        f(&mut self.filters);
    }

    pub fn reset(&mut self) {
        self.filters = CardFilters::default();
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active_filters()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    pub fn set_cost_range(&mut self, min: u32, max: u32) {
        self.filters.cost_min = min.min(max);
        self.filters.cost_max = max.max(min);
    }

    pub fn set_sort(&mut self, sort_by: SortOption, sort_order: SortOrder) {
        self.filters.sort_by = sort_by;
        self.filters.sort_order = sort_order;
    }

    pub fn toggle_type(&mut self, card_type: CardType) {
        toggle(&mut self.filters.types, card_type);
    }

    pub fn toggle_aspect(&mut self, aspect: Aspect) {
        toggle(&mut self.filters.aspects, aspect);
    }

    pub fn toggle_rarity(&mut self, rarity: Rarity) {
        toggle(&mut self.filters.rarities, rarity);
    }

    pub fn toggle_set(&mut self, set_code: &str) {
        toggle(&mut self.filters.sets, set_code.to_string());
    }
}

/// Remove `value` if selected, otherwise append it.
fn toggle<T: PartialEq>(selected: &mut Vec<T>, value: T) {
    match selected.iter().position(|v| *v == value) {
        Some(idx) => {
            selected.remove(idx);
        }
        None => selected.push(value),
    }
}
