use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::card::{Card, CardSet, MarketTrends, PriceInfo};
use crate::models::deck::Deck;
use crate::models::filters::{CardFilters, Page};

/// A source of catalog data: cards, sets, prices and community decks.
///
/// The SWUDB HTTP API and the bundled offline dataset both implement this
/// trait; `CatalogService` tries them in order and never lets an error
/// reach the caller.
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Filtered, sorted, paginated card search. `page` is 1-based.
    async fn search(
        &self,
        filters: &CardFilters,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Card>, CoreError>;

    /// Look up one card by its composite id (`SOR_005`).
    async fn get_card(&self, id: &str) -> Result<Option<Card>, CoreError>;

    async fn get_sets(&self) -> Result<Vec<CardSet>, CoreError>;

    /// Up to `count` cards picked at random (featured cards, market screen).
    async fn get_random(&self, count: u32) -> Result<Vec<Card>, CoreError>;

    /// Market prices for the given card ids. Ids without a price are absent.
    async fn get_prices(&self, card_ids: &[String]) -> Result<HashMap<String, PriceInfo>, CoreError>;

    /// Top gainers, losers and most traded cards.
    async fn get_market_trends(&self) -> Result<MarketTrends, CoreError>;

    /// Trending community decks.
    async fn get_hot_decks(&self, page: u32, page_size: u32) -> Result<Page<Deck>, CoreError>;

    /// Community decks whose name or description matches `query`.
    async fn search_decks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Deck>, CoreError>;

    /// One community deck by id. `Ok(None)` if the provider does not know it.
    async fn get_deck(&self, id: &str) -> Result<Option<Deck>, CoreError>;

    /// Register a like. `Ok(false)` when the provider cannot record it.
    async fn like_deck(&self, id: &str) -> Result<bool, CoreError>;
}
