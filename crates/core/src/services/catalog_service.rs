use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::card::{Card, CardSet, MarketTrends, PriceInfo};
use crate::models::deck::Deck;
use crate::models::filters::{CardFilters, Page};
use crate::providers::registry::CatalogRegistry;
use crate::providers::traits::CardCatalog;

type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'a>>;

/// Catalog access with automatic provider fallback.
///
/// Providers are tried in registration order. A failing provider (timeout,
/// HTTP error, unparseable payload) is logged and skipped; when every
/// provider fails the caller gets an empty result. Nothing here returns a
/// `CoreError`, so screens can always render.
pub struct CatalogService {
    registry: CatalogRegistry,
}

impl CatalogService {
    pub fn new(registry: CatalogRegistry) -> Self {
        Self { registry }
    }

    /// Names of the registered providers in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    pub async fn search(&self, filters: &CardFilters, page: u32, page_size: u32) -> Page<Card> {
        self.first_ok("search", |p| p.search(filters, page, page_size))
            .await
            .unwrap_or_else(|| Page::empty(page))
    }

    pub async fn get_card(&self, id: &str) -> Option<Card> {
        self.first_ok("get_card", |p| p.get_card(id)).await.flatten()
    }

    pub async fn get_sets(&self) -> Vec<CardSet> {
        self.first_ok("get_sets", |p| p.get_sets())
            .await
            .unwrap_or_default()
    }

    pub async fn get_random(&self, count: u32) -> Vec<Card> {
        self.first_ok("get_random", |p| p.get_random(count))
            .await
            .unwrap_or_default()
    }

    /// Bulk price lookup. Entries with a negative or non-finite market
    /// price are dropped.
    pub async fn get_prices(&self, card_ids: &[String]) -> HashMap<String, PriceInfo> {
        if card_ids.is_empty() {
            return HashMap::new();
        }
        let mut prices = self
            .first_ok("get_prices", |p| p.get_prices(card_ids))
            .await
            .unwrap_or_default();
        prices.retain(|card_id, price| {
            let valid = price.market.is_finite() && price.market >= 0.0;
            if !valid {
                warn!(card_id = %card_id, market = price.market, "Discarding invalid price");
            }
            valid
        });
        prices
    }

    pub async fn get_market_trends(&self) -> MarketTrends {
        self.first_ok("get_market_trends", |p| p.get_market_trends())
            .await
            .unwrap_or_default()
    }

    pub async fn get_hot_decks(&self, page: u32, page_size: u32) -> Page<Deck> {
        self.first_ok("get_hot_decks", |p| p.get_hot_decks(page, page_size))
            .await
            .unwrap_or_else(|| Page::empty(page))
    }

    pub async fn search_decks(&self, query: &str, page: u32, page_size: u32) -> Page<Deck> {
        self.first_ok("search_decks", |p| p.search_decks(query, page, page_size))
            .await
            .unwrap_or_else(|| Page::empty(page))
    }

    pub async fn get_deck(&self, id: &str) -> Option<Deck> {
        self.first_ok("get_deck", |p| p.get_deck(id)).await.flatten()
    }

    /// `true` only if a provider recorded the like.
    pub async fn like_deck(&self, id: &str) -> bool {
        self.first_ok("like_deck", |p| p.like_deck(id))
            .await
            .unwrap_or(false)
    }

    /// Run `call` against each provider until one succeeds.
    async fn first_ok<'a, T, F>(&'a self, operation: &str, call: F) -> Option<T>
    where
        F: Fn(&'a dyn CardCatalog) -> ProviderFuture<'a, T>,
    {
        if self.registry.is_empty() {
            warn!(operation, error = %CoreError::NoProvider, "Catalog request dropped");
            return None;
        }

        for provider in self.registry.providers() {
            match call(provider).await {
                Ok(result) => {
                    debug!(provider = provider.name(), operation, "Catalog request served");
                    return Some(result);
                }
                Err(e) => {
                    warn!(provider = provider.name(), operation, error = %e, "Catalog provider failed, trying next");
                }
            }
        }

        warn!(operation, "All catalog providers failed, returning empty result");
        None
    }
}
