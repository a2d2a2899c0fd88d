use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::collections::HashMap;

use super::traits::CardCatalog;
use crate::errors::CoreError;
use crate::models::card::{
    ArenaType, Aspect, Card, CardSet, CardType, MarketTrends, PriceInfo, Rarity,
};
use crate::models::deck::Deck;
use crate::models::filters::{CardFilters, Page};

const IMAGE_BASE_URL: &str = "https://swudb.com";
const PRICE_DATE: &str = "2024-01-25";

/// Bundled offline dataset.
///
/// Serves a small slice of Spark of Rebellion / Shadows of the Galaxy so the
/// app stays usable without network access. Filtering, sorting and paging
/// happen client-side with [`CardFilters`].
pub struct MockCatalog {
    cards: Vec<Card>,
    sets: Vec<CardSet>,
    prices: HashMap<String, PriceInfo>,
    hot_decks: Vec<Deck>,
}

impl MockCatalog {
    pub fn new() -> Self {
        let prices = mock_prices();
        let cards = mock_cards()
            .into_iter()
            .map(|mut card| {
                card.price = prices.get(&card.id).cloned();
                card
            })
            .collect();
        Self {
            cards,
            sets: mock_sets(),
            prices,
            hot_decks: mock_hot_decks(),
        }
    }

    /// Every card in the dataset, prices attached.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardCatalog for MockCatalog {
    fn name(&self) -> &str {
        "Offline"
    }

    async fn search(
        &self,
        filters: &CardFilters,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Card>, CoreError> {
        Ok(Page::paginate(filters.apply(&self.cards), page, page_size))
    }

    async fn get_card(&self, id: &str) -> Result<Option<Card>, CoreError> {
        Ok(self.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn get_sets(&self) -> Result<Vec<CardSet>, CoreError> {
        Ok(self.sets.clone())
    }

    async fn get_random(&self, count: u32) -> Result<Vec<Card>, CoreError> {
        let mut rng = rand::thread_rng();
        Ok(self
            .cards
            .choose_multiple(&mut rng, count as usize)
            .cloned()
            .collect())
    }

    async fn get_prices(&self, card_ids: &[String]) -> Result<HashMap<String, PriceInfo>, CoreError> {
        Ok(card_ids
            .iter()
            .filter_map(|id| self.prices.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }

    /// The offline dataset carries no price history, so there are no movers.
    async fn get_market_trends(&self) -> Result<MarketTrends, CoreError> {
        Ok(MarketTrends::default())
    }

    async fn get_hot_decks(&self, page: u32, page_size: u32) -> Result<Page<Deck>, CoreError> {
        Ok(Page::paginate(self.hot_decks.clone(), page, page_size))
    }

    async fn search_decks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Deck>, CoreError> {
        let q = query.trim().to_lowercase();
        let matched: Vec<Deck> = self
            .hot_decks
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&q)
                    || d.description
                        .as_deref()
                        .is_some_and(|desc| desc.to_lowercase().contains(&q))
            })
            .cloned()
            .collect();
        Ok(Page::paginate(matched, page, page_size))
    }

    async fn get_deck(&self, id: &str) -> Result<Option<Deck>, CoreError> {
        Ok(self.hot_decks.iter().find(|d| d.id == id).cloned())
    }

    /// Likes need the community server.
    async fn like_deck(&self, _id: &str) -> Result<bool, CoreError> {
        Ok(false)
    }
}

// ── Dataset ─────────────────────────────────────────────────────────

fn printing(set_code: &str, set_name: &str, number: &str, name: &str, card_type: CardType, rarity: Rarity) -> Card {
    let mut card = Card::new(format!("{set_code}_{number}"), name, card_type, rarity).with_set(set_name);
    card.image_url = format!("{IMAGE_BASE_URL}/cards/{set_code}/{number}.webp");
    card
}

fn sor(number: &str, name: &str, card_type: CardType, rarity: Rarity) -> Card {
    printing("SOR", "Spark of Rebellion", number, name, card_type, rarity)
}

fn mock_cards() -> Vec<Card> {
    use Aspect::*;

    let mut falcon = sor("079", "Millennium Falcon", CardType::Unit, Rarity::Legendary)
        .with_subtitle("Piece of Junk")
        .with_aspects([Cunning, Heroism])
        .with_traits(&["Vehicle", "Rebel"])
        .with_cost(6)
        .with_stats(Some(5), 6)
        .with_arena(ArenaType::Space)
        .with_text("Ambush. When Played: Ready another friendly unit.");
    falcon.keywords = vec!["Ambush".to_string()];

    vec![
        sor("005", "Luke Skywalker", CardType::Leader, Rarity::Legendary)
            .with_subtitle("Faithful Friend")
            .with_aspects([Vigilance, Heroism])
            .with_traits(&["Force", "Rebel"])
            .with_stats(Some(4), 7)
            .with_text("Action: If you control 3 or more resources, flip this leader."),
        sor("010", "Darth Vader", CardType::Leader, Rarity::Legendary)
            .with_subtitle("Dark Lord of the Sith")
            .with_aspects([Aggression, Villainy])
            .with_traits(&["Force", "Imperial", "Sith"])
            .with_stats(Some(5), 8)
            .with_text("Action: If you have dealt 5 or more damage this phase, flip this leader."),
        sor("060", "Rebel Pathfinder", CardType::Unit, Rarity::Common)
            .with_aspects([Command])
            .with_traits(&["Rebel", "Trooper"])
            .with_cost(2)
            .with_stats(Some(2), 3)
            .with_arena(ArenaType::Ground)
            .with_text("When Played: You may give an Experience token to this unit."),
        falcon,
        sor("139", "Force Choke", CardType::Event, Rarity::Rare)
            .with_aspects([Aggression, Villainy])
            .with_traits(&["Force"])
            .with_cost(3)
            .with_text("Deal 3 damage to a ground unit."),
        sor("053", "Luke's Lightsaber", CardType::Upgrade, Rarity::Rare)
            .with_aspects([Vigilance, Heroism])
            .with_traits(&["Weapon", "Lightsaber"])
            .with_cost(2)
            .with_text("Attached unit gets +3/+1."),
        sor("023", "Dagobah Swamp", CardType::Base, Rarity::Rare)
            .with_aspects([Vigilance])
            .with_traits(&["Location"])
            .with_stats(None, 30)
            .with_text("Epic Action: Give a unit +2/+2 for this phase."),
        printing("SHD", "Shadows of the Galaxy", "009", "Boba Fett", CardType::Leader, Rarity::Legendary)
            .with_subtitle("Collecting the Bounty")
            .with_aspects([Cunning, Villainy])
            .with_traits(&["Bounty Hunter", "Mandalorian"])
            .with_stats(Some(4), 7)
            .with_text("When you play a Bounty Hunter unit, you may exhaust this leader to draw a card."),
        sor("035", "Admiral Ackbar", CardType::Unit, Rarity::Rare)
            .with_subtitle("Brilliant Strategist")
            .with_aspects([Command, Heroism])
            .with_traits(&["Rebel", "Official"])
            .with_cost(5)
            .with_stats(Some(2), 4)
            .with_arena(ArenaType::Ground)
            .with_text("When Played: Each friendly unit gets +1/+1 for this phase."),
        sor("130", "Overwhelming Barrage", CardType::Event, Rarity::Rare)
            .with_aspects([Command])
            .with_traits(&["Tactic"])
            .with_cost(5)
            .with_text("Deal 2 damage to each enemy ground unit and each enemy space unit."),
        sor("115", "Superlaser Technician", CardType::Unit, Rarity::Common)
            .with_aspects([Villainy])
            .with_traits(&["Imperial", "Trooper"])
            .with_cost(1)
            .with_stats(Some(1), 1)
            .with_arena(ArenaType::Ground)
            .with_text("When Defeated: You may put Superlaser Technician into play as a resource."),
        sor("081", "X-Wing", CardType::Unit, Rarity::Common)
            .with_aspects([Heroism])
            .with_traits(&["Vehicle", "Rebel", "Fighter"])
            .with_cost(3)
            .with_stats(Some(2), 3)
            .with_arena(ArenaType::Space),
    ]
}

fn mock_sets() -> Vec<CardSet> {
    [
        ("SOR", "Spark of Rebellion", "2024-03-08", 252),
        ("SHD", "Shadows of the Galaxy", "2024-07-12", 262),
        ("TWI", "Twilight of the Republic", "2024-11-08", 256),
    ]
    .into_iter()
    .map(|(code, name, release_date, total_cards)| CardSet {
        code: code.to_string(),
        name: name.to_string(),
        release_date: release_date.to_string(),
        total_cards,
        image_url: Some(format!("{IMAGE_BASE_URL}/images/sets/{code}.png")),
    })
    .collect()
}

fn mock_prices() -> HashMap<String, PriceInfo> {
    [
        ("SOR_005", 45.99, 38.00, 44.50, 55.00),
        ("SOR_010", 52.50, 45.00, 51.00, 62.00),
        ("SOR_060", 0.25, 0.10, 0.20, 0.50),
        ("SOR_079", 35.00, 28.00, 33.50, 42.00),
        ("SOR_139", 2.50, 1.75, 2.25, 3.50),
        ("SOR_115", 0.75, 0.50, 0.70, 1.25),
        ("SOR_023", 8.50, 6.00, 8.00, 12.00),
        ("SHD_009", 48.00, 40.00, 46.50, 58.00),
    ]
    .into_iter()
    .map(|(id, market, low, mid, high)| {
        (
            id.to_string(),
            PriceInfo {
                market,
                low,
                mid,
                high,
                currency: "USD".to_string(),
                last_updated: PRICE_DATE.to_string(),
            },
        )
    })
    .collect()
}

fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn mock_hot_decks() -> Vec<Deck> {
    [
        (
            "deck_001",
            "Luke Aggro",
            "Fast aggro deck featuring Luke Skywalker as leader",
            "2024-01-15T10:00:00Z",
            "2024-01-20T15:30:00Z",
            "JediMaster42",
            156,
            2340,
        ),
        (
            "deck_002",
            "Vader Control",
            "Control deck with Darth Vader leading the Empire",
            "2024-01-18T14:00:00Z",
            "2024-01-22T09:15:00Z",
            "SithLord99",
            203,
            3100,
        ),
        (
            "deck_003",
            "Boba Bounty Hunters",
            "Bounty Hunter tribal deck with Boba Fett",
            "2024-01-20T08:00:00Z",
            "2024-01-25T12:45:00Z",
            "Mandalorian",
            178,
            2890,
        ),
    ]
    .into_iter()
    .map(|(id, name, description, created, updated, author, likes, views)| {
        let mut deck = Deck::new(name, Some(description.to_string()));
        deck.id = id.to_string();
        deck.created_at = timestamp(created);
        deck.updated_at = timestamp(updated);
        deck.is_public = true;
        deck.author = Some(author.to_string());
        deck.likes = Some(likes);
        deck.views = Some(views);
        deck
    })
    .collect()
}
