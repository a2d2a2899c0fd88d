use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

use super::traits::CardCatalog;
use crate::errors::CoreError;
use crate::models::card::{
    ArenaType, Aspect, Card, CardSet, CardType, MarketTrends, PriceInfo, Rarity,
};
use crate::models::deck::Deck;
use crate::models::filters::{CardFilters, Page};

const PROVIDER: &str = "SWUDB";

/// Keys under which list endpoints return their records.
const LIST_KEYS: [&str; 4] = ["data", "items", "cards", "decks"];

/// SWUDB REST API provider.
///
/// - **Endpoints**: `/cards`, `/cards/{id}`, `/cards/random`, `/sets`,
///   `/prices/bulk`, `/prices/trends`, `/decks/hot`, `/decks/search`,
///   `/decks/{id}`, `/decks/{id}/like`
/// - **Timeout**: bounded per request (10 s by default), no retries. The
///   catalog service falls back to the offline dataset on any failure.
///
/// Responses are not uniform: lists come either bare or wrapped in a paging
/// envelope, enums come as names or as numeric codes, and one logical card
/// can appear once per printing. Everything is normalized into [`Card`]
/// before it leaves this module.
pub struct SwudbProvider {
    client: Client,
    base_url: String,
    image_base_url: String,
}

impl SwudbProvider {
    pub fn new(base_url: &str, image_base_url: &str, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_value(&self, path: &str, query: &[(String, String)]) -> Result<Option<Value>, CoreError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.client.get(&url).query(query).send().await?;
        Self::read_body(path, resp).await
    }

    async fn post_value(&self, path: &str, body: &Value) -> Result<Option<Value>, CoreError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.client.post(&url).json(body).send().await?;
        Self::read_body(path, resp).await
    }

    /// `Ok(None)` for 404, error for any other non-2xx or unparseable body.
    async fn read_body(path: &str, resp: reqwest::Response) -> Result<Option<Value>, CoreError> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("HTTP {status} for {path}"),
            });
        }
        let value = resp.json::<Value>().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse response for {path}: {e}"),
        })?;
        Ok(Some(value))
    }

    fn not_found(path: &str) -> CoreError {
        CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Endpoint {path} not found"),
        }
    }

    /// Normalize raw card records, dropping unusable ones and keeping only
    /// the first printing of each logical card.
    pub fn normalize_cards(&self, raw: Vec<Value>) -> Vec<Card> {
        let mut seen = HashSet::new();
        raw.into_iter()
            .filter_map(|value| {
                let raw: RawCard = match serde_json::from_value(value) {
                    Ok(raw) => raw,
                    Err(e) => {
                        debug!(provider = PROVIDER, error = %e, "Skipping malformed card record");
                        return None;
                    }
                };
                let identity = raw.identity();
                let card = raw.into_card(&self.image_base_url)?;
                seen.insert(identity.unwrap_or_else(|| card.id.clone()))
                    .then_some(card)
            })
            .collect()
    }

    /// Split a trends payload into its three card lists. Missing lists are
    /// empty; anything other than an object is an error.
    pub fn parse_trends(&self, value: Value) -> Result<MarketTrends, CoreError> {
        let Value::Object(mut map) = unwrap_data(value) else {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: "Expected an object for market trends".into(),
            });
        };
        let mut list = |keys: &[&str]| {
            let raw = keys
                .iter()
                .find_map(|k| match map.remove(*k) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .unwrap_or_default();
            self.normalize_cards(raw)
        };
        Ok(MarketTrends {
            gainers: list(&["gainers"]),
            losers: list(&["losers"]),
            most_traded: list(&["mostTraded", "most_traded"]),
        })
    }

    fn parse_decks(raw: Vec<Value>) -> Vec<Deck> {
        raw.into_iter()
            .filter_map(|value| match serde_json::from_value::<Deck>(value) {
                Ok(deck) => Some(deck),
                Err(e) => {
                    debug!(provider = PROVIDER, error = %e, "Skipping malformed deck record");
                    None
                }
            })
            .collect()
    }
}

/// Translate filters into `/cards` query parameters. List criteria are
/// comma-joined; empty criteria are omitted.
pub fn build_search_query(filters: &CardFilters, page: u32, page_size: u32) -> Vec<(String, String)> {
    fn join<T: ToString>(items: &[T]) -> String {
        items.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    }

    let mut query = Vec::new();
    let search = filters.search.trim();
    if !search.is_empty() {
        query.push(("search".to_string(), search.to_string()));
    }
    if !filters.sets.is_empty() {
        query.push(("sets".to_string(), join(&filters.sets)));
    }
    if !filters.rarities.is_empty() {
        query.push(("rarities".to_string(), join(&filters.rarities)));
    }
    if !filters.types.is_empty() {
        query.push(("types".to_string(), join(&filters.types)));
    }
    if !filters.aspects.is_empty() {
        query.push(("aspects".to_string(), join(&filters.aspects)));
    }
    query.push(("costMin".to_string(), filters.cost_min.to_string()));
    query.push(("costMax".to_string(), filters.cost_max.to_string()));
    query.push(("sortBy".to_string(), filters.sort_by.as_str().to_string()));
    query.push(("sortOrder".to_string(), filters.sort_order.as_str().to_string()));
    query.push(("page".to_string(), page.to_string()));
    query.push(("limit".to_string(), page_size.to_string()));
    query
}

/// Unwrap `{ "data": ... }` envelopes; anything else is returned as is.
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Read a list response: either a bare array or an object holding the
/// records under one of [`LIST_KEYS`] plus optional paging fields.
pub fn parse_page(value: Value, requested_page: u32) -> Result<Page<Value>, CoreError> {
    let requested_page = requested_page.max(1);
    match value {
        Value::Array(items) => {
            let total_items = items.len() as u32;
            Ok(Page {
                items,
                page: requested_page,
                total_pages: u32::from(total_items > 0),
                total_items,
            })
        }
        Value::Object(mut map) => {
            let items = LIST_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| CoreError::Api {
                    provider: PROVIDER.into(),
                    message: "List response without a record array".into(),
                })?;

            let number = |keys: &[&str]| {
                keys.iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_u64))
                    .map(|n| n as u32)
            };
            let total_items = number(&["totalItems", "total_items", "total"]).unwrap_or(items.len() as u32);
            let total_pages =
                number(&["totalPages", "total_pages"]).unwrap_or(u32::from(total_items > 0));
            let page = number(&["page"]).unwrap_or(requested_page);

            Ok(Page {
                items,
                page,
                total_pages,
                total_items,
            })
        }
        other => Err(CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Unexpected list response: {}", type_name(&other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl CardCatalog for SwudbProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(
        &self,
        filters: &CardFilters,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Card>, CoreError> {
        let query = build_search_query(filters, page, page_size);
        let value = self
            .get_value("/cards", &query)
            .await?
            .ok_or_else(|| Self::not_found("/cards"))?;
        let raw = parse_page(value, page)?;
        Ok(Page {
            items: self.normalize_cards(raw.items),
            page: raw.page,
            total_pages: raw.total_pages,
            total_items: raw.total_items,
        })
    }

    async fn get_card(&self, id: &str) -> Result<Option<Card>, CoreError> {
        let path = format!("/cards/{id}");
        let Some(value) = self.get_value(&path, &[]).await? else {
            return Ok(None);
        };
        Ok(self.normalize_cards(vec![unwrap_data(value)]).into_iter().next())
    }

    async fn get_sets(&self) -> Result<Vec<CardSet>, CoreError> {
        let value = self
            .get_value("/sets", &[])
            .await?
            .ok_or_else(|| Self::not_found("/sets"))?;
        serde_json::from_value(unwrap_data(value)).map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse sets: {e}"),
        })
    }

    async fn get_random(&self, count: u32) -> Result<Vec<Card>, CoreError> {
        let query = vec![("count".to_string(), count.to_string())];
        let value = self
            .get_value("/cards/random", &query)
            .await?
            .ok_or_else(|| Self::not_found("/cards/random"))?;
        let raw = parse_page(value, 1)?;
        Ok(self.normalize_cards(raw.items))
    }

    async fn get_prices(&self, card_ids: &[String]) -> Result<HashMap<String, PriceInfo>, CoreError> {
        if card_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let value = self
            .post_value("/prices/bulk", &json!({ "cardIds": card_ids }))
            .await?
            .ok_or_else(|| Self::not_found("/prices/bulk"))?;
        serde_json::from_value(unwrap_data(value)).map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse prices: {e}"),
        })
    }

    async fn get_market_trends(&self) -> Result<MarketTrends, CoreError> {
        let value = self
            .get_value("/prices/trends", &[])
            .await?
            .ok_or_else(|| Self::not_found("/prices/trends"))?;
        self.parse_trends(value)
    }

    async fn get_hot_decks(&self, page: u32, page_size: u32) -> Result<Page<Deck>, CoreError> {
        let query = vec![
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), page_size.to_string()),
        ];
        let value = self
            .get_value("/decks/hot", &query)
            .await?
            .ok_or_else(|| Self::not_found("/decks/hot"))?;
        let raw = parse_page(value, page)?;
        Ok(Page {
            items: Self::parse_decks(raw.items),
            page: raw.page,
            total_pages: raw.total_pages,
            total_items: raw.total_items,
        })
    }

    async fn search_decks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Deck>, CoreError> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), page_size.to_string()),
        ];
        let value = self
            .get_value("/decks/search", &params)
            .await?
            .ok_or_else(|| Self::not_found("/decks/search"))?;
        let raw = parse_page(value, page)?;
        Ok(Page {
            items: Self::parse_decks(raw.items),
            page: raw.page,
            total_pages: raw.total_pages,
            total_items: raw.total_items,
        })
    }

    async fn get_deck(&self, id: &str) -> Result<Option<Deck>, CoreError> {
        let path = format!("/decks/{id}");
        let Some(value) = self.get_value(&path, &[]).await? else {
            return Ok(None);
        };
        serde_json::from_value(unwrap_data(value))
            .map(Some)
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse deck {id}: {e}"),
            })
    }

    /// The like endpoint answers with an empty body; only the status counts.
    async fn like_deck(&self, id: &str) -> Result<bool, CoreError> {
        let path = format!("/decks/{id}/like");
        let url = format!("{}{path}", self.base_url);
        let status = self.client.post(&url).send().await?.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("HTTP {status} for {path}"),
            });
        }
        Ok(true)
    }
}

// ── SWUDB API response types ────────────────────────────────────────

/// Enum field that arrives either as a display name or as a numeric code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Code {
    Num(u64),
    Text(String),
}

impl Code {
    fn as_text(&self) -> String {
        match self {
            Code::Num(n) => n.to_string(),
            Code::Text(s) => s.clone(),
        }
    }
}

/// Numeric type codes: 1 Leader, 2 Base, 3 Unit, 4 Event, 5 Upgrade.
fn card_type_from_code(code: &Code) -> Option<CardType> {
    match code {
        Code::Num(n) => CardType::ALL.get((*n as usize).checked_sub(1)?).copied(),
        Code::Text(s) => CardType::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(s.trim())),
    }
}

/// Numeric rarity codes: 1 Common … 5 Special, 6 Starter.
fn rarity_from_code(code: &Code) -> Option<Rarity> {
    match code {
        Code::Num(n) => Rarity::ALL.get((*n as usize).checked_sub(1)?).copied(),
        Code::Text(s) => Rarity::ALL
            .into_iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(s.trim())),
    }
}

/// Numeric aspect codes: 1 Vigilance, 2 Command, 3 Aggression, 4 Cunning,
/// 5 Villainy, 6 Heroism.
fn aspect_from_code(code: &Code) -> Option<Aspect> {
    match code {
        Code::Num(n) => Aspect::ALL.get((*n as usize).checked_sub(1)?).copied(),
        Code::Text(s) => Aspect::ALL
            .into_iter()
            .find(|a| a.to_string().eq_ignore_ascii_case(s.trim())),
    }
}

fn arena_from_text(s: &str) -> Option<ArenaType> {
    match s.trim().to_ascii_lowercase().as_str() {
        "ground" => Some(ArenaType::Ground),
        "space" => Some(ArenaType::Space),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    #[serde(default)]
    id: Option<String>,
    /// Identity shared by every printing of the same logical card.
    #[serde(default, alias = "uid")]
    card_uid: Option<String>,
    name: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(rename = "type", alias = "cardType")]
    card_type: Code,
    #[serde(default)]
    aspects: Vec<Code>,
    #[serde(default)]
    traits: Vec<String>,
    #[serde(default)]
    cost: Option<u32>,
    #[serde(default)]
    power: Option<u32>,
    #[serde(default)]
    hp: Option<u32>,
    #[serde(default, alias = "arena")]
    arena_type: Option<String>,
    rarity: Code,
    #[serde(default)]
    set: Option<String>,
    #[serde(default)]
    set_code: Option<String>,
    #[serde(default, alias = "number")]
    card_number: Option<Code>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    front_text: Option<String>,
    #[serde(default)]
    back_text: Option<String>,
    #[serde(default)]
    epic_action: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    back_image_url: Option<String>,
    #[serde(default)]
    price: Option<PriceInfo>,
}

impl RawCard {
    fn identity(&self) -> Option<String> {
        self.card_uid.clone().filter(|uid| !uid.is_empty())
    }

    /// `None` when the record cannot become a valid card (unknown type or
    /// rarity, or no way to build an id).
    fn into_card(self, image_base_url: &str) -> Option<Card> {
        let card_type = card_type_from_code(&self.card_type)?;
        let rarity = rarity_from_code(&self.rarity)?;

        let card_number = self.card_number.map(|n| match n {
            Code::Num(n) => format!("{n:03}"),
            Code::Text(s) => s,
        });
        let id = match (self.id.filter(|id| !id.is_empty()), &self.set_code, &card_number) {
            (Some(id), _, _) => id,
            (None, Some(set), Some(number)) => format!("{set}_{number}"),
            _ => return None,
        };

        let mut card = Card::new(id, self.name, card_type, rarity);
        if let Some(set_code) = self.set_code {
            card.set_code = set_code;
        }
        if let Some(number) = card_number {
            card.card_number = number;
        }
        card.set = self.set.unwrap_or_default();
        card.subtitle = self.subtitle.filter(|s| !s.is_empty());
        card.aspects = self.aspects.iter().filter_map(aspect_from_code).collect();
        card.traits = self.traits;
        card.cost = self.cost.unwrap_or(0);
        card.power = self.power;
        card.hp = self.hp;
        card.arena_type = self.arena_type.as_deref().and_then(arena_from_text);
        card.artist = self.artist;
        card.front_text = self.front_text;
        card.back_text = self.back_text;
        card.epic_action = self.epic_action;
        card.keywords = self.keywords;
        card.back_image_url = self
            .back_image_url
            .map(|url| resolve_image_url(image_base_url, &url));
        card.price = self.price;
        card.image_url = match self.image_url {
            Some(url) if !url.is_empty() => resolve_image_url(image_base_url, &url),
            _ => format!(
                "{image_base_url}/cards/{}/{}.webp",
                card.set_code, card.card_number
            ),
        };

        if card.aspects.len() != self.aspects.len() {
            let codes: Vec<String> = self.aspects.iter().map(Code::as_text).collect();
            debug!(provider = PROVIDER, card_id = %card.id, ?codes, "Dropped unknown aspect codes");
        }

        Some(card)
    }
}

fn resolve_image_url(image_base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{image_base_url}/{}", url.trim_start_matches('/'))
    }
}
