use serde::{Deserialize, Serialize};

/// The gameplay type of a card. Leaders and Bases occupy the two singleton
/// deck slots; everything else goes into the main deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardType {
    Leader,
    Base,
    Unit,
    Event,
    Upgrade,
}

impl CardType {
    pub const ALL: [CardType; 5] = [
        CardType::Leader,
        CardType::Base,
        CardType::Unit,
        CardType::Event,
        CardType::Upgrade,
    ];

    /// Leader and Base cards never count toward the main deck.
    pub fn is_deck_slot(&self) -> bool {
        matches!(self, CardType::Leader | CardType::Base)
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardType::Leader => write!(f, "Leader"),
            CardType::Base => write!(f, "Base"),
            CardType::Unit => write!(f, "Unit"),
            CardType::Event => write!(f, "Event"),
            CardType::Upgrade => write!(f, "Upgrade"),
        }
    }
}

/// One of the six color-coded gameplay categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Aspect {
    Vigilance,
    Command,
    Aggression,
    Cunning,
    Villainy,
    Heroism,
}

impl Aspect {
    pub const ALL: [Aspect; 6] = [
        Aspect::Vigilance,
        Aspect::Command,
        Aspect::Aggression,
        Aspect::Cunning,
        Aspect::Villainy,
        Aspect::Heroism,
    ];
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Aspect::Vigilance => "Vigilance",
            Aspect::Command => "Command",
            Aspect::Aggression => "Aggression",
            Aspect::Cunning => "Cunning",
            Aspect::Villainy => "Villainy",
            Aspect::Heroism => "Heroism",
        };
        f.write_str(name)
    }
}

/// Printed rarity. The declaration order is the sort order used by the
/// catalog (Starter product cards sort last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Special,
    Starter,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
        Rarity::Special,
        Rarity::Starter,
    ];
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Legendary => write!(f, "Legendary"),
            Rarity::Special => write!(f, "Special"),
            Rarity::Starter => write!(f, "Starter"),
        }
    }
}

/// Arena a unit fights in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArenaType {
    Ground,
    Space,
}

/// Market price snapshot for a single card, as reported by the price API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInfo {
    pub market: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub mid: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub last_updated: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl PriceInfo {
    /// Price with every tier set to `market`, in USD.
    pub fn market(market: f64) -> Self {
        Self {
            market,
            low: market,
            mid: market,
            high: market,
            currency: default_currency(),
            last_updated: String::new(),
        }
    }
}

/// Price movers shown on the market screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketTrends {
    pub gainers: Vec<Card>,
    pub losers: Vec<Card>,
    pub most_traded: Vec<Card>,
}

impl MarketTrends {
    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty() && self.most_traded.is_empty()
    }
}

/// Alternate printing (hyperspace, showcase, foil...) of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardVariant {
    pub id: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub image_url: String,
}

/// A card record as sourced from the catalog. Cards are never mutated by
/// this crate and are referenced everywhere by `id` (`{SET}_{NUMBER}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(default)]
    pub aspects: Vec<Aspect>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arena_type: Option<ArenaType>,
    pub rarity: Rarity,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub set_code: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic_action: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<CardVariant>,
}

impl Card {
    /// Minimal card: id, name, type and rarity; everything else empty.
    /// Set code and number are derived from an id of the form `SET_NUMBER`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        card_type: CardType,
        rarity: Rarity,
    ) -> Self {
        let id = id.into();
        let (set_code, card_number) = match id.split_once('_') {
            Some((set, number)) => (set.to_string(), number.to_string()),
            None => (String::new(), String::new()),
        };
        Self {
            id,
            name: name.into(),
            subtitle: None,
            card_type,
            aspects: Vec::new(),
            traits: Vec::new(),
            cost: 0,
            power: None,
            hp: None,
            arena_type: None,
            rarity,
            set: String::new(),
            set_code,
            card_number,
            artist: None,
            front_text: None,
            back_text: None,
            epic_action: None,
            keywords: Vec::new(),
            image_url: String::new(),
            back_image_url: None,
            price: None,
            variants: Vec::new(),
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_aspects(mut self, aspects: impl IntoIterator<Item = Aspect>) -> Self {
        self.aspects = aspects.into_iter().collect();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Power and HP. Bases only have HP; pass `None` for power.
    pub fn with_stats(mut self, power: Option<u32>, hp: u32) -> Self {
        self.power = power;
        self.hp = Some(hp);
        self
    }

    pub fn with_arena(mut self, arena: ArenaType) -> Self {
        self.arena_type = Some(arena);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.front_text = Some(text.into());
        self
    }

    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = set.into();
        self
    }

    pub fn with_price(mut self, price: PriceInfo) -> Self {
        self.price = Some(price);
        self
    }

    /// Known market price, if any.
    pub fn market_price(&self) -> Option<f64> {
        self.price.as_ref().map(|p| p.market)
    }
}

/// A released card set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub total_cards: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
