//! Card catalog and decklists.
//!
//! The engine never talks to a card database itself. It is handed definitions through
//! [`CardCatalog`] and decks through [`DeckStore`]; [`CardRegistry`] is the in-memory
//! catalog used by the CLI, the wasm front-end and the tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::card::{CardDefinition, PowerToughness, basic_land};
use crate::color::Color;
use crate::error::CatalogError;

/// Source of card definitions.
pub trait CardCatalog {
    /// Cards matching `query`. An exact (case-insensitive) name match comes back alone;
    /// otherwise every card whose name contains the query.
    fn lookup(&self, query: &str) -> Vec<Arc<CardDefinition>>;
}

/// Source of saved decklists.
pub trait DeckStore {
    fn load(&self, deck_id: &str) -> Option<Decklist>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub definition: Arc<CardDefinition>,
    pub count: u32,
}

/// An ordered multiset of card definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decklist {
    pub name: String,
    pub cards: Vec<DeckEntry>,
}

impl Decklist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Adds `count` copies. Copies of a card already in the list are merged into its entry.
    pub fn add(&mut self, definition: Arc<CardDefinition>, count: u32) -> &mut Self {
        if count == 0 {
            return self;
        }
        match self
            .cards
            .iter_mut()
            .find(|entry| entry.definition.name == definition.name)
        {
            Some(entry) => entry.count += count,
            None => self.cards.push(DeckEntry { definition, count }),
        }
        self
    }

    pub fn with(mut self, definition: Arc<CardDefinition>, count: u32) -> Self {
        self.add(definition, count);
        self
    }

    pub fn total_cards(&self) -> usize {
        self.cards.iter().map(|entry| entry.count as usize).sum()
    }

    /// One definition per physical card, in list order.
    pub fn expand(&self) -> Vec<Arc<CardDefinition>> {
        self.cards
            .iter()
            .flat_map(|entry| std::iter::repeat_n(entry.definition.clone(), entry.count as usize))
            .collect()
    }
}

/// In-memory catalog keyed by lowercase card name.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: HashMap<String, Arc<CardDefinition>>,
    /// Registration order, for stable listings.
    order: Vec<String>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in card pool.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for definition in builtin_cards() {
            registry.register(definition);
        }
        registry
    }

    /// Adds or replaces a card.
    pub fn register(&mut self, definition: CardDefinition) -> Arc<CardDefinition> {
        let key = definition.name.to_lowercase();
        let definition = Arc::new(definition);
        if self.cards.insert(key.clone(), definition.clone()).is_none() {
            self.order.push(key);
        }
        definition
    }

    pub fn get(&self, name: &str) -> Option<Arc<CardDefinition>> {
        self.cards.get(&name.trim().to_lowercase()).cloned()
    }

    /// Like [`CardRegistry::get`] but with a typed error.
    pub fn require(&self, name: &str) -> Result<Arc<CardDefinition>, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownCard(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.order.iter().filter_map(|key| self.cards.get(key))
    }

    /// The 60-card fallback deck the AI plays when no saved deck exists.
    pub fn basic_ai_deck(&self) -> Result<Decklist, CatalogError> {
        let mut deck = Decklist::new("AI Basic Deck");
        for (name, count) in BASIC_AI_DECK {
            deck.add(self.require(name)?, *count);
        }
        Ok(deck)
    }
}

impl CardCatalog for CardRegistry {
    fn lookup(&self, query: &str) -> Vec<Arc<CardDefinition>> {
        if let Some(exact) = self.get(query) {
            return vec![exact];
        }
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.order
            .iter()
            .filter(|key| key.contains(&needle))
            .filter_map(|key| self.cards.get(key).cloned())
            .collect()
    }
}

const BASIC_AI_DECK: &[(&str, u32)] = &[
    ("Mountain", 12),
    ("Forest", 12),
    ("Grizzly Bears", 8),
    ("Giant Spider", 6),
    ("Hill Giant", 6),
    ("Lightning Bolt", 4),
    ("Giant Growth", 3),
    ("Shock", 3),
    ("Runeclaw Bear", 6),
];

fn creature(name: &str, cost: &str, subtype: &str, power: i32, toughness: i32, text: &str) -> CardDefinition {
    CardDefinition::builder(name)
        .mana_cost(cost)
        .type_line(&format!("Creature — {subtype}"))
        .power_toughness(PowerToughness::fixed(power, toughness))
        .rules_text(text)
        .build()
}

fn spell(name: &str, cost: &str, card_type: &str, text: &str) -> CardDefinition {
    CardDefinition::builder(name)
        .mana_cost(cost)
        .type_line(card_type)
        .rules_text(text)
        .build()
}

/// Basic lands plus a small pool that covers every keyword the engine knows.
pub fn builtin_cards() -> Vec<CardDefinition> {
    let mut cards: Vec<CardDefinition> = Color::ALL.into_iter().map(basic_land).collect();
    cards.extend([
        creature("Grizzly Bears", "{1}{G}", "Bear", 2, 2, ""),
        creature("Runeclaw Bear", "{1}{G}", "Bear", 2, 2, ""),
        creature("Giant Spider", "{3}{G}", "Spider", 2, 4, "Reach"),
        creature("Hill Giant", "{3}{R}", "Giant", 3, 3, ""),
        creature("Llanowar Elves", "{G}", "Elf Druid", 1, 1, "{T}: Add {G}."),
        creature(
            "Elvish Visionary",
            "{1}{G}",
            "Elf Shaman",
            1,
            1,
            "When Elvish Visionary enters, draw a card.",
        ),
        creature("Wall of Wood", "{G}", "Wall", 0, 3, "Defender"),
        creature("Colossal Dreadmaw", "{4}{G}{G}", "Dinosaur", 6, 6, "Trample"),
        creature("Raging Goblin", "{R}", "Goblin Berserker", 1, 1, "Haste"),
        creature("Youthful Knight", "{1}{W}", "Human Knight", 2, 1, "First strike"),
        creature("Serra Angel", "{3}{W}{W}", "Angel", 4, 4, "Flying, vigilance"),
        creature(
            "Vampire Nighthawk",
            "{1}{B}{B}",
            "Vampire Shaman",
            2,
            3,
            "Flying, deathtouch, lifelink",
        ),
        creature(
            "Prodigal Sorcerer",
            "{2}{U}",
            "Human Wizard",
            1,
            1,
            "{T}: Prodigal Sorcerer deals 1 damage to any target.",
        ),
        spell(
            "Lightning Bolt",
            "{R}",
            "Instant",
            "Lightning Bolt deals 3 damage to any target.",
        ),
        spell("Shock", "{R}", "Instant", "Shock deals 2 damage to any target."),
        spell(
            "Giant Growth",
            "{G}",
            "Instant",
            "Target creature gets +3/+3 until end of turn.",
        ),
        spell("Divination", "{2}{U}", "Sorcery", "Draw two cards."),
        spell("Murder", "{1}{B}{B}", "Instant", "Destroy target creature."),
        spell("Healing Salve", "{W}", "Instant", "You gain 3 life."),
    ]);
    cards
}

/// Decks held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryDeckStore {
    decks: HashMap<String, Decklist>,
}

impl MemoryDeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, deck_id: impl Into<String>, deck: Decklist) {
        self.decks.insert(deck_id.into(), deck);
    }
}

impl DeckStore for MemoryDeckStore {
    fn load(&self, deck_id: &str) -> Option<Decklist> {
        self.decks.get(deck_id).cloned()
    }
}

/// Loads `deck_id`, falling back to the built-in AI deck when the store has nothing.
pub fn load_or_basic(
    store: &dyn DeckStore,
    registry: &CardRegistry,
    deck_id: &str,
) -> Result<Decklist, CatalogError> {
    match store.load(deck_id) {
        Some(deck) => Ok(deck),
        None => registry.basic_ai_deck(),
    }
}

#[cfg(feature = "serialization")]
pub use json::{CardRecord, DeckSlot, DecklistFile};

#[cfg(feature = "serialization")]
mod json {
    use serde::{Deserialize, Serialize};

    use super::{CardRegistry, Decklist};
    use crate::card::{CardDefinition, PowerToughness, PtValue};
    use crate::color::ColorSet;
    use crate::error::CatalogError;
    use crate::types::Rarity;

    /// A card as catalog APIs return it: all strings.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CardRecord {
        pub name: String,
        pub mana_cost: String,
        pub type_line: String,
        pub power: Option<String>,
        pub toughness: Option<String>,
        #[serde(alias = "text")]
        pub oracle_text: String,
        /// Color symbols such as `"RG"`. Derived from cost and text when absent.
        pub colors: Option<String>,
        pub rarity: Option<String>,
    }

    impl CardRecord {
        pub fn to_definition(&self) -> Result<CardDefinition, CatalogError> {
            let mut builder = CardDefinition::builder(self.name.clone())
                .mana_cost(&self.mana_cost)
                .type_line(&self.type_line)
                .rules_text(self.oracle_text.clone());
            if let (Some(power), Some(toughness)) = (&self.power, &self.toughness) {
                let parse = |text: &String| {
                    PtValue::parse(text)
                        .ok_or_else(|| CatalogError::InvalidPowerToughness(text.clone()))
                };
                builder = builder.power_toughness(PowerToughness {
                    power: parse(power)?,
                    toughness: parse(toughness)?,
                });
            }
            if let Some(colors) = &self.colors {
                builder = builder.colors(ColorSet::from_symbols(colors));
            }
            if let Some(rarity) = &self.rarity {
                builder = builder.rarity(Rarity::parse(rarity));
            }
            Ok(builder.build())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DeckSlot {
        pub name: String,
        #[serde(default = "one")]
        pub count: u32,
    }

    fn one() -> u32 {
        1
    }

    /// On-disk decklist: card names resolved against a registry, plus optional custom
    /// cards registered first.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct DecklistFile {
        pub name: String,
        pub cards: Vec<DeckSlot>,
        pub custom_cards: Vec<CardRecord>,
    }

    impl DecklistFile {
        pub fn from_json(text: &str) -> Result<Self, CatalogError> {
            Ok(serde_json::from_str(text)?)
        }

        /// Registers the custom cards and resolves every slot.
        pub fn resolve(&self, registry: &mut CardRegistry) -> Result<Decklist, CatalogError> {
            for record in &self.custom_cards {
                registry.register(record.to_definition()?);
            }
            let mut deck = Decklist::new(self.name.clone());
            for slot in &self.cards {
                deck.add(registry.require(&slot.name)?, slot.count);
            }
            Ok(deck)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Keyword;

    #[test]
    fn test_basic_ai_deck_has_sixty_cards() {
        let registry = CardRegistry::with_builtin();
        let deck = registry.basic_ai_deck().expect("built-in deck should resolve");
        assert_eq!(deck.total_cards(), 60);
        assert_eq!(deck.expand().len(), 60);
        let lands = deck.expand().iter().filter(|card| card.is_land()).count();
        assert_eq!(lands, 24);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = CardRegistry::with_builtin();
        let found = registry.lookup("lightning bolt");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Lightning Bolt");

        let bears: Vec<String> = registry
            .lookup("bear")
            .iter()
            .map(|card| card.name.clone())
            .collect();
        assert_eq!(bears, vec!["Grizzly Bears", "Runeclaw Bear"]);
        assert!(registry.lookup("   ").is_empty());
    }

    #[test]
    fn test_builtin_keywords_are_parsed() {
        let registry = CardRegistry::with_builtin();
        let angel = registry.require("Serra Angel").expect("angel");
        assert!(angel.has_keyword(Keyword::Flying));
        assert!(angel.has_keyword(Keyword::Vigilance));
        let spider = registry.require("giant spider").expect("spider");
        assert!(spider.has_keyword(Keyword::Reach));
        assert!(matches!(
            registry.require("Black Lotus"),
            Err(CatalogError::UnknownCard(_))
        ));
    }

    #[test]
    fn test_decklist_merges_copies() {
        let registry = CardRegistry::with_builtin();
        let mut deck = Decklist::new("Bears");
        let bears = registry.require("Grizzly Bears").expect("bears");
        deck.add(bears.clone(), 2).add(bears, 3);
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.total_cards(), 5);
    }

    #[test]
    fn test_deck_store_falls_back_to_basic_deck() {
        let registry = CardRegistry::with_builtin();
        let mut store = MemoryDeckStore::new();
        let mono = Decklist::new("Mono Red").with(registry.require("Mountain").expect("land"), 20);
        store.insert("red", mono.clone());
        assert_eq!(load_or_basic(&store, &registry, "red").ok(), Some(mono));
        let fallback = load_or_basic(&store, &registry, "missing").expect("fallback");
        assert_eq!(fallback.name, "AI Basic Deck");
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_decklist_file_with_custom_card() {
        let text = r#"{
            "name": "Custom",
            "cards": [{"name": "Forest", "count": 10}, {"name": "Bog Brute"}],
            "custom_cards": [{
                "name": "Bog Brute",
                "mana_cost": "{2}{B}",
                "type_line": "Creature — Horror",
                "power": "3",
                "toughness": "2",
                "text": "Menace"
            }]
        }"#;
        let mut registry = CardRegistry::with_builtin();
        let deck = DecklistFile::from_json(text)
            .and_then(|file| file.resolve(&mut registry))
            .expect("deck should resolve");
        assert_eq!(deck.total_cards(), 11);
        let brute = registry.require("bog brute").expect("registered");
        assert!(brute.has_keyword(Keyword::Menace));
        assert_eq!(brute.base_power(), 3);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_unknown_card_in_file_is_an_error() {
        let file = DecklistFile {
            name: "Broken".to_string(),
            cards: vec![DeckSlot {
                name: "Nope".to_string(),
                count: 4,
            }],
            custom_cards: Vec::new(),
        };
        let mut registry = CardRegistry::with_builtin();
        assert!(matches!(
            file.resolve(&mut registry),
            Err(CatalogError::UnknownCard(name)) if name == "Nope"
        ));
    }
}
