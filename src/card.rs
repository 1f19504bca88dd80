use crate::ability::{AbilityDescriptor, parse_abilities};
use crate::color::{Color, ColorSet};
use crate::keywords::{Keyword, KeywordSet};
use crate::mana::{ManaCost, ManaSymbol, symbols_in};
use crate::types::{CardType, Rarity, TypeLine};

/// Represents power or toughness values that may be variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtValue {
    Fixed(i32),
    /// `*`, determined by some characteristic we don't model
    Star,
    /// `*+1` and friends
    StarPlus(i32),
}

impl PtValue {
    /// Parses catalog strings like `"3"`, `"*"`, `"1+*"`, `"*+1"`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i32>() {
            return Some(PtValue::Fixed(n));
        }
        if text == "*" {
            return Some(PtValue::Star);
        }
        let bonus = text
            .strip_prefix("*+")
            .or_else(|| text.strip_suffix("+*"))?;
        bonus.trim().parse().ok().map(PtValue::StarPlus)
    }

    /// Returns the base numeric value, treating Star as 0.
    pub fn base_value(self) -> i32 {
        match self {
            PtValue::Fixed(n) => n,
            PtValue::Star => 0,
            PtValue::StarPlus(n) => n,
        }
    }
}

/// Printed power and toughness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerToughness {
    pub power: PtValue,
    pub toughness: PtValue,
}

impl PowerToughness {
    pub fn fixed(power: i32, toughness: i32) -> Self {
        Self {
            power: PtValue::Fixed(power),
            toughness: PtValue::Fixed(toughness),
        }
    }
}

/// Immutable card definition as supplied by the catalog.
///
/// Abilities and keywords are parsed once when the definition is built, so every
/// instance of the card shares the same descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDefinition {
    pub name: String,
    pub mana_cost: ManaCost,
    pub type_line: TypeLine,
    pub power_toughness: Option<PowerToughness>,
    pub rules_text: String,
    pub colors: ColorSet,
    pub rarity: Rarity,
    pub keywords: KeywordSet,
    pub abilities: Vec<AbilityDescriptor>,
}

impl CardDefinition {
    pub fn builder(name: impl Into<String>) -> CardDefinitionBuilder {
        CardDefinitionBuilder::new(name)
    }

    pub fn has_type(&self, card_type: CardType) -> bool {
        self.type_line.has(card_type)
    }

    pub fn is_land(&self) -> bool {
        self.has_type(CardType::Land)
    }

    pub fn is_creature(&self) -> bool {
        self.has_type(CardType::Creature)
    }

    /// Instants and sorceries: resolve, then go to the graveyard.
    pub fn is_spell_only(&self) -> bool {
        self.has_type(CardType::Instant) || self.has_type(CardType::Sorcery)
    }

    /// Castable outside the main phases.
    pub fn has_instant_timing(&self) -> bool {
        self.has_type(CardType::Instant) || self.keywords.contains(Keyword::Flash)
    }

    pub fn cmc(&self) -> u32 {
        self.mana_cost.cmc()
    }

    pub fn base_power(&self) -> i32 {
        self.power_toughness.map_or(0, |pt| pt.power.base_value())
    }

    pub fn base_toughness(&self) -> i32 {
        self.power_toughness.map_or(0, |pt| pt.toughness.base_value())
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }
}

/// Builder for [`CardDefinition`].
#[derive(Debug, Clone)]
pub struct CardDefinitionBuilder {
    name: String,
    mana_cost: ManaCost,
    type_line: TypeLine,
    power_toughness: Option<PowerToughness>,
    rules_text: String,
    colors: Option<ColorSet>,
    rarity: Rarity,
}

impl CardDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mana_cost: ManaCost::new(),
            type_line: TypeLine::default(),
            power_toughness: None,
            rules_text: String::new(),
            colors: None,
            rarity: Rarity::Common,
        }
    }

    /// Sets the cost from a catalog string such as `"{1}{G}"`.
    pub fn mana_cost(mut self, cost: &str) -> Self {
        self.mana_cost = ManaCost::parse(cost);
        self
    }

    pub fn type_line(mut self, type_line: &str) -> Self {
        self.type_line = TypeLine::parse(type_line);
        self
    }

    pub fn power_toughness(mut self, pt: PowerToughness) -> Self {
        self.power_toughness = Some(pt);
        self
    }

    pub fn rules_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = text.into();
        self
    }

    /// Overrides the derived color identity.
    pub fn colors(mut self, colors: ColorSet) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn build(self) -> CardDefinition {
        let colors = self
            .colors
            .unwrap_or_else(|| color_identity(&self.mana_cost, &self.rules_text));
        let mut definition = CardDefinition {
            name: self.name,
            mana_cost: self.mana_cost,
            type_line: self.type_line,
            power_toughness: self.power_toughness,
            rules_text: self.rules_text,
            colors,
            rarity: self.rarity,
            keywords: KeywordSet::new(),
            abilities: Vec::new(),
        };
        definition.abilities = parse_abilities(&definition);
        definition.keywords = definition
            .abilities
            .iter()
            .filter_map(AbilityDescriptor::keyword)
            .collect();
        definition
    }
}

/// Colors from cost pips plus colored symbols anywhere in the rules text.
fn color_identity(cost: &ManaCost, rules_text: &str) -> ColorSet {
    symbols_in(rules_text)
        .into_iter()
        .filter_map(|symbol| match symbol {
            ManaSymbol::Colored(color) => Some(color),
            _ => None,
        })
        .fold(cost.colors(), ColorSet::with)
}

/// Basic land of the given color, named the way the catalog names them.
pub fn basic_land(color: Color) -> CardDefinition {
    let name = match color {
        Color::White => "Plains",
        Color::Blue => "Island",
        Color::Black => "Swamp",
        Color::Red => "Mountain",
        Color::Green => "Forest",
    };
    CardDefinition::builder(name)
        .type_line(&format!("Basic Land — {name}"))
        .rules_text(format!("({{T}}: Add {{{}}}.)", color.symbol()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_value_parse() {
        assert_eq!(PtValue::parse("3"), Some(PtValue::Fixed(3)));
        assert_eq!(PtValue::parse("*"), Some(PtValue::Star));
        assert_eq!(PtValue::parse("*+1"), Some(PtValue::StarPlus(1)));
        assert_eq!(PtValue::parse("1+*"), Some(PtValue::StarPlus(1)));
        assert_eq!(PtValue::parse("x"), None);
    }

    #[test]
    fn test_builder_derives_colors_and_keywords() {
        let card = CardDefinition::builder("Serra Angel")
            .mana_cost("{3}{W}{W}")
            .type_line("Creature — Angel")
            .power_toughness(PowerToughness::fixed(4, 4))
            .rules_text("Flying, vigilance")
            .build();
        assert!(card.is_creature());
        assert_eq!(card.cmc(), 5);
        assert!(card.colors.contains(Color::White));
        assert!(card.has_keyword(Keyword::Flying));
        assert!(card.has_keyword(Keyword::Vigilance));
        assert_eq!(card.base_power(), 4);
    }

    #[test]
    fn test_basic_land_identity_follows_its_mana() {
        let forest = basic_land(Color::Green);
        assert!(forest.is_land());
        assert!(forest.type_line.basic);
        assert_eq!(forest.cmc(), 0);
        assert!(forest.colors.contains(Color::Green));
        assert!(forest.abilities.is_empty());
    }

    #[test]
    fn test_flash_gives_instant_timing() {
        let card = CardDefinition::builder("Ambush Viper")
            .mana_cost("{1}{G}")
            .type_line("Creature — Snake")
            .power_toughness(PowerToughness::fixed(2, 1))
            .rules_text("Flash\nDeathtouch")
            .build();
        assert!(card.has_instant_timing());
        assert!(!card.is_spell_only());
    }
}
