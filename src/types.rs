use std::fmt;

/// Card types the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum CardType {
    Land,
    Creature,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Planeswalker,
}

impl CardType {
    pub const ALL: [CardType; 7] = [
        CardType::Land,
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Artifact,
        CardType::Enchantment,
        CardType::Planeswalker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CardType::Land => "Land",
            CardType::Creature => "Creature",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Artifact => "Artifact",
            CardType::Enchantment => "Enchantment",
            CardType::Planeswalker => "Planeswalker",
        }
    }

    fn parse(word: &str) -> Option<Self> {
        CardType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(word))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
    Special,
}

impl Rarity {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "mythic" | "mythic rare" => Rarity::Mythic,
            "special" | "bonus" => Rarity::Special,
            _ => Rarity::Common,
        }
    }
}

/// A parsed type line, e.g. `Basic Land — Mountain` or `Creature — Bear`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeLine {
    pub card_types: Vec<CardType>,
    pub basic: bool,
    pub legendary: bool,
    pub subtypes: Vec<String>,
}

impl TypeLine {
    /// Words left of the dash are supertypes/types; words right of it are subtypes.
    /// Accepts an em dash, en dash or a plain hyphen as the separator.
    pub fn parse(text: &str) -> Self {
        let (left, right) = text
            .split_once('—')
            .or_else(|| text.split_once('–'))
            .or_else(|| text.split_once(" - "))
            .unwrap_or((text, ""));

        let mut line = TypeLine::default();
        for word in left.split_whitespace() {
            if word.eq_ignore_ascii_case("basic") {
                line.basic = true;
            } else if word.eq_ignore_ascii_case("legendary") {
                line.legendary = true;
            } else if let Some(card_type) = CardType::parse(word)
                && !line.card_types.contains(&card_type)
            {
                line.card_types.push(card_type);
            }
        }
        line.subtypes = right.split_whitespace().map(str::to_string).collect();
        line
    }

    pub fn has(&self, card_type: CardType) -> bool {
        self.card_types.contains(&card_type)
    }
}

impl fmt::Display for TypeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<&str> = Vec::new();
        if self.basic {
            words.push("Basic");
        }
        if self.legendary {
            words.push("Legendary");
        }
        words.extend(self.card_types.iter().map(|t| t.name()));
        write!(f, "{}", words.join(" "))?;
        if !self.subtypes.is_empty() {
            write!(f, " — {}", self.subtypes.join(" "))?;
        }
        Ok(())
    }
}
