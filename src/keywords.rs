//! Keyword abilities recognized in rules text.
//!
//! Detection works over a closed vocabulary: each keyword is matched as a whole phrase
//! in the lowercased text with reminder text removed.

use std::fmt;

use crate::text::{contains_phrase, strip_reminder_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Keyword {
    Flying,
    Trample,
    FirstStrike,
    DoubleStrike,
    Deathtouch,
    Lifelink,
    Vigilance,
    Haste,
    Hexproof,
    Indestructible,
    Menace,
    Reach,
    Defender,
    Flash,
}

impl Keyword {
    pub const ALL: [Keyword; 14] = [
        Keyword::Flying,
        Keyword::Trample,
        Keyword::FirstStrike,
        Keyword::DoubleStrike,
        Keyword::Deathtouch,
        Keyword::Lifelink,
        Keyword::Vigilance,
        Keyword::Haste,
        Keyword::Hexproof,
        Keyword::Indestructible,
        Keyword::Menace,
        Keyword::Reach,
        Keyword::Defender,
        Keyword::Flash,
    ];

    /// The phrase as printed in lowercase rules text.
    pub fn phrase(self) -> &'static str {
        match self {
            Keyword::Flying => "flying",
            Keyword::Trample => "trample",
            Keyword::FirstStrike => "first strike",
            Keyword::DoubleStrike => "double strike",
            Keyword::Deathtouch => "deathtouch",
            Keyword::Lifelink => "lifelink",
            Keyword::Vigilance => "vigilance",
            Keyword::Haste => "haste",
            Keyword::Hexproof => "hexproof",
            Keyword::Indestructible => "indestructible",
            Keyword::Menace => "menace",
            Keyword::Reach => "reach",
            Keyword::Defender => "defender",
            Keyword::Flash => "flash",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = self.phrase();
        let mut chars = phrase.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

/// Keyword flags carried by a card instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeywordSet(u16);

impl KeywordSet {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    pub fn insert(&mut self, keyword: Keyword) {
        self.0 |= keyword.bit();
    }

    pub const fn with(self, keyword: Keyword) -> Self {
        Self(self.0 | keyword.bit())
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Every keyword printed in `rules_text`.
    pub fn detect(rules_text: &str) -> Self {
        let text = strip_reminder_text(rules_text).to_lowercase();
        Keyword::ALL
            .into_iter()
            .filter(|k| contains_phrase(&text, k.phrase()))
            .collect()
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        iter.into_iter().fold(KeywordSet::new(), KeywordSet::with)
    }
}
