//! Mana symbols, structured costs and the pool snapshot used for payment checks.

use std::fmt;

use crate::color::{Color, ColorSet};

/// A single `{...}` symbol as it appears in a cost or in rules text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManaSymbol {
    /// `{W}`, `{U}`, `{B}`, `{R}`, `{G}`
    Colored(Color),
    /// `{C}`
    Colorless,
    /// `{1}`, `{2}`, ...
    Generic(u32),
    /// `{X}` (zero everywhere this engine looks at it)
    X,
    /// `{T}`
    Tap,
    /// Hybrid, phyrexian, snow and anything else we don't model.
    Other,
}

impl ManaSymbol {
    /// Parses the inside of a brace pair, e.g. `"2"`, `"R"`, `"T"`.
    pub fn parse(inner: &str) -> Self {
        let inner = inner.trim();
        if let Ok(n) = inner.parse::<u32>() {
            return ManaSymbol::Generic(n);
        }
        let mut chars = inner.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => match c.to_ascii_uppercase() {
                'C' => ManaSymbol::Colorless,
                'X' => ManaSymbol::X,
                'T' => ManaSymbol::Tap,
                other => Color::from_symbol(other)
                    .map(ManaSymbol::Colored)
                    .unwrap_or(ManaSymbol::Other),
            },
            _ => ManaSymbol::Other,
        }
    }
}

/// Every `{...}` symbol in `text`, in order. Unclosed braces end the scan.
pub fn symbols_in(text: &str) -> Vec<ManaSymbol> {
    let mut symbols = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        symbols.push(ManaSymbol::parse(&after[..close]));
        rest = &after[close + 1..];
    }
    symbols
}

/// A mana cost split into a generic amount and per-color requirements.
///
/// `{C}`, hybrid and phyrexian pips are folded into the generic amount; `{X}` counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ManaCost {
    pub generic: u32,
    colored: [u32; 5],
}

impl ManaCost {
    pub const FREE: ManaCost = ManaCost {
        generic: 0,
        colored: [0; 5],
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn generic(amount: u32) -> Self {
        Self {
            generic: amount,
            ..Self::default()
        }
    }

    /// Adds `amount` pips of `color`, returning the new cost.
    pub fn with_colored(mut self, color: Color, amount: u32) -> Self {
        self.colored[color.index()] += amount;
        self
    }

    /// Parses a catalog cost string such as `"{2}{R}{R}"`. Unknown symbols are ignored
    /// rather than rejected so that odd catalog data still yields a playable card.
    pub fn parse(text: &str) -> Self {
        let mut cost = ManaCost::new();
        for symbol in symbols_in(text) {
            cost.add_symbol(symbol);
        }
        cost
    }

    fn add_symbol(&mut self, symbol: ManaSymbol) {
        match symbol {
            ManaSymbol::Colored(color) => self.colored[color.index()] += 1,
            ManaSymbol::Generic(n) => self.generic += n,
            ManaSymbol::Colorless | ManaSymbol::Other => self.generic += 1,
            ManaSymbol::X | ManaSymbol::Tap => {}
        }
    }

    pub fn colored(&self, color: Color) -> u32 {
        self.colored[color.index()]
    }

    pub fn colored_total(&self) -> u32 {
        self.colored.iter().sum()
    }

    /// Converted mana cost: generic plus every colored pip.
    pub fn cmc(&self) -> u32 {
        self.generic + self.colored_total()
    }

    pub fn is_free(&self) -> bool {
        self.cmc() == 0
    }

    pub fn colors(&self) -> ColorSet {
        Color::ALL
            .into_iter()
            .filter(|c| self.colored(*c) > 0)
            .collect()
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 || self.colored_total() == 0 {
            write!(f, "{{{}}}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.colored(color) {
                write!(f, "{{{}}}", color.symbol())?;
            }
        }
        Ok(())
    }
}

/// Mana a player could produce right now, by color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct ManaPool {
    pub white: u32,
    pub blue: u32,
    pub black: u32,
    pub red: u32,
    pub green: u32,
    pub colorless: u32,
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds mana of one color, or colorless when `color` is `None`.
    pub fn add(&mut self, color: Option<Color>, amount: u32) {
        match color {
            Some(Color::White) => self.white += amount,
            Some(Color::Blue) => self.blue += amount,
            Some(Color::Black) => self.black += amount,
            Some(Color::Red) => self.red += amount,
            Some(Color::Green) => self.green += amount,
            None => self.colorless += amount,
        }
    }

    pub fn amount(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
        }
    }

    pub fn total(&self) -> u32 {
        self.white + self.blue + self.black + self.red + self.green + self.colorless
    }

    /// Every colored requirement must be met by matching mana; whatever is left over,
    /// colored or not, must cover the generic part.
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        let colors_met = Color::ALL
            .into_iter()
            .all(|color| self.amount(color) >= cost.colored(color));
        colors_met && self.total() - cost.colored_total() >= cost.generic
    }
}
