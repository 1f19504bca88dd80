use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Parses a single-letter mana symbol (`W`, `U`, `B`, `R`, `G`), case-insensitive.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// The color a basic land of this name taps for.
    pub fn of_basic_land(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "plains" => Some(Color::White),
            "island" => Some(Color::Blue),
            "swamp" => Some(Color::Black),
            "mountain" => Some(Color::Red),
            "forest" => Some(Color::Green),
            _ => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
        }
    }
}

/// A set of colors represented as bitflags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const COLORLESS: Self = Self(0);

    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_color(color: Color) -> Self {
        Self(1 << color.index())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, color: Color) -> bool {
        self.0 & Self::from_color(color).0 != 0
    }

    pub const fn union(self, other: ColorSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn with(self, color: Color) -> Self {
        self.union(Self::from_color(color))
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Colors in WUBRG order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Collects every color letter found in a string such as `"{1}{R}{G}"` or `"RG"`.
    pub fn from_symbols(text: &str) -> Self {
        text.chars().filter_map(Color::from_symbol).collect()
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        iter.into_iter().fold(ColorSet::new(), ColorSet::with)
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "C");
        }
        for color in self.iter() {
            write!(f, "{}", color.symbol())?;
        }
        Ok(())
    }
}

#[cfg(feature = "serialization")]
impl serde::Serialize for ColorSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serialization")]
impl<'de> serde::Deserialize<'de> for ColorSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Ok(ColorSet::from_symbols(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_land_colors() {
        assert_eq!(Color::of_basic_land("Mountain"), Some(Color::Red));
        assert_eq!(Color::of_basic_land(" forest "), Some(Color::Green));
        assert_eq!(Color::of_basic_land("Wastes"), None);
    }

    #[test]
    fn test_from_symbols_ignores_generic() {
        let set = ColorSet::from_symbols("{2}{R}{G}");
        assert!(set.contains(Color::Red));
        assert!(set.contains(Color::Green));
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn test_display_is_wubrg_order() {
        let set: ColorSet = [Color::Green, Color::White].into_iter().collect();
        assert_eq!(set.to_string(), "WG");
        assert_eq!(ColorSet::COLORLESS.to_string(), "C");
    }
}
