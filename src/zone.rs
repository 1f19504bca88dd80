use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    /// Where instants and sorceries wait while they resolve.
    Stack,
}

impl Zone {
    /// Returns true if objects in this zone are public (visible to both players).
    pub fn is_public(&self) -> bool {
        matches!(self, Zone::Battlefield | Zone::Graveyard | Zone::Stack)
    }

    /// Returns true if cards in this zone are ordered (order matters).
    pub fn is_ordered(&self) -> bool {
        matches!(self, Zone::Library | Zone::Stack | Zone::Graveyard)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Battlefield => "battlefield",
            Zone::Graveyard => "graveyard",
            Zone::Stack => "stack",
        };
        write!(f, "{name}")
    }
}
