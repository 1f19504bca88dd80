use std::fmt;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "lowercase"))]
pub enum PlayerKey {
    Player,
    Ai,
}

impl PlayerKey {
    pub const BOTH: [PlayerKey; 2] = [PlayerKey::Player, PlayerKey::Ai];

    /// The other seat.
    pub const fn opponent(self) -> Self {
        match self {
            PlayerKey::Player => PlayerKey::Ai,
            PlayerKey::Ai => PlayerKey::Player,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            PlayerKey::Player => 0,
            PlayerKey::Ai => 1,
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKey::Player => write!(f, "Player"),
            PlayerKey::Ai => write!(f, "AI"),
        }
    }
}

/// Identifier of a card instance, stable for the lifetime of a game.
///
/// Unlike definitions, instances are allocated per game by [`InstanceIdAllocator`],
/// so two sessions running side by side never share an id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialization", serde(transparent))]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Create an instance ID from a specific value (for when you need explicit control).
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic per-game id source. Starts at 1; 0 is reserved.
#[derive(Debug, Clone)]
pub struct InstanceIdAllocator {
    next: u64,
}

impl InstanceIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }
}

impl Default for InstanceIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
