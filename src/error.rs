use thiserror::Error;

use crate::game_state::Phase;
use crate::ids::{InstanceId, PlayerKey};
use crate::rules::combat::AttackRestriction;
use crate::zone::Zone;

/// Why an action was rejected. A rejected action never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The game is over; nothing else may happen.
    #[error("TerminalState")]
    TerminalState,

    #[error("It is not {0}'s turn")]
    NotYourTurn(PlayerKey),

    #[error("Can't do that during the {0} phase")]
    WrongPhase(Phase),

    #[error("Already played a land this turn")]
    LandLimitReached,

    #[error("Not enough mana: need {required}, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("Can't produce the colored mana this costs")]
    CannotPayColors,

    #[error("No card {id} in {zone}")]
    CardNotFound { id: InstanceId, zone: Zone },

    #[error("Not a creature")]
    NotACreature,

    #[error("Can't attack: {0}")]
    CannotAttack(AttackRestriction),

    #[error("No ability at index {0}")]
    InvalidAbilityIndex(usize),

    #[error("Not an activated ability")]
    NotAnActivatedAbility,

    #[error("Already tapped")]
    AlreadyTapped,

    #[error("Summoning sickness")]
    SummoningSick,

    #[error("Mulligans are only allowed before the first action")]
    MulliganClosed,

    #[error("No mulligans left")]
    MulliganLimitReached,
}

/// Failures while turning catalog data into decks.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown card '{0}'")]
    UnknownCard(String),

    #[error("Deck '{0}' not found")]
    DeckNotFound(String),

    #[error("Bad power/toughness '{0}'")]
    InvalidPowerToughness(String),

    #[cfg(feature = "serialization")]
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
