//! Game-over detection and the creature-death sweep.
//!
//! A player loses at 0 or less life, or when asked to draw from an empty library.
//! The first loss recorded ends the game; nothing overwrites it.

use std::fmt;

use log::info;

use crate::game_state::GameState;
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOverReason {
    LifeDepleted,
    EmptyLibrary,
    Concession,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::LifeDepleted => write!(f, "life total reached 0"),
            GameOverReason::EmptyLibrary => write!(f, "drew from an empty library"),
            GameOverReason::Concession => write!(f, "conceded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct GameResult {
    pub winner: PlayerKey,
    pub loser: PlayerKey,
    pub reason: GameOverReason,
}

impl GameResult {
    pub fn loss(loser: PlayerKey, reason: GameOverReason) -> Self {
        Self {
            winner: loser.opponent(),
            loser,
            reason,
        }
    }
}

/// Life-total check. The human player is looked at first, so simultaneous depletion
/// counts as a loss for the human.
pub fn check_game_over(game: &GameState) -> Option<GameResult> {
    PlayerKey::BOTH
        .into_iter()
        .find(|key| game.player(*key).has_lethal_life())
        .map(|key| GameResult::loss(key, GameOverReason::LifeDepleted))
}

/// Runs the life check and records the result if the game just ended.
pub fn apply_game_over_checks(game: &mut GameState) -> Option<GameResult> {
    if let Some(result) = game.game_over {
        return Some(result);
    }
    let result = check_game_over(game)?;
    Some(record_loss(game, result.loser, result.reason))
}

/// Ends the game with `loser` losing, unless it already ended.
pub fn record_loss(game: &mut GameState, loser: PlayerKey, reason: GameOverReason) -> GameResult {
    if let Some(existing) = game.game_over {
        return existing;
    }
    let result = GameResult::loss(loser, reason);
    game.game_over = Some(result);
    info!(
        "game over on turn {}: {} {}, {} wins",
        game.turn.turn_number, loser, reason, result.winner
    );
    game.push_log(format!("{loser} {reason}. {} wins!", result.winner));
    result
}

/// Draws one card; an empty library loses the game on the spot.
pub fn draw_or_lose(game: &mut GameState, key: PlayerKey) -> Option<InstanceId> {
    match game.draw_card(key) {
        Some(id) => Some(id),
        None => {
            record_loss(game, key, GameOverReason::EmptyLibrary);
            None
        }
    }
}

/// Moves every creature with toughness 0 or less to its graveyard, skipping
/// indestructible ones. Returns log lines for the creatures that died.
pub fn put_dead_creatures_in_graveyard(game: &mut GameState) -> Vec<String> {
    let dead: Vec<(InstanceId, String)> = PlayerKey::BOTH
        .into_iter()
        .flat_map(|key| game.creatures(key))
        .filter_map(|id| {
            let creature = game.instance(id)?;
            (creature.toughness <= 0 && !creature.has_keyword(Keyword::Indestructible))
                .then(|| (id, creature.name().to_string()))
        })
        .collect();

    let mut messages = Vec::new();
    for (id, name) in dead {
        game.move_instance(id, Zone::Graveyard);
        let message = format!("{name} dies");
        game.push_log(message.clone());
        messages.push(message);
    }
    messages
}
