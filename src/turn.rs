//! Turn structure.
//!
//! This module handles:
//! - Phase progression (Beginning, Main 1, Combat, Main 2, End)
//! - The beginning-of-turn untap and draw
//! - End-of-turn cleanup and passing the turn

use log::info;

use crate::game_state::{GameState, Phase};
use crate::ids::PlayerKey;
use crate::ledger::refresh_mana_pool;
use crate::rules::state_based::draw_or_lose;

/// What ending a phase led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTransition {
    /// Moved on within the same turn.
    Advanced(Phase),
    /// The End phase finished and `to` now has the turn, in its Beginning phase.
    TurnPassed { to: PlayerKey, turn_number: u32 },
}

/// Returns true in the main phases, when lands and sorcery-speed cards may be played.
pub fn is_sorcery_timing(game: &GameState) -> bool {
    game.turn.phase.is_main() && game.stack.is_empty()
}

/// Untaps the active player's permanents and removes summoning sickness.
pub fn execute_untap_step(game: &mut GameState) {
    let active = game.turn.active_player;
    let permanents = game.player(active).battlefield.clone();
    for id in permanents {
        if let Some(card) = game.instance_mut(id) {
            card.tapped = false;
            card.summoning_sick = false;
        }
    }
    game.player_mut(active).begin_turn();
    refresh_mana_pool(game, active);
}

/// The active player draws, except on the very first turn of the game.
pub fn execute_draw_step(game: &mut GameState) {
    if game.turn.turn_number == 1 {
        return;
    }
    let active = game.turn.active_player;
    if let Some(id) = draw_or_lose(game, active) {
        let name = game
            .instance(id)
            .map(|card| card.name().to_string())
            .unwrap_or_default();
        if active == PlayerKey::Player {
            game.push_log(format!("{active} draws {name}"));
        } else {
            game.push_log(format!("{active} draws a card"));
        }
    }
}

/// Everything that happens on entering the Beginning phase.
pub fn begin_turn(game: &mut GameState) {
    game.turn.phase = Phase::Beginning;
    info!(
        "turn {} begins for {}",
        game.turn.turn_number, game.turn.active_player
    );
    game.push_log(format!(
        "Turn {}: {}'s turn",
        game.turn.turn_number, game.turn.active_player
    ));
    execute_untap_step(game);
    execute_draw_step(game);
}

/// Heals damage and ends "until end of turn" effects on every creature, then hands the
/// turn to the other player.
pub fn end_turn(game: &mut GameState) -> PhaseTransition {
    for key in PlayerKey::BOTH {
        for id in game.creatures(key) {
            if let Some(card) = game.instance_mut(id) {
                card.cleanup();
                card.attacked_this_turn = false;
            }
        }
    }
    let next = game.turn.active_player.opponent();
    game.turn.active_player = next;
    game.turn.turn_number += 1;
    begin_turn(game);
    PhaseTransition::TurnPassed {
        to: next,
        turn_number: game.turn.turn_number,
    }
}

/// Ends the current phase.
pub fn advance_phase(game: &mut GameState) -> PhaseTransition {
    match game.turn.phase.next() {
        Some(next) => {
            game.turn.phase = next;
            game.push_log(format!("{}: {next} phase", game.turn.active_player));
            PhaseTransition::Advanced(next)
        }
        None => end_turn(game),
    }
}
