//! Resource ledger: what mana a player can make and paying for things with it.
//!
//! There is no floating mana. Availability is derived from untapped permanents every
//! time it is asked for, and paying taps lands.

use crate::ability::mana_production;
use crate::color::Color;
use crate::game_state::GameState;
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::mana::{ManaCost, ManaPool};
use crate::object::CardInstance;

/// Mana one tap of `card` produces, ignoring whether it is tapped. Empty when the card
/// makes no mana.
pub fn mana_from(card: &CardInstance) -> Vec<Option<Color>> {
    let definition = &card.definition;
    if card.is_land() {
        if let Some(color) = Color::of_basic_land(&definition.name) {
            return vec![Some(color)];
        }
        if let Some(produced) = mana_production(&definition.rules_text) {
            return produced;
        }
        if let Some(color) = definition
            .type_line
            .subtypes
            .iter()
            .find_map(|subtype| Color::of_basic_land(subtype))
        {
            return vec![Some(color)];
        }
        return vec![None];
    }
    if card.is_creature() && card.summoning_sick && !card.has_keyword(Keyword::Haste) {
        return Vec::new();
    }
    mana_production(&definition.rules_text).unwrap_or_default()
}

/// Mana `player` could produce from untapped permanents.
pub fn available_mana(game: &GameState, player: PlayerKey) -> ManaPool {
    available_mana_excluding(game, player, None)
}

pub(crate) fn available_mana_excluding(
    game: &GameState,
    player: PlayerKey,
    exclude: Option<InstanceId>,
) -> ManaPool {
    let mut pool = ManaPool::new();
    for id in &game.player(player).battlefield {
        if Some(*id) == exclude {
            continue;
        }
        let Some(card) = game.instance(*id) else {
            continue;
        };
        if card.tapped {
            continue;
        }
        for color in mana_from(card) {
            pool.add(color, 1);
        }
    }
    pool
}

/// Color-aware payment check.
pub fn can_pay(pool: &ManaPool, cost: &ManaCost) -> bool {
    pool.can_pay(cost)
}

pub fn untapped_land_count(game: &GameState, player: PlayerKey) -> usize {
    untapped_lands(game, player, None).len()
}

fn untapped_lands(game: &GameState, player: PlayerKey, exclude: Option<InstanceId>) -> Vec<InstanceId> {
    game.player(player)
        .battlefield
        .iter()
        .copied()
        .filter(|id| Some(*id) != exclude)
        .filter(|id| {
            game.instance(*id)
                .is_some_and(|card| card.is_land() && !card.tapped)
        })
        .collect()
}

/// Taps the first `amount` untapped lands in battlefield order. All or nothing: with
/// fewer lands available nothing is tapped and false is returned.
pub fn auto_tap_lands(game: &mut GameState, player: PlayerKey, amount: u32) -> bool {
    auto_tap_lands_excluding(game, player, amount, None)
}

pub(crate) fn auto_tap_lands_excluding(
    game: &mut GameState,
    player: PlayerKey,
    amount: u32,
    exclude: Option<InstanceId>,
) -> bool {
    let lands = untapped_lands(game, player, exclude);
    if lands.len() < amount as usize {
        return false;
    }
    for id in lands.into_iter().take(amount as usize) {
        if let Some(card) = game.instance_mut(id) {
            card.tapped = true;
        }
    }
    refresh_mana_pool(game, player);
    true
}

/// Recomputes the stored pool snapshot.
pub fn refresh_mana_pool(game: &mut GameState, player: PlayerKey) {
    let pool = available_mana(game, player);
    game.player_mut(player).mana_pool = pool;
}
