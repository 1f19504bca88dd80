//! Combat damage resolution.
//!
//! One attacker, at most one blocker. Steps run in a fixed order: first-strike damage
//! to the blocker (when only the attacker strikes first), regular damage both ways, then
//! the extra hit from double strike while the blocker is still alive. A blocker killed
//! by first-strike damage ends the encounter on the spot. Lifelink and trample belong
//! to the regular step. Deathtouch (attacker side) applies to every hit, and
//! indestructible creatures never die from damage.

use crate::game_state::GameState;
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::object::CardInstance;
use crate::zone::Zone;

/// The target of a combat hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTarget {
    Creature(InstanceId),
    Player(PlayerKey),
}

/// What a single hit does, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageResult {
    pub damage_dealt: u32,
    /// Life the source's controller gains from lifelink.
    pub life_gained: u32,
    /// Deathtouch makes any damage to a creature lethal.
    pub lethal: bool,
}

/// Works out one hit from `source` at its current power.
///
/// Deathtouch only counts when `deathtouch_applies`; the blocker's deathtouch is ignored.
pub fn calculate_damage(
    source: &CardInstance,
    target: DamageTarget,
    deathtouch_applies: bool,
) -> DamageResult {
    let damage_dealt = source.power.max(0) as u32;
    if damage_dealt == 0 {
        return DamageResult::default();
    }
    DamageResult {
        damage_dealt,
        life_gained: if source.has_keyword(Keyword::Lifelink) {
            damage_dealt
        } else {
            0
        },
        lethal: deathtouch_applies
            && matches!(target, DamageTarget::Creature(_))
            && source.has_keyword(Keyword::Deathtouch),
    }
}

/// Damage that tramples over a destroyed blocker.
pub fn calculate_trample_excess(attacker_power: i32, blocker_toughness: i32) -> u32 {
    (attacker_power - blocker_toughness).max(0) as u32
}

struct CombatLog<'a> {
    game: &'a mut GameState,
    lines: Vec<String>,
}

impl CombatLog<'_> {
    fn say(&mut self, line: String) {
        self.game.push_log(line.clone());
        self.lines.push(line);
    }

    fn on_battlefield(&self, id: InstanceId) -> bool {
        self.game
            .instance(id)
            .is_some_and(|card| card.zone == Zone::Battlefield)
    }

    /// Applies one hit and returns the damage dealt. Lifelink is only paid out when
    /// `lifelink_applies`.
    fn hit(
        &mut self,
        source: InstanceId,
        target: DamageTarget,
        deathtouch_applies: bool,
        lifelink_applies: bool,
    ) -> u32 {
        let Some(card) = self.game.instance(source) else {
            return 0;
        };
        let result = calculate_damage(card, target, deathtouch_applies);
        let source_name = card.name().to_string();
        let controller = card.controller;
        if result.damage_dealt == 0 {
            return 0;
        }

        let target_name = match target {
            DamageTarget::Player(key) => {
                self.game.player_mut(key).deal_damage(result.damage_dealt);
                key.to_string()
            }
            DamageTarget::Creature(id) => {
                let Some(victim) = self.game.instance_mut(id) else {
                    return 0;
                };
                victim.toughness -= result.damage_dealt as i32;
                if result.lethal {
                    victim.toughness = victim.toughness.min(0);
                }
                victim.name().to_string()
            }
        };
        self.say(format!(
            "{source_name} deals {} damage to {target_name}",
            result.damage_dealt
        ));
        if lifelink_applies && result.life_gained > 0 {
            self.game.player_mut(controller).gain_life(result.life_gained);
            self.say(format!(
                "{controller} gains {} life (lifelink)",
                result.life_gained
            ));
        }
        result.damage_dealt
    }

    /// Sends a creature at 0 or less toughness to the graveyard. True if it died.
    fn destroy_if_lethal(&mut self, id: InstanceId) -> bool {
        let Some(card) = self.game.instance(id) else {
            return false;
        };
        if card.toughness > 0 || card.has_keyword(Keyword::Indestructible) {
            return false;
        }
        let name = card.name().to_string();
        self.game.move_instance(id, Zone::Graveyard);
        self.say(format!("{name} dies"));
        true
    }

    /// Uses the attacker as it was before damage, so trample still happens when both
    /// creatures die at once.
    fn trample_over(&mut self, attacker: &CardInstance, blocker_toughness: i32, defender: PlayerKey) {
        if !attacker.has_keyword(Keyword::Trample) {
            return;
        }
        let excess = calculate_trample_excess(attacker.power, blocker_toughness);
        if excess == 0 {
            return;
        }
        self.game.player_mut(defender).deal_damage(excess);
        self.say(format!(
            "{} tramples over for {excess} damage to {defender}",
            attacker.name()
        ));
    }
}

/// Resolves combat between `attacker` and an optional `blocker`. Returns the log lines,
/// which are also appended to the game log.
///
/// A blocker that is missing or no longer on the battlefield counts as no block.
pub fn resolve_combat_damage(
    game: &mut GameState,
    attacker: InstanceId,
    blocker: Option<InstanceId>,
    attacker_owner: PlayerKey,
) -> Vec<String> {
    let defender = attacker_owner.opponent();
    let mut combat = CombatLog {
        game,
        lines: Vec::new(),
    };
    let Some(before) = combat.game.instance(attacker).cloned() else {
        return combat.lines;
    };
    let attacker_first = before.strikes_first();
    let double_strike = before.has_keyword(Keyword::DoubleStrike);

    let blocker = blocker.filter(|id| combat.on_battlefield(*id));
    let Some(blocker) = blocker else {
        combat.hit(attacker, DamageTarget::Player(defender), false, true);
        return combat.lines;
    };

    let Some(blocking) = combat.game.instance(blocker) else {
        return combat.lines;
    };
    let blocker_toughness = blocking.toughness;
    let blocker_first = blocking.strikes_first();
    let blocks = format!("{} blocks {}", blocking.name(), before.name());
    combat.say(blocks);

    if attacker_first && !blocker_first {
        combat.hit(attacker, DamageTarget::Creature(blocker), true, false);
        if combat.destroy_if_lethal(blocker) {
            return combat.lines;
        }
    }

    combat.hit(attacker, DamageTarget::Creature(blocker), true, true);
    combat.hit(blocker, DamageTarget::Creature(attacker), false, true);
    let attacker_died = combat.destroy_if_lethal(attacker);
    if combat.destroy_if_lethal(blocker) {
        combat.trample_over(&before, blocker_toughness, defender);
        return combat.lines;
    }

    // A dead attacker deals no further damage.
    if double_strike && !attacker_died {
        combat.hit(attacker, DamageTarget::Creature(blocker), true, false);
        combat.destroy_if_lethal(blocker);
    }
    combat.lines
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::rules::combat::tests::make_creature;

    fn place(game: &mut GameState, owner: PlayerKey, name: &str, p: i32, t: i32, text: &str) -> InstanceId {
        let def = Arc::new(make_creature(name, p, t, text));
        let id = game.create_instance(def, owner, Zone::Battlefield);
        if let Some(card) = game.instance_mut(id) {
            card.keywords = card.definition.keywords;
        }
        id
    }

    fn zone_of(game: &GameState, id: InstanceId) -> Zone {
        game.instance(id).map(|c| c.zone).unwrap_or(Zone::Library)
    }

    #[test]
    fn test_unblocked_hits_player() {
        let mut game = GameState::new(20);
        let bear = place(&mut game, PlayerKey::Player, "Bear", 2, 2, "");
        let log = resolve_combat_damage(&mut game, bear, None, PlayerKey::Player);
        assert_eq!(game.player(PlayerKey::Ai).life, 18);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_trade_kills_both() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Bear", 2, 2, "");
        let b = place(&mut game, PlayerKey::Ai, "Other Bear", 2, 2, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, a), Zone::Graveyard);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.player(PlayerKey::Ai).life, 20);
    }

    #[test]
    fn test_trample_excess_uses_pre_combat_toughness() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Wurm", 5, 5, "Trample");
        let b = place(&mut game, PlayerKey::Ai, "Bear", 2, 2, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(game.player(PlayerKey::Ai).life, 17);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(zone_of(&game, a), Zone::Battlefield);
    }

    #[test]
    fn test_trample_still_happens_when_attacker_dies_too() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Raging Beast", 5, 2, "Trample");
        let b = place(&mut game, PlayerKey::Ai, "Bear", 2, 2, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, a), Zone::Graveyard);
        assert_eq!(game.player(PlayerKey::Ai).life, 17);
    }

    #[test]
    fn test_no_trample_when_blocker_survives() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Boar", 3, 3, "Trample");
        let b = place(&mut game, PlayerKey::Ai, "Wall", 0, 5, "Defender");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(game.player(PlayerKey::Ai).life, 20);
        assert_eq!(zone_of(&game, b), Zone::Battlefield);
    }

    #[test]
    fn test_first_strike_kills_before_damage_back() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Knight", 2, 2, "First strike");
        let b = place(&mut game, PlayerKey::Ai, "Bear", 2, 2, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(zone_of(&game, a), Zone::Battlefield);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(2));
    }

    #[test]
    fn test_first_strike_against_first_strike_is_simultaneous() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Knight", 2, 2, "First strike");
        let b = place(&mut game, PlayerKey::Ai, "Other Knight", 2, 2, "First strike");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, a), Zone::Graveyard);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
    }

    #[test]
    fn test_lifelink_gains_damage_dealt() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Cleric", 3, 3, "Lifelink");
        resolve_combat_damage(&mut game, a, None, PlayerKey::Player);
        assert_eq!(game.player(PlayerKey::Player).life, 23);
        assert_eq!(game.player(PlayerKey::Ai).life, 17);
    }

    #[test]
    fn test_blocker_lifelink_counts_too() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Bear", 2, 2, "");
        let b = place(&mut game, PlayerKey::Ai, "Cleric", 1, 4, "Lifelink");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(game.player(PlayerKey::Ai).life, 21);
    }

    #[test]
    fn test_deathtouch_kills_any_blocker() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Snake", 1, 1, "Deathtouch");
        let b = place(&mut game, PlayerKey::Ai, "Giant", 3, 6, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(zone_of(&game, a), Zone::Graveyard);
    }

    #[test]
    fn test_blocker_deathtouch_is_ignored() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Giant", 3, 6, "");
        let b = place(&mut game, PlayerKey::Ai, "Snake", 1, 1, "Deathtouch");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, a), Zone::Battlefield);
    }

    #[test]
    fn test_double_strike_unblocked_hits_once() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Duelist", 3, 3, "Double strike");
        resolve_combat_damage(&mut game, a, None, PlayerKey::Player);
        assert_eq!(game.player(PlayerKey::Ai).life, 17);
    }

    #[test]
    fn test_double_strike_regular_hit_finishes_blocker() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Duelist", 2, 3, "Double strike");
        let b = place(&mut game, PlayerKey::Ai, "Ogre", 2, 3, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(zone_of(&game, a), Zone::Battlefield);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(1));
    }

    #[test]
    fn test_indestructible_survives_lethal_damage() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Giant", 5, 5, "");
        let b = place(&mut game, PlayerKey::Ai, "Golem", 1, 1, "Indestructible");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Battlefield);
        assert_eq!(game.player(PlayerKey::Ai).life, 20);
    }

    #[test]
    fn test_missing_attacker_is_noop() {
        let mut game = GameState::new(20);
        let log = resolve_combat_damage(&mut game, InstanceId::from_raw(42), None, PlayerKey::Ai);
        assert!(log.is_empty());
        assert_eq!(game.player(PlayerKey::Player).life, 20);
    }

    #[test]
    fn test_same_inputs_same_outcome() {
        let build = || {
            let mut game = GameState::new(20);
            let a = place(&mut game, PlayerKey::Player, "Wurm", 6, 4, "Trample, lifelink");
            let b = place(&mut game, PlayerKey::Ai, "Bear", 2, 2, "");
            (game, a, b)
        };
        let (mut first, a1, b1) = build();
        let (mut second, a2, b2) = build();
        let log1 = resolve_combat_damage(&mut first, a1, Some(b1), PlayerKey::Player);
        let log2 = resolve_combat_damage(&mut second, a2, Some(b2), PlayerKey::Player);
        assert_eq!(log1, log2);
        assert_eq!(first.player(PlayerKey::Ai).life, second.player(PlayerKey::Ai).life);
        assert_eq!(first.player(PlayerKey::Player).life, 26);
        assert_eq!(first.player(PlayerKey::Ai).life, 16);
    }

    #[test]
    fn test_trample_with_lifelink_gains_power_once() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Knight", 5, 5, "Trample, lifelink");
        let b = place(&mut game, PlayerKey::Ai, "Squire", 1, 2, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.player(PlayerKey::Player).life, 25);
        assert_eq!(game.player(PlayerKey::Ai).life, 17);
    }

    #[test]
    fn test_first_strike_kill_ends_the_encounter() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Knight", 5, 5, "First strike, trample, lifelink");
        let b = place(&mut game, PlayerKey::Ai, "Squire", 1, 2, "");
        let log = resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.player(PlayerKey::Ai).life, 20);
        assert_eq!(game.player(PlayerKey::Player).life, 20);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(5));
        assert!(!log.iter().any(|line| line.contains("tramples")));
    }

    #[test]
    fn test_first_strike_survivor_takes_regular_damage_too() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Knight", 2, 5, "First strike");
        let b = place(&mut game, PlayerKey::Ai, "Wall", 1, 5, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(game.instance(b).map(|c| c.toughness), Some(1));
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(4));
    }

    #[test]
    fn test_first_strike_deathtouch_trample_kills_first() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Assassin", 3, 3, "First strike, deathtouch, trample");
        let b = place(&mut game, PlayerKey::Ai, "Giant", 2, 6, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(3));
        assert_eq!(game.player(PlayerKey::Ai).life, 20);
    }

    #[test]
    fn test_first_strike_deathtouch_trample_against_first_strike() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Assassin", 4, 4, "First strike, deathtouch, trample");
        let b = place(&mut game, PlayerKey::Ai, "Knight", 2, 2, "First strike");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(2));
        assert_eq!(game.player(PlayerKey::Ai).life, 18);
    }

    #[test]
    fn test_double_strike_trample_kill_in_first_step() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Champion", 3, 3, "Double strike, trample");
        let b = place(&mut game, PlayerKey::Ai, "Squire", 1, 1, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.player(PlayerKey::Ai).life, 20);
    }

    #[test]
    fn test_double_strike_trample_against_first_strike_blocker() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Champion", 4, 4, "Double strike, trample");
        let b = place(&mut game, PlayerKey::Ai, "Knight", 1, 2, "First strike");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(3));
        assert_eq!(game.player(PlayerKey::Ai).life, 18);
    }

    #[test]
    fn test_double_strike_extra_hit_on_surviving_blocker() {
        let mut game = GameState::new(20);
        let a = place(&mut game, PlayerKey::Player, "Champion", 2, 4, "Double strike");
        let b = place(&mut game, PlayerKey::Ai, "Wall", 1, 6, "");
        resolve_combat_damage(&mut game, a, Some(b), PlayerKey::Player);
        assert_eq!(zone_of(&game, b), Zone::Graveyard);
        assert_eq!(game.instance(a).map(|c| c.toughness), Some(3));
    }
}
