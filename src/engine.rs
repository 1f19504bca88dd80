//! The game session and the action API.
//!
//! [`GameEngine`] owns one [`GameState`] and is the only thing that mutates it. Every
//! action is validated in full before anything changes, so a rejected action leaves the
//! game exactly as it was.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::Decklist;
use crate::config::GameConfig;
use crate::error::ActionError;
use crate::executor::{self, apply_static, resolve_spell, trigger_attack, trigger_etb};
use crate::game_state::{GameState, Phase};
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::ledger::{auto_tap_lands, available_mana, can_pay, refresh_mana_pool, untapped_land_count};
use crate::rules::combat::{can_attack, can_block, select_blocker};
use crate::rules::damage::resolve_combat_damage;
use crate::rules::state_based::{GameOverReason, GameResult, apply_game_over_checks, record_loss};
use crate::snapshot::GameSnapshot;
use crate::turn::{self, PhaseTransition, is_sorcery_timing};
use crate::zone::Zone;

/// The narrow surface through which players (human or AI) act on a game.
pub trait ActionApi {
    /// Plays a land or casts a spell from `player`'s hand.
    fn play_card(&mut self, player: PlayerKey, id: InstanceId) -> Result<Vec<String>, ActionError>;

    /// Attacks with one creature. Combat resolves immediately.
    fn declare_attacker(
        &mut self,
        player: PlayerKey,
        id: InstanceId,
    ) -> Result<Vec<String>, ActionError>;

    /// Readies one of `player`'s creatures to block when the opponent attacks.
    fn declare_blocker(
        &mut self,
        player: PlayerKey,
        id: InstanceId,
    ) -> Result<Vec<String>, ActionError>;

    fn activate_ability(
        &mut self,
        player: PlayerKey,
        id: InstanceId,
        index: usize,
    ) -> Result<Vec<String>, ActionError>;

    fn end_phase(&mut self, player: PlayerKey) -> Result<PhaseTransition, ActionError>;

    fn snapshot(&self) -> GameSnapshot;
}

#[derive(Debug, Clone)]
pub struct GameEngine {
    state: GameState,
    config: GameConfig,
    rng: StdRng,
    /// Creatures that already blocked during the current turn.
    blocked_this_turn: Vec<InstanceId>,
}

impl GameEngine {
    /// Builds both libraries, shuffles them, deals opening hands and opens the mulligan
    /// window. The human player takes the first turn.
    pub fn new(player_deck: &Decklist, ai_deck: &Decklist, config: GameConfig) -> Self {
        let mut state = GameState::new(config.starting_life);
        for (key, deck) in [(PlayerKey::Player, player_deck), (PlayerKey::Ai, ai_deck)] {
            for definition in deck.expand() {
                state.create_instance(definition, key, Zone::Library);
            }
        }

        let mut engine = Self::from_state(state, config);
        let hand_size = engine.config.opening_hand_size;
        for key in PlayerKey::BOTH {
            engine.shuffle_and_draw(key, hand_size);
        }
        engine.state.mulligan_window_open = true;
        info!(
            "new game: {} ({} cards) vs {} ({} cards)",
            player_deck.name,
            player_deck.total_cards(),
            ai_deck.name,
            ai_deck.total_cards()
        );
        turn::begin_turn(&mut engine.state);
        engine
    }

    /// Wraps an existing state without dealing anything.
    pub fn from_state(state: GameState, config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            state,
            config,
            rng,
            blocked_this_turn: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn shuffle_and_draw(&mut self, key: PlayerKey, count: u32) {
        self.state.player_mut(key).shuffle_library(&mut self.rng);
        for _ in 0..count {
            if self.state.draw_card(key).is_none() {
                break;
            }
        }
    }

    /// Logs a player-visible line and collects it for the caller.
    fn announce(&mut self, messages: &mut Vec<String>, line: String) {
        self.state.push_log(line.clone());
        messages.push(line);
    }

    fn ensure_can_act(&self, player: PlayerKey) -> Result<(), ActionError> {
        if self.state.is_over() {
            return Err(ActionError::TerminalState);
        }
        if self.state.active_player() != player {
            return Err(ActionError::NotYourTurn(player));
        }
        Ok(())
    }

    /// Puts `player`'s hand back, reshuffles, and draws one card fewer than last time.
    pub fn mulligan(&mut self, player: PlayerKey) -> Result<Vec<String>, ActionError> {
        if self.state.is_over() {
            return Err(ActionError::TerminalState);
        }
        if !self.state.mulligan_window_open {
            return Err(ActionError::MulliganClosed);
        }
        if self.state.player(player).mulligans_taken >= self.config.max_mulligans {
            return Err(ActionError::MulliganLimitReached);
        }

        for id in self.state.player(player).hand.clone() {
            self.state.move_instance(id, Zone::Library);
        }
        let taken = {
            let state = self.state.player_mut(player);
            state.mulligans_taken += 1;
            state.mulligans_taken
        };
        let hand_size = self.config.opening_hand_size.saturating_sub(taken);
        self.shuffle_and_draw(player, hand_size);

        let mut messages = Vec::new();
        self.announce(&mut messages, format!("{player} mulligans to {hand_size}"));
        Ok(messages)
    }

    /// Keeps the current hand and closes the mulligan window for both players.
    pub fn keep_hand(&mut self, player: PlayerKey) -> Result<Vec<String>, ActionError> {
        if self.state.is_over() {
            return Err(ActionError::TerminalState);
        }
        let mut messages = Vec::new();
        if self.state.mulligan_window_open {
            self.close_mulligan_window();
            let size = self.state.player(player).hand.len();
            self.announce(&mut messages, format!("{player} keeps {size} cards"));
        }
        Ok(messages)
    }

    pub fn close_mulligan_window(&mut self) {
        if self.state.mulligan_window_open {
            debug!("mulligan window closed");
            self.state.mulligan_window_open = false;
        }
    }

    /// Ends the game with `player` losing.
    pub fn concede(&mut self, player: PlayerKey) -> Result<GameResult, ActionError> {
        if self.state.is_over() {
            return Err(ActionError::TerminalState);
        }
        self.close_mulligan_window();
        Ok(record_loss(&mut self.state, player, GameOverReason::Concession))
    }

    fn play_land(&mut self, player: PlayerKey, id: InstanceId) -> Result<Vec<String>, ActionError> {
        if !is_sorcery_timing(&self.state) {
            return Err(ActionError::WrongPhase(self.state.turn.phase));
        }
        if !self.state.player(player).can_play_land() {
            return Err(ActionError::LandLimitReached);
        }

        self.close_mulligan_window();
        self.state.move_instance(id, Zone::Battlefield);
        self.state.player_mut(player).record_land_play();
        apply_static(&mut self.state, id);
        refresh_mana_pool(&mut self.state, player);

        let name = self.card_name(id);
        let mut messages = Vec::new();
        self.announce(&mut messages, format!("{player} plays {name}"));
        Ok(messages)
    }

    fn card_name(&self, id: InstanceId) -> String {
        self.state
            .instance(id)
            .map(|card| card.name().to_string())
            .unwrap_or_default()
    }

    /// The blocker `defender` puts in front of `attacker`, if any. Declared blockers go
    /// first; an AI defender without one falls back to picking automatically.
    fn choose_blocker(&self, attacker: InstanceId, defender: PlayerKey) -> Option<InstanceId> {
        let attacking = self.state.instance(attacker)?;
        let declared = self.state.declared_blockers.iter().copied().find(|id| {
            !self.blocked_this_turn.contains(id)
                && self.state.instance(*id).is_some_and(|blocker| {
                    blocker.controller == defender
                        && blocker.zone == Zone::Battlefield
                        && can_block(attacking, blocker)
                })
        });
        if declared.is_some() {
            return declared;
        }
        if defender == PlayerKey::Ai && self.config.ai_blocks {
            return select_blocker(&self.state, attacker, defender, &self.blocked_this_turn);
        }
        None
    }

    fn on_turn_passed(&mut self, to: PlayerKey) {
        self.blocked_this_turn.clear();
        // Blocking orders last through the opponent's turn only.
        let state = &self.state;
        let keep: Vec<InstanceId> = state
            .declared_blockers
            .iter()
            .copied()
            .filter(|id| {
                state
                    .instance(*id)
                    .is_some_and(|card| card.controller != to && card.zone == Zone::Battlefield)
            })
            .collect();
        self.state.declared_blockers = keep;
    }
}

impl ActionApi for GameEngine {
    fn play_card(&mut self, player: PlayerKey, id: InstanceId) -> Result<Vec<String>, ActionError> {
        self.ensure_can_act(player)?;
        let card = self
            .state
            .instance(id)
            .filter(|card| card.zone == Zone::Hand && card.controller == player)
            .ok_or(ActionError::CardNotFound { id, zone: Zone::Hand })?;
        let definition = card.definition.clone();

        if definition.is_land() {
            return self.play_land(player, id);
        }
        if !definition.has_instant_timing() && !is_sorcery_timing(&self.state) {
            return Err(ActionError::WrongPhase(self.state.turn.phase));
        }

        let cost = definition.mana_cost;
        let required = cost.cmc();
        let pool = available_mana(&self.state, player);
        if required > pool.total() {
            return Err(ActionError::InsufficientMana {
                required,
                available: pool.total(),
            });
        }
        if !can_pay(&pool, &cost) {
            return Err(ActionError::CannotPayColors);
        }
        if !auto_tap_lands(&mut self.state, player, required) {
            return Err(ActionError::InsufficientMana {
                required,
                available: untapped_land_count(&self.state, player) as u32,
            });
        }

        self.close_mulligan_window();
        let mut messages = Vec::new();
        self.announce(&mut messages, format!("{player} casts {}", definition.name));

        if definition.is_spell_only() {
            self.state.move_instance(id, Zone::Stack);
            messages.extend(resolve_spell(&mut self.state, id, player));
            self.state.move_instance(id, Zone::Graveyard);
        } else {
            self.state.move_instance(id, Zone::Battlefield);
            if definition.is_creature()
                && let Some(card) = self.state.instance_mut(id)
            {
                card.summoning_sick = true;
            }
            apply_static(&mut self.state, id);
            messages.extend(trigger_etb(&mut self.state, id, player));
        }

        refresh_mana_pool(&mut self.state, player);
        apply_game_over_checks(&mut self.state);
        Ok(messages)
    }

    fn declare_attacker(
        &mut self,
        player: PlayerKey,
        id: InstanceId,
    ) -> Result<Vec<String>, ActionError> {
        self.ensure_can_act(player)?;
        if self.state.turn.phase != Phase::Combat {
            return Err(ActionError::WrongPhase(self.state.turn.phase));
        }
        let card = self
            .state
            .instance(id)
            .filter(|card| card.zone == Zone::Battlefield && card.controller == player)
            .ok_or(ActionError::CardNotFound {
                id,
                zone: Zone::Battlefield,
            })?;
        if !card.is_creature() {
            return Err(ActionError::NotACreature);
        }
        let check = can_attack(card, player);
        if let Some(reason) = check.reason {
            return Err(ActionError::CannotAttack(reason));
        }
        let name = card.name().to_string();

        self.close_mulligan_window();
        if let Some(card) = self.state.instance_mut(id) {
            if !card.has_keyword(Keyword::Vigilance) {
                card.tapped = true;
            }
            card.attacked_this_turn = true;
        }
        let mut messages = Vec::new();
        self.announce(&mut messages, format!("{player} attacks with {name}"));
        messages.extend(trigger_attack(&mut self.state, id, player));

        let still_attacking = self
            .state
            .instance(id)
            .is_some_and(|card| card.zone == Zone::Battlefield);
        if !self.state.is_over() && still_attacking {
            let defender = player.opponent();
            let blocker = self.choose_blocker(id, defender);
            if let Some(blocker) = blocker {
                self.blocked_this_turn.push(blocker);
            }
            messages.extend(resolve_combat_damage(&mut self.state, id, blocker, player));
        }
        refresh_mana_pool(&mut self.state, player.opponent());
        apply_game_over_checks(&mut self.state);
        Ok(messages)
    }

    fn declare_blocker(
        &mut self,
        player: PlayerKey,
        id: InstanceId,
    ) -> Result<Vec<String>, ActionError> {
        self.ensure_can_act(player)?;
        let card = self
            .state
            .instance(id)
            .filter(|card| card.zone == Zone::Battlefield && card.controller == player)
            .ok_or(ActionError::CardNotFound {
                id,
                zone: Zone::Battlefield,
            })?;
        if !card.is_creature() {
            return Err(ActionError::NotACreature);
        }
        if card.tapped {
            return Err(ActionError::AlreadyTapped);
        }
        let name = card.name().to_string();

        self.close_mulligan_window();
        let mut messages = Vec::new();
        if !self.state.declared_blockers.contains(&id) {
            self.state.declared_blockers.push(id);
            self.announce(&mut messages, format!("{player} readies {name} to block"));
        }
        Ok(messages)
    }

    fn activate_ability(
        &mut self,
        player: PlayerKey,
        id: InstanceId,
        index: usize,
    ) -> Result<Vec<String>, ActionError> {
        self.ensure_can_act(player)?;
        let messages = executor::activate_ability(&mut self.state, id, index, player)?;
        self.close_mulligan_window();
        apply_game_over_checks(&mut self.state);
        Ok(messages)
    }

    fn end_phase(&mut self, player: PlayerKey) -> Result<PhaseTransition, ActionError> {
        self.ensure_can_act(player)?;
        self.close_mulligan_window();
        let transition = turn::advance_phase(&mut self.state);
        if let PhaseTransition::TurnPassed { to, .. } = transition {
            self.on_turn_passed(to);
        }
        apply_game_over_checks(&mut self.state);
        Ok(transition)
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::card::{CardDefinition, basic_land};
    use crate::catalog::CardRegistry;
    use crate::color::Color;
    use crate::rules::combat::tests::make_creature;

    fn registry() -> CardRegistry {
        CardRegistry::with_builtin()
    }

    fn engine_with_decks(seed: u64) -> GameEngine {
        let registry = registry();
        let deck = registry.basic_ai_deck().expect("built-in deck");
        GameEngine::new(&deck, &deck, GameConfig::default().with_seed(seed))
    }

    /// Empty game in `phase` of the human's first turn, libraries stocked with lands.
    fn bare_engine(phase: Phase) -> GameEngine {
        let mut state = GameState::new(20);
        let land = Arc::new(basic_land(Color::Green));
        for key in PlayerKey::BOTH {
            for _ in 0..10 {
                state.create_instance(land.clone(), key, Zone::Library);
            }
        }
        state.turn.phase = phase;
        GameEngine::from_state(state, GameConfig::default().with_seed(1))
    }

    fn add(engine: &mut GameEngine, key: PlayerKey, def: CardDefinition, zone: Zone) -> InstanceId {
        let id = engine.state_mut().create_instance(Arc::new(def), key, zone);
        if zone == Zone::Battlefield {
            apply_static(engine.state_mut(), id);
        }
        id
    }

    #[test]
    fn test_new_game_deals_opening_hands() {
        let engine = engine_with_decks(7);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.player.hand.len(), 7);
        assert_eq!(snapshot.ai.hand.len(), 7);
        assert_eq!(snapshot.player.library_count, 53);
        assert_eq!(snapshot.turn_number, 1);
        assert_eq!(snapshot.phase, Phase::Beginning);
        assert!(snapshot.mulligan_window_open);
        assert!(engine.state().validate_zone_consistency().is_ok());
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = engine_with_decks(42).snapshot();
        let b = engine_with_decks(42).snapshot();
        let names = |s: &GameSnapshot| -> Vec<String> {
            s.player.hand.iter().map(|c| c.name.clone()).collect()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_mulligan_shrinks_hand_until_limit() {
        let mut engine = engine_with_decks(3);
        engine.mulligan(PlayerKey::Player).expect("first mulligan");
        assert_eq!(engine.state().player(PlayerKey::Player).hand.len(), 6);
        engine.mulligan(PlayerKey::Player).expect("second mulligan");
        assert_eq!(engine.state().player(PlayerKey::Player).hand.len(), 5);
        assert_eq!(
            engine.mulligan(PlayerKey::Player),
            Err(ActionError::MulliganLimitReached)
        );
        assert_eq!(engine.state().player(PlayerKey::Player).library.len(), 55);
        assert!(engine.state().validate_zone_consistency().is_ok());
    }

    #[test]
    fn test_first_action_closes_mulligan_window() {
        let mut engine = engine_with_decks(3);
        engine.end_phase(PlayerKey::Player).expect("end phase");
        assert_eq!(
            engine.mulligan(PlayerKey::Player),
            Err(ActionError::MulliganClosed)
        );
    }

    #[test]
    fn test_land_once_per_turn() {
        let mut engine = bare_engine(Phase::Main1);
        let first = add(&mut engine, PlayerKey::Player, basic_land(Color::Green), Zone::Hand);
        let second = add(&mut engine, PlayerKey::Player, basic_land(Color::Green), Zone::Hand);
        engine.play_card(PlayerKey::Player, first).expect("first land");
        assert_eq!(
            engine.play_card(PlayerKey::Player, second),
            Err(ActionError::LandLimitReached)
        );
        let player = engine.state().player(PlayerKey::Player);
        assert_eq!(player.lands_played_this_turn, 1);
        assert_eq!(player.max_mana, 1);
        assert_eq!(player.hand, vec![second]);
    }

    #[test]
    fn test_lands_wait_for_main_phase() {
        let mut engine = bare_engine(Phase::Combat);
        let land = add(&mut engine, PlayerKey::Player, basic_land(Color::Green), Zone::Hand);
        assert_eq!(
            engine.play_card(PlayerKey::Player, land),
            Err(ActionError::WrongPhase(Phase::Combat))
        );
    }

    #[test]
    fn test_cannot_act_on_opponents_turn() {
        let mut engine = bare_engine(Phase::Main1);
        let land = add(&mut engine, PlayerKey::Ai, basic_land(Color::Green), Zone::Hand);
        assert_eq!(
            engine.play_card(PlayerKey::Ai, land),
            Err(ActionError::NotYourTurn(PlayerKey::Ai))
        );
        assert_eq!(
            engine.end_phase(PlayerKey::Ai),
            Err(ActionError::NotYourTurn(PlayerKey::Ai))
        );
    }

    #[test]
    fn test_failed_cast_changes_nothing() {
        let mut engine = bare_engine(Phase::Main1);
        add(&mut engine, PlayerKey::Player, basic_land(Color::Red), Zone::Battlefield);
        let giant = registry().require("Hill Giant").expect("giant");
        let id = engine
            .state_mut()
            .create_instance(giant, PlayerKey::Player, Zone::Hand);
        let before = engine.snapshot();
        assert_eq!(
            engine.play_card(PlayerKey::Player, id),
            Err(ActionError::InsufficientMana {
                required: 4,
                available: 1
            })
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_wrong_colors_are_rejected() {
        let mut engine = bare_engine(Phase::Main1);
        add(&mut engine, PlayerKey::Player, basic_land(Color::Green), Zone::Battlefield);
        let bolt = registry().require("Lightning Bolt").expect("bolt");
        let id = engine
            .state_mut()
            .create_instance(bolt, PlayerKey::Player, Zone::Hand);
        assert_eq!(
            engine.play_card(PlayerKey::Player, id),
            Err(ActionError::CannotPayColors)
        );
    }

    #[test]
    fn test_creature_enters_sick_and_taps_lands() {
        let mut engine = bare_engine(Phase::Main1);
        let a = add(&mut engine, PlayerKey::Player, basic_land(Color::Green), Zone::Battlefield);
        let b = add(&mut engine, PlayerKey::Player, basic_land(Color::Green), Zone::Battlefield);
        let bears = registry().require("Grizzly Bears").expect("bears");
        let id = engine
            .state_mut()
            .create_instance(bears, PlayerKey::Player, Zone::Hand);
        engine.play_card(PlayerKey::Player, id).expect("cast bears");

        let state = engine.state();
        let card = state.instance(id).expect("bears exist");
        assert_eq!(card.zone, Zone::Battlefield);
        assert!(card.summoning_sick);
        assert!(state.instance(a).is_some_and(|c| c.tapped));
        assert!(state.instance(b).is_some_and(|c| c.tapped));
        assert_eq!(state.player(PlayerKey::Player).mana_pool.total(), 0);
    }

    #[test]
    fn test_instant_resolves_into_graveyard() {
        let mut engine = bare_engine(Phase::Combat);
        add(&mut engine, PlayerKey::Player, basic_land(Color::Red), Zone::Battlefield);
        let bolt = registry().require("Lightning Bolt").expect("bolt");
        let id = engine
            .state_mut()
            .create_instance(bolt, PlayerKey::Player, Zone::Hand);
        engine.play_card(PlayerKey::Player, id).expect("bolt at instant speed");
        assert_eq!(engine.state().player(PlayerKey::Ai).life, 17);
        assert_eq!(engine.state().player(PlayerKey::Player).graveyard, vec![id]);
        assert!(engine.state().stack.is_empty());
    }

    #[test]
    fn test_attack_outside_combat_rejected() {
        let mut engine = bare_engine(Phase::Main1);
        let bear = add(
            &mut engine,
            PlayerKey::Player,
            make_creature("Bear", 2, 2, ""),
            Zone::Battlefield,
        );
        assert_eq!(
            engine.declare_attacker(PlayerKey::Player, bear),
            Err(ActionError::WrongPhase(Phase::Main1))
        );
    }

    #[test]
    fn test_unblocked_attack_hits_player() {
        let mut engine = bare_engine(Phase::Combat);
        let bear = add(
            &mut engine,
            PlayerKey::Player,
            make_creature("Bear", 2, 2, ""),
            Zone::Battlefield,
        );
        engine.declare_attacker(PlayerKey::Player, bear).expect("attack");
        assert_eq!(engine.state().player(PlayerKey::Ai).life, 18);
        assert!(engine.state().instance(bear).is_some_and(|c| c.tapped));
        assert!(matches!(
            engine.declare_attacker(PlayerKey::Player, bear),
            Err(ActionError::CannotAttack(_))
        ));
    }

    #[test]
    fn test_ai_blocks_with_a_survivor() {
        let mut engine = bare_engine(Phase::Combat);
        let bear = add(
            &mut engine,
            PlayerKey::Player,
            make_creature("Bear", 2, 2, ""),
            Zone::Battlefield,
        );
        let wall = add(
            &mut engine,
            PlayerKey::Ai,
            make_creature("Wall", 0, 4, "Defender"),
            Zone::Battlefield,
        );
        engine.declare_attacker(PlayerKey::Player, bear).expect("attack");
        assert_eq!(engine.state().player(PlayerKey::Ai).life, 20);
        assert_eq!(engine.state().instance(wall).map(|c| c.toughness), Some(2));
    }

    #[test]
    fn test_declared_blocker_defends_on_opponents_turn() {
        let mut engine = bare_engine(Phase::Main1);
        let guard = add(
            &mut engine,
            PlayerKey::Player,
            make_creature("Guard", 1, 5, ""),
            Zone::Battlefield,
        );
        let raider = add(
            &mut engine,
            PlayerKey::Ai,
            make_creature("Raider", 3, 3, ""),
            Zone::Battlefield,
        );
        engine.declare_blocker(PlayerKey::Player, guard).expect("declare");
        for _ in 0..4 {
            engine.end_phase(PlayerKey::Player).expect("advance");
        }
        // AI turn 2, Beginning; walk to combat.
        engine.end_phase(PlayerKey::Ai).expect("main");
        engine.end_phase(PlayerKey::Ai).expect("combat");
        engine.declare_attacker(PlayerKey::Ai, raider).expect("attack");
        assert_eq!(engine.state().player(PlayerKey::Player).life, 20);
        assert_eq!(engine.state().instance(guard).map(|c| c.toughness), Some(2));
    }

    #[test]
    fn test_concede_is_terminal() {
        let mut engine = bare_engine(Phase::Main1);
        let result = engine.concede(PlayerKey::Player).expect("concede");
        assert_eq!(result.winner, PlayerKey::Ai);
        assert_eq!(result.reason, GameOverReason::Concession);
        assert_eq!(
            engine.end_phase(PlayerKey::Player),
            Err(ActionError::TerminalState)
        );
        assert_eq!(
            engine.concede(PlayerKey::Ai),
            Err(ActionError::TerminalState)
        );
    }

    #[test]
    fn test_end_phase_passes_turn() {
        let mut engine = bare_engine(Phase::End);
        let transition = engine.end_phase(PlayerKey::Player).expect("end");
        assert_eq!(
            transition,
            PhaseTransition::TurnPassed {
                to: PlayerKey::Ai,
                turn_number: 2
            }
        );
        assert_eq!(engine.state().player(PlayerKey::Ai).hand.len(), 1);
    }
}
