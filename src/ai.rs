//! The computer opponent.
//!
//! The AI only ever looks at a [`GameSnapshot`] and only ever acts through an
//! [`ActionApi`], the same surface the human uses. It never fails: a rejected action is
//! logged and skipped.

use std::cmp::Ordering;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Difficulty;
use crate::engine::ActionApi;
use crate::game_state::Phase;
use crate::ids::{InstanceId, PlayerKey};
use crate::mana::ManaCost;
use crate::snapshot::{CardView, GameSnapshot, PlayerView};
use crate::text::contains_phrase;
use crate::turn::PhaseTransition;

const AI: PlayerKey = PlayerKey::Ai;

/// Upper bound on phase steps in one AI turn.
const MAX_STEPS: usize = 32;

/// Life at or below which the AI goes for the throat.
const LETHAL_RANGE: i32 = 5;

#[derive(Debug, Clone)]
pub struct AiOpponent {
    difficulty: Difficulty,
    aggressiveness: f64,
    rng: StdRng,
}

impl AiOpponent {
    pub fn new(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            difficulty,
            aggressiveness: difficulty.aggressiveness(),
            rng,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Sends back hands with almost no lands or almost nothing but lands.
    pub fn should_mulligan(&self, view: &PlayerView) -> bool {
        if view.hand.is_empty() {
            return false;
        }
        let lands = view.lands_in_hand();
        lands <= 1 || lands >= 6
    }

    /// Plays out the AI's turn from wherever it currently is until the turn passes or
    /// the game ends. Returns the messages of everything the AI did.
    pub fn take_turn<A: ActionApi + ?Sized>(&mut self, api: &mut A) -> Vec<String> {
        let mut messages = Vec::new();
        for _ in 0..MAX_STEPS {
            let snapshot = api.snapshot();
            if snapshot.is_over() || snapshot.active_player != AI {
                break;
            }
            match snapshot.phase {
                Phase::Main1 | Phase::Main2 => messages.extend(self.main_phase(api)),
                Phase::Combat => messages.extend(self.combat(api)),
                Phase::Beginning | Phase::End => {}
            }
            if api.snapshot().is_over() {
                break;
            }
            match api.end_phase(AI) {
                Ok(PhaseTransition::TurnPassed { .. }) => break,
                Ok(PhaseTransition::Advanced(_)) => {}
                Err(err) => {
                    debug!("AI could not end the phase: {err}");
                    break;
                }
            }
        }
        messages
    }

    /// Land first, then at most one spell.
    fn main_phase<A: ActionApi + ?Sized>(&mut self, api: &mut A) -> Vec<String> {
        let mut messages = Vec::new();

        let snapshot = api.snapshot();
        if snapshot.ai.can_play_land
            && let Some(land) = snapshot.ai.hand.iter().find(|card| card.is_land())
        {
            match api.play_card(AI, land.id) {
                Ok(lines) => messages.extend(lines),
                Err(err) => debug!("AI skipped land {}: {err}", land.name),
            }
        }

        let snapshot = api.snapshot();
        for id in self.spell_choices(&snapshot) {
            match api.play_card(AI, id) {
                Ok(lines) => {
                    messages.extend(lines);
                    break;
                }
                Err(err) => debug!("AI skipped {id}: {err}"),
            }
        }
        messages
    }

    /// Affordable non-land cards in the order the AI wants to try them.
    fn spell_choices(&self, snapshot: &GameSnapshot) -> Vec<InstanceId> {
        let pool = snapshot.ai.mana_available;
        let mut affordable: Vec<&CardView> = snapshot
            .ai
            .hand
            .iter()
            .filter(|card| !card.is_land())
            .filter(|card| {
                let cost = ManaCost::parse(&card.mana_cost);
                cost.cmc() <= pool.total() && pool.can_pay(&cost)
            })
            .collect();

        match self.difficulty {
            Difficulty::Easy => affordable.sort_by_key(|card| card.cmc),
            Difficulty::Medium | Difficulty::Hard => {
                let human_life = snapshot.player.life;
                affordable.sort_by(|a, b| {
                    card_value(b, human_life)
                        .partial_cmp(&card_value(a, human_life))
                        .unwrap_or(Ordering::Equal)
                });
            }
        }
        affordable.into_iter().map(|card| card.id).collect()
    }

    fn combat<A: ActionApi + ?Sized>(&mut self, api: &mut A) -> Vec<String> {
        let snapshot = api.snapshot();
        let attackers = self.choose_attackers(&snapshot);
        let mut messages = Vec::new();
        for id in attackers {
            match api.declare_attacker(AI, id) {
                Ok(lines) => messages.extend(lines),
                Err(err) => debug!("AI did not attack with {id}: {err}"),
            }
            if api.snapshot().is_over() {
                break;
            }
        }
        messages
    }

    fn choose_attackers(&mut self, snapshot: &GameSnapshot) -> Vec<InstanceId> {
        let eligible: Vec<&CardView> = snapshot
            .ai
            .battlefield
            .iter()
            .filter(|card| card.is_creature() && card.can_attack)
            .collect();
        let aggressiveness = self.aggressiveness;

        let chosen: Vec<&CardView> = match self.difficulty {
            Difficulty::Easy => eligible
                .first()
                .copied()
                .filter(|_| self.rng.random_bool(aggressiveness))
                .into_iter()
                .collect(),
            Difficulty::Medium => eligible
                .into_iter()
                .filter(|_| self.rng.random_bool(aggressiveness))
                .collect(),
            Difficulty::Hard => {
                let open_board = snapshot.player.untapped_creatures().next().is_none();
                let human_low = snapshot.player.life <= LETHAL_RANGE;
                eligible
                    .into_iter()
                    .filter(|card| {
                        let power = card.power.unwrap_or(0);
                        let toughness = card.toughness.unwrap_or(0);
                        open_board
                            || power >= 3
                            || human_low
                            || (toughness >= 3 && self.rng.random_bool(aggressiveness))
                    })
                    .collect()
            }
        };
        debug!(
            "AI ({}) attacks with {:?}",
            self.difficulty,
            chosen.iter().map(|card| card.name.as_str()).collect::<Vec<_>>()
        );
        chosen.into_iter().map(|card| card.id).collect()
    }
}

/// How much the AI wants to cast `card`, normalized by its mana value.
pub fn card_value(card: &CardView, human_life: i32) -> f64 {
    let base = if card.is_creature() {
        f64::from(card.power.unwrap_or(0) + card.toughness.unwrap_or(0) + 10)
    } else if contains_phrase(&card.rules_text.to_lowercase(), "damage") {
        if human_life <= LETHAL_RANGE { 100.0 } else { 15.0 }
    } else {
        12.0
    };
    if card.cmc > 0 {
        base / f64::from(card.cmc)
    } else {
        base
    }
}
