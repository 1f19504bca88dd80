//! A human-vs-AI session.
//!
//! [`Duel`] is what front-ends hold. Human actions go straight to the engine; ending the
//! human's last phase hands control to the AI, which plays its whole turn before the
//! call returns.

use log::info;

use crate::ai::AiOpponent;
use crate::catalog::Decklist;
use crate::config::{Difficulty, GameConfig};
use crate::engine::{ActionApi, GameEngine};
use crate::error::ActionError;
use crate::ids::{InstanceId, PlayerKey};
use crate::rules::state_based::GameResult;
use crate::snapshot::GameSnapshot;
use crate::turn::PhaseTransition;

const HUMAN: PlayerKey = PlayerKey::Player;

#[derive(Debug, Clone)]
pub struct Duel {
    engine: GameEngine,
    ai: AiOpponent,
}

impl Duel {
    pub fn start_game(
        player_deck: &Decklist,
        ai_deck: &Decklist,
        difficulty: Difficulty,
        config: GameConfig,
    ) -> Self {
        let ai_seed = config.seed.map(|seed| seed.wrapping_add(1));
        info!("starting duel on {difficulty}");
        Self {
            engine: GameEngine::new(player_deck, ai_deck, config),
            ai: AiOpponent::new(difficulty, ai_seed),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn difficulty(&self) -> Difficulty {
        self.ai.difficulty()
    }

    pub fn get_snapshot(&self) -> GameSnapshot {
        self.engine.snapshot()
    }

    pub fn mulligan(&mut self) -> Result<Vec<String>, ActionError> {
        self.engine.mulligan(HUMAN)
    }

    pub fn keep_hand(&mut self) -> Result<Vec<String>, ActionError> {
        let mut messages = self.ai_mulligan_decision();
        messages.extend(self.engine.keep_hand(HUMAN)?);
        Ok(messages)
    }

    /// The AI gets its one look at its opening hand right before the window closes.
    fn ai_mulligan_decision(&mut self) -> Vec<String> {
        if !self.engine.state().mulligan_window_open {
            return Vec::new();
        }
        let snapshot = self.engine.snapshot();
        if self.ai.should_mulligan(&snapshot.ai) {
            return self.engine.mulligan(PlayerKey::Ai).unwrap_or_default();
        }
        Vec::new()
    }

    fn settle_mulligans(&mut self) -> Vec<String> {
        let messages = self.ai_mulligan_decision();
        self.engine.close_mulligan_window();
        messages
    }

    pub fn play_card(&mut self, id: InstanceId) -> Result<Vec<String>, ActionError> {
        let mut messages = self.settle_mulligans();
        messages.extend(self.engine.play_card(HUMAN, id)?);
        Ok(messages)
    }

    pub fn declare_attacker(&mut self, id: InstanceId) -> Result<Vec<String>, ActionError> {
        let mut messages = self.settle_mulligans();
        messages.extend(self.engine.declare_attacker(HUMAN, id)?);
        Ok(messages)
    }

    pub fn declare_blocker(&mut self, id: InstanceId) -> Result<Vec<String>, ActionError> {
        let mut messages = self.settle_mulligans();
        messages.extend(self.engine.declare_blocker(HUMAN, id)?);
        Ok(messages)
    }

    pub fn activate_ability(
        &mut self,
        id: InstanceId,
        index: usize,
    ) -> Result<Vec<String>, ActionError> {
        let mut messages = self.settle_mulligans();
        messages.extend(self.engine.activate_ability(HUMAN, id, index)?);
        Ok(messages)
    }

    /// Ends the human's current phase. When that passes the turn, the AI takes its
    /// whole turn and control comes back at the start of the human's next turn.
    pub fn end_phase(&mut self) -> Result<Vec<String>, ActionError> {
        let mut messages = self.settle_mulligans();
        match self.engine.end_phase(HUMAN)? {
            PhaseTransition::Advanced(phase) => messages.push(format!("{phase} phase")),
            PhaseTransition::TurnPassed { to, turn_number } => {
                messages.push(format!("Turn {turn_number}: {to}'s turn"));
                if to == PlayerKey::Ai && !self.engine.state().is_over() {
                    messages.extend(self.ai.take_turn(&mut self.engine));
                }
            }
        }
        Ok(messages)
    }

    pub fn concede(&mut self) -> Result<GameResult, ActionError> {
        self.engine.concede(HUMAN)
    }

    pub fn result(&self) -> Option<GameResult> {
        self.engine.state().game_over
    }
}
