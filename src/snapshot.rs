//! Read-only projection of the game for front-ends and the AI.
//!
//! A snapshot owns plain data only. Taking one never changes the game, and two
//! snapshots of an unchanged game compare equal.

use crate::ability::AbilityDescriptor;
use crate::color::ColorSet;
use crate::game_state::{GameState, Phase};
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::ledger::available_mana;
use crate::mana::ManaPool;
use crate::object::CardInstance;
use crate::rules::combat::can_attack;
use crate::rules::state_based::GameResult;
use crate::types::CardType;
use crate::zone::Zone;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct AbilityView {
    pub index: usize,
    pub text: String,
    pub activated: bool,
    pub requires_tap: bool,
    /// Mana part of an activated ability's cost.
    pub cost: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct CardView {
    pub id: InstanceId,
    pub name: String,
    pub mana_cost: String,
    pub cmc: u32,
    pub type_line: String,
    pub card_types: Vec<CardType>,
    pub rules_text: String,
    pub colors: ColorSet,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub zone: Zone,
    pub tapped: bool,
    pub summoning_sick: bool,
    pub is_token: bool,
    pub keywords: Vec<Keyword>,
    pub abilities: Vec<AbilityView>,
    /// Could be declared as an attacker right now (ignoring whose turn and phase it is).
    pub can_attack: bool,
}

impl CardView {
    pub fn from_instance(card: &CardInstance) -> Self {
        let definition = &card.definition;
        let is_creature = card.is_creature();
        let abilities = card
            .abilities()
            .iter()
            .enumerate()
            .map(|(index, ability)| match ability {
                AbilityDescriptor::Activated(activated) => AbilityView {
                    index,
                    text: ability.to_string(),
                    activated: true,
                    requires_tap: activated.requires_tap,
                    cost: Some(activated.cost.to_string()),
                },
                _ => AbilityView {
                    index,
                    text: ability.to_string(),
                    activated: false,
                    requires_tap: false,
                    cost: None,
                },
            })
            .collect();
        let keywords = if card.zone == Zone::Battlefield {
            card.keywords
        } else {
            definition.keywords
        };

        Self {
            id: card.id,
            name: definition.name.clone(),
            mana_cost: definition.mana_cost.to_string(),
            cmc: definition.cmc(),
            type_line: definition.type_line.to_string(),
            card_types: definition.type_line.card_types.clone(),
            rules_text: definition.rules_text.clone(),
            colors: definition.colors,
            power: is_creature.then_some(card.power),
            toughness: is_creature.then_some(card.toughness),
            zone: card.zone,
            tapped: card.tapped,
            summoning_sick: card.summoning_sick,
            is_token: card.is_token,
            keywords: keywords.iter().collect(),
            abilities,
            can_attack: can_attack(card, card.controller).allowed,
        }
    }

    pub fn is(&self, card_type: CardType) -> bool {
        self.card_types.contains(&card_type)
    }

    pub fn is_land(&self) -> bool {
        self.is(CardType::Land)
    }

    pub fn is_creature(&self) -> bool {
        self.is(CardType::Creature)
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct PlayerView {
    pub key: PlayerKey,
    pub life: i32,
    pub hand: Vec<CardView>,
    pub battlefield: Vec<CardView>,
    /// Most recent last.
    pub graveyard: Vec<CardView>,
    pub library_count: usize,
    pub lands_played_this_turn: u32,
    pub can_play_land: bool,
    pub max_mana: u32,
    pub mana_available: ManaPool,
    pub mulligans_taken: u32,
}

impl PlayerView {
    fn capture(game: &GameState, key: PlayerKey) -> Self {
        let player = game.player(key);
        let views = |ids: &[InstanceId]| -> Vec<CardView> {
            ids.iter()
                .filter_map(|id| game.instance(*id))
                .map(CardView::from_instance)
                .collect()
        };
        Self {
            key,
            life: player.life,
            hand: views(&player.hand),
            battlefield: views(&player.battlefield),
            graveyard: views(&player.graveyard),
            library_count: player.library.len(),
            lands_played_this_turn: player.lands_played_this_turn,
            can_play_land: player.can_play_land(),
            max_mana: player.max_mana,
            mana_available: available_mana(game, key),
            mulligans_taken: player.mulligans_taken,
        }
    }

    /// Creatures on the battlefield that are not tapped.
    pub fn untapped_creatures(&self) -> impl Iterator<Item = &CardView> {
        self.battlefield
            .iter()
            .filter(|card| card.is_creature() && !card.tapped)
    }

    pub fn lands_in_hand(&self) -> usize {
        self.hand.iter().filter(|card| card.is_land()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub struct GameSnapshot {
    pub turn_number: u32,
    pub phase: Phase,
    pub active_player: PlayerKey,
    pub player: PlayerView,
    pub ai: PlayerView,
    /// Bottom first.
    pub stack: Vec<CardView>,
    pub game_over: Option<GameResult>,
    pub mulligan_window_open: bool,
    pub declared_blockers: Vec<InstanceId>,
    pub log: Vec<String>,
}

impl GameSnapshot {
    pub fn capture(game: &GameState) -> Self {
        Self {
            turn_number: game.turn.turn_number,
            phase: game.turn.phase,
            active_player: game.turn.active_player,
            player: PlayerView::capture(game, PlayerKey::Player),
            ai: PlayerView::capture(game, PlayerKey::Ai),
            stack: game
                .stack
                .iter()
                .filter_map(|entry| game.instance(entry.card))
                .map(CardView::from_instance)
                .collect(),
            game_over: game.game_over,
            mulligan_window_open: game.mulligan_window_open,
            declared_blockers: game.declared_blockers.clone(),
            log: game.log_entries().to_vec(),
        }
    }

    pub fn view(&self, key: PlayerKey) -> &PlayerView {
        match key {
            PlayerKey::Player => &self.player,
            PlayerKey::Ai => &self.ai,
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Looks a card up in any public zone or hand.
    pub fn card(&self, id: InstanceId) -> Option<&CardView> {
        [&self.player, &self.ai]
            .into_iter()
            .flat_map(|view| {
                view.hand
                    .iter()
                    .chain(view.battlefield.iter())
                    .chain(view.graveyard.iter())
            })
            .chain(self.stack.iter())
            .find(|card| card.id == id)
    }
}
