//! The explicit game-state object: instance arena, both players, turn tracking, the
//! minimal spell stack and the event log.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::card::CardDefinition;
use crate::ids::{InstanceId, InstanceIdAllocator, PlayerKey};
use crate::object::CardInstance;
use crate::player::PlayerState;
use crate::rules::state_based::GameResult;
use crate::zone::Zone;

/// Game phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Beginning,
    Main1,
    Combat,
    Main2,
    End,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Beginning,
        Phase::Main1,
        Phase::Combat,
        Phase::Main2,
        Phase::End,
    ];

    /// The following phase within the same turn; `None` after End.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Beginning => Some(Phase::Main1),
            Phase::Main1 => Some(Phase::Combat),
            Phase::Combat => Some(Phase::Main2),
            Phase::Main2 => Some(Phase::End),
            Phase::End => None,
        }
    }

    pub fn is_main(self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Beginning => "Beginning",
            Phase::Main1 => "Main 1",
            Phase::Combat => "Combat",
            Phase::Main2 => "Main 2",
            Phase::End => "End",
        };
        write!(f, "{name}")
    }
}

/// Whose turn it is and where in it we are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    pub active_player: PlayerKey,
    /// Starts at 1 and increases every time the turn passes.
    pub turn_number: u32,
    pub phase: Phase,
}

/// A spell waiting to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackEntry {
    pub card: InstanceId,
    pub controller: PlayerKey,
}

#[derive(Debug, Clone)]
pub struct GameState {
    instances: HashMap<InstanceId, CardInstance>,
    players: [PlayerState; 2],
    pub turn: TurnState,
    /// Last in, first out.
    pub stack: Vec<StackEntry>,
    pub game_over: Option<GameResult>,
    /// Open between the opening draw and the first action that isn't a mulligan.
    pub mulligan_window_open: bool,
    /// Creatures told to block when their controller is attacked.
    pub declared_blockers: Vec<InstanceId>,
    log: Vec<String>,
    ids: InstanceIdAllocator,
}

impl GameState {
    pub fn new(starting_life: i32) -> Self {
        Self {
            instances: HashMap::new(),
            players: [
                PlayerState::new(PlayerKey::Player, starting_life),
                PlayerState::new(PlayerKey::Ai, starting_life),
            ],
            turn: TurnState {
                active_player: PlayerKey::Player,
                turn_number: 1,
                phase: Phase::Beginning,
            },
            stack: Vec::new(),
            game_over: None,
            mulligan_window_open: false,
            declared_blockers: Vec::new(),
            log: Vec::new(),
            ids: InstanceIdAllocator::new(),
        }
    }

    pub fn player(&self, key: PlayerKey) -> &PlayerState {
        &self.players[key.index()]
    }

    pub fn player_mut(&mut self, key: PlayerKey) -> &mut PlayerState {
        &mut self.players[key.index()]
    }

    pub fn instance(&self, id: InstanceId) -> Option<&CardInstance> {
        self.instances.get(&id)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.instances.get_mut(&id)
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn active_player(&self) -> PlayerKey {
        self.turn.active_player
    }

    /// Creates a fresh instance of `definition` and files it under `zone`.
    pub fn create_instance(
        &mut self,
        definition: Arc<CardDefinition>,
        controller: PlayerKey,
        zone: Zone,
    ) -> InstanceId {
        let id = self.ids.next_id();
        self.instances
            .insert(id, CardInstance::new(id, definition, controller, zone));
        self.push_to_zone(id, controller, zone);

        #[cfg(debug_assertions)]
        self.debug_assert_zone_consistency();

        id
    }

    /// Moves an instance between zones: removes its id from the old list, appends it to
    /// the new one and updates its `zone` field, all at once. Flags tied to the old zone
    /// are reset. Returns false (and changes nothing) for unknown ids.
    pub fn move_instance(&mut self, id: InstanceId, to: Zone) -> bool {
        let Some(instance) = self.instances.get_mut(&id) else {
            return false;
        };
        let from = instance.zone;
        let controller = instance.controller;
        if from == to {
            return true;
        }
        instance.zone = to;
        instance.reset_for_zone_change();

        self.remove_from_zone(id, controller, from);
        self.push_to_zone(id, controller, to);

        #[cfg(debug_assertions)]
        self.debug_assert_zone_consistency();

        true
    }

    fn remove_from_zone(&mut self, id: InstanceId, controller: PlayerKey, zone: Zone) {
        if zone == Zone::Stack {
            self.stack.retain(|entry| entry.card != id);
        } else if let Some(list) = self.player_mut(controller).zone_list_mut(zone) {
            list.retain(|other| *other != id);
        }
    }

    fn push_to_zone(&mut self, id: InstanceId, controller: PlayerKey, zone: Zone) {
        if zone == Zone::Stack {
            self.stack.push(StackEntry {
                card: id,
                controller,
            });
        } else if let Some(list) = self.player_mut(controller).zone_list_mut(zone) {
            list.push(id);
        }
    }

    /// Moves the top card of the library into the hand. `None` when the library is empty;
    /// deciding what that means is up to the caller.
    pub fn draw_card(&mut self, key: PlayerKey) -> Option<InstanceId> {
        let id = *self.player(key).library.first()?;
        self.move_instance(id, Zone::Hand);
        Some(id)
    }

    /// Creature ids on `key`'s battlefield, in battlefield order.
    pub fn creatures(&self, key: PlayerKey) -> Vec<InstanceId> {
        self.player(key)
            .battlefield
            .iter()
            .copied()
            .filter(|id| self.instance(*id).is_some_and(CardInstance::is_creature))
            .collect()
    }

    pub fn push_log(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{message}");
        self.log.push(message);
    }

    pub fn log_entries(&self) -> &[String] {
        &self.log
    }

    /// Every id appears in exactly one zone list, and that list agrees with the
    /// instance's `zone` field.
    pub fn validate_zone_consistency(&self) -> Result<(), String> {
        let mut seen: HashSet<InstanceId> = HashSet::new();
        let player_lists = self.players.iter().flat_map(|player| {
            [
                Zone::Library,
                Zone::Hand,
                Zone::Battlefield,
                Zone::Graveyard,
            ]
            .into_iter()
            .filter_map(move |zone| {
                player
                    .zone_list(zone)
                    .map(|list| (player.key, zone, list.clone()))
            })
        });
        let stack_lists = PlayerKey::BOTH.into_iter().map(|key| {
            let ids = self
                .stack
                .iter()
                .filter(|entry| entry.controller == key)
                .map(|entry| entry.card)
                .collect::<Vec<_>>();
            (key, Zone::Stack, ids)
        });

        for (key, zone, ids) in player_lists.chain(stack_lists) {
            for id in ids {
                if !seen.insert(id) {
                    return Err(format!("Instance {id} appears in multiple zone lists"));
                }
                match self.instances.get(&id) {
                    Some(instance) if instance.zone == zone && instance.controller == key => {}
                    Some(instance) => {
                        return Err(format!(
                            "Instance {id} listed in {key}'s {zone} but has zone {} under {}",
                            instance.zone, instance.controller
                        ));
                    }
                    None => {
                        return Err(format!("Instance {id} in {key}'s {zone} doesn't exist"));
                    }
                }
            }
        }

        if let Some(orphan) = self.instances.keys().find(|id| !seen.contains(id)) {
            return Err(format!("Instance {orphan} is not in any zone list"));
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    pub fn debug_assert_zone_consistency(&self) {
        if let Err(message) = self.validate_zone_consistency() {
            panic!("zone consistency violated: {message}");
        }
    }
}
