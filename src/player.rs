use rand::Rng;
use rand::seq::SliceRandom;

use crate::ids::{InstanceId, PlayerKey};
use crate::mana::ManaPool;
use crate::zone::Zone;

/// Lands a player may play each turn.
pub const LAND_PLAYS_PER_TURN: u32 = 1;

/// Per-player state. Zone lists hold ids into the game's instance arena.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub key: PlayerKey,
    /// May go negative.
    pub life: i32,
    pub hand: Vec<InstanceId>,
    pub battlefield: Vec<InstanceId>,
    /// Most recent last.
    pub graveyard: Vec<InstanceId>,
    /// Front is the next card drawn.
    pub library: Vec<InstanceId>,
    /// Derived; recomputed by the ledger whenever permanents tap, untap or move.
    pub mana_pool: ManaPool,
    pub lands_played_this_turn: u32,
    /// Lands played over the whole game.
    pub max_mana: u32,
    pub mulligans_taken: u32,
}

impl PlayerState {
    pub fn new(key: PlayerKey, starting_life: i32) -> Self {
        Self {
            key,
            life: starting_life,
            hand: Vec::new(),
            battlefield: Vec::new(),
            graveyard: Vec::new(),
            library: Vec::new(),
            mana_pool: ManaPool::new(),
            lands_played_this_turn: 0,
            max_mana: 0,
            mulligans_taken: 0,
        }
    }

    /// The id list backing `zone`. The stack is shared and lives on the game.
    pub fn zone_list(&self, zone: Zone) -> Option<&Vec<InstanceId>> {
        match zone {
            Zone::Hand => Some(&self.hand),
            Zone::Battlefield => Some(&self.battlefield),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Library => Some(&self.library),
            Zone::Stack => None,
        }
    }

    pub fn zone_list_mut(&mut self, zone: Zone) -> Option<&mut Vec<InstanceId>> {
        match zone {
            Zone::Hand => Some(&mut self.hand),
            Zone::Battlefield => Some(&mut self.battlefield),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Library => Some(&mut self.library),
            Zone::Stack => None,
        }
    }

    pub fn can_play_land(&self) -> bool {
        self.lands_played_this_turn < LAND_PLAYS_PER_TURN
    }

    pub fn record_land_play(&mut self) {
        self.lands_played_this_turn += 1;
        self.max_mana += 1;
    }

    pub fn begin_turn(&mut self) {
        self.lands_played_this_turn = 0;
    }

    /// Deals damage to this player. Returns the damage dealt.
    pub fn deal_damage(&mut self, amount: u32) -> u32 {
        self.life = self.life.saturating_sub(clamp_to_life(amount));
        amount
    }

    pub fn gain_life(&mut self, amount: u32) {
        self.life = self.life.saturating_add(clamp_to_life(amount));
    }

    pub fn has_lethal_life(&self) -> bool {
        self.life <= 0
    }

    pub fn shuffle_library<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.library.shuffle(rng);
    }
}

fn clamp_to_life(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}
