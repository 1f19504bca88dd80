//! Rules for combat legality, combat damage, and game-over checks.

pub mod combat;
pub mod damage;
pub mod state_based;

pub use combat::{AttackCheck, AttackRestriction, can_attack, can_block, select_blocker};
pub use damage::{
    DamageResult, DamageTarget, calculate_damage, calculate_trample_excess, resolve_combat_damage,
};
pub use state_based::{
    GameOverReason, GameResult, apply_game_over_checks, check_game_over, draw_or_lose,
    put_dead_creatures_in_graveyard, record_loss,
};
