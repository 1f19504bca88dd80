pub mod ability;
pub mod ai;
pub mod card;
pub mod catalog;
pub mod color;
pub mod config;
pub mod duel;
pub mod engine;
pub mod error;
pub mod executor;
pub mod game_state;
pub mod ids;
pub mod keywords;
pub mod ledger;
pub mod mana;
pub mod object;
pub mod player;
pub mod rules;
pub mod snapshot;
pub mod text;
pub mod turn;
pub mod types;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm_api;
pub mod zone;


pub use ability::{AbilityDescriptor, ActivatedAbility, Effect, TriggerEvent};
pub use ai::AiOpponent;
pub use card::{CardDefinition, CardDefinitionBuilder, PowerToughness, PtValue};
pub use catalog::{
    CardCatalog, CardRegistry, DeckEntry, DeckStore, Decklist, MemoryDeckStore, builtin_cards,
};
#[cfg(feature = "serialization")]
pub use catalog::{CardRecord, DeckSlot, DecklistFile};
pub use color::{Color, ColorSet};
pub use config::{Difficulty, GameConfig};
pub use duel::Duel;
pub use engine::{ActionApi, GameEngine};
pub use error::{ActionError, CatalogError};
pub use game_state::{GameState, Phase, StackEntry, TurnState};
pub use ids::{InstanceId, PlayerKey};
pub use keywords::{Keyword, KeywordSet};
pub use mana::{ManaCost, ManaPool, ManaSymbol};
pub use object::CardInstance;
pub use player::PlayerState;
pub use rules::{
    AttackCheck, AttackRestriction, DamageResult, DamageTarget, GameOverReason, GameResult,
    can_attack, can_block, check_game_over, resolve_combat_damage,
};
pub use snapshot::{AbilityView, CardView, GameSnapshot, PlayerView};
pub use turn::{PhaseTransition, advance_phase, is_sorcery_timing};
pub use types::{CardType, Rarity, TypeLine};
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm_api::WasmDuel;
pub use zone::Zone;
