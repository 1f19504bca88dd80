//! WASM-facing API for browser integration.
//!
//! Wraps a [`Duel`] so JavaScript can start a game against the AI, send the human's
//! actions, and read back serializable snapshots.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::catalog::{CardRegistry, Decklist, DecklistFile};
use crate::config::{Difficulty, GameConfig};
use crate::duel::Duel;
use crate::error::ActionError;
use crate::ids::InstanceId;

#[derive(Serialize)]
struct ActionReply<'a> {
    ok: bool,
    messages: &'a [String],
    error: Option<String>,
}

#[wasm_bindgen]
pub struct WasmDuel {
    duel: Duel,
    registry: CardRegistry,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn reply(result: Result<Vec<String>, ActionError>) -> Result<JsValue, JsValue> {
    let (messages, error) = match result {
        Ok(messages) => (messages, None),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };
    let body = ActionReply {
        ok: error.is_none(),
        messages: &messages,
        error,
    };
    serde_wasm_bindgen::to_value(&body).map_err(js_error)
}

impl WasmDuel {
    fn deck(registry: &mut CardRegistry, json: Option<String>) -> Result<Decklist, JsValue> {
        match json {
            Some(text) => DecklistFile::from_json(&text)
                .and_then(|file| file.resolve(registry))
                .map_err(js_error),
            None => registry.basic_ai_deck().map_err(js_error),
        }
    }
}

#[wasm_bindgen]
impl WasmDuel {
    /// Start a duel. Without a deck JSON the human plays the basic deck too.
    #[wasm_bindgen(constructor)]
    pub fn new(
        difficulty: &str,
        player_deck_json: Option<String>,
        seed: Option<u64>,
    ) -> Result<WasmDuel, JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(|err: String| js_error(err))?;
        let mut registry = CardRegistry::with_builtin();
        let player_deck = Self::deck(&mut registry, player_deck_json)?;
        let ai_deck = registry.basic_ai_deck().map_err(js_error)?;
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        Ok(Self {
            duel: Duel::start_game(&player_deck, &ai_deck, difficulty, config),
            registry,
        })
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.duel.get_snapshot()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.duel.get_snapshot()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = registrySize)]
    pub fn registry_size(&self) -> usize {
        self.registry.len()
    }

    #[wasm_bindgen]
    pub fn mulligan(&mut self) -> Result<JsValue, JsValue> {
        reply(self.duel.mulligan())
    }

    #[wasm_bindgen(js_name = keepHand)]
    pub fn keep_hand(&mut self) -> Result<JsValue, JsValue> {
        reply(self.duel.keep_hand())
    }

    #[wasm_bindgen(js_name = playCard)]
    pub fn play_card(&mut self, instance_id: u64) -> Result<JsValue, JsValue> {
        reply(self.duel.play_card(InstanceId::from_raw(instance_id)))
    }

    #[wasm_bindgen(js_name = declareAttacker)]
    pub fn declare_attacker(&mut self, instance_id: u64) -> Result<JsValue, JsValue> {
        reply(self.duel.declare_attacker(InstanceId::from_raw(instance_id)))
    }

    #[wasm_bindgen(js_name = declareBlocker)]
    pub fn declare_blocker(&mut self, instance_id: u64) -> Result<JsValue, JsValue> {
        reply(self.duel.declare_blocker(InstanceId::from_raw(instance_id)))
    }

    #[wasm_bindgen(js_name = activateAbility)]
    pub fn activate_ability(
        &mut self,
        instance_id: u64,
        ability_index: usize,
    ) -> Result<JsValue, JsValue> {
        reply(
            self.duel
                .activate_ability(InstanceId::from_raw(instance_id), ability_index),
        )
    }

    #[wasm_bindgen(js_name = endPhase)]
    pub fn end_phase(&mut self) -> Result<JsValue, JsValue> {
        reply(self.duel.end_phase())
    }

    #[wasm_bindgen]
    pub fn concede(&mut self) -> Result<JsValue, JsValue> {
        let result = self.duel.concede().map_err(js_error)?;
        serde_wasm_bindgen::to_value(&result).map_err(js_error)
    }
}
