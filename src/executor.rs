//! Applies abilities and effects to the game.
//!
//! Static keywords are switched on when a permanent enters the battlefield, triggered
//! abilities fire on entering and attacking, and effects resolve immediately. Effects the
//! parser could not classify are reported and otherwise ignored.

use std::sync::Arc;

use log::warn;

use crate::ability::{AbilityDescriptor, Effect, TriggerEvent, parse_spell_effects};
use crate::card::{CardDefinition, PowerToughness};
use crate::error::ActionError;
use crate::game_state::GameState;
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::ledger::{
    auto_tap_lands_excluding, available_mana_excluding, can_pay, refresh_mana_pool,
    untapped_land_count,
};
use crate::rules::state_based::{
    apply_game_over_checks, draw_or_lose, put_dead_creatures_in_graveyard,
};
use crate::zone::Zone;

/// Where an effect comes from; decides what a pump effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOrigin {
    /// Triggered or activated ability of a permanent: it pumps itself.
    Permanent,
    /// Instant or sorcery: it pumps the caster's biggest creature.
    Spell,
}

/// Turns on the keyword flags printed on the card.
pub fn apply_static(game: &mut GameState, id: InstanceId) {
    if let Some(card) = game.instance_mut(id) {
        card.keywords = card.definition.keywords;
    }
}

pub fn trigger_etb(game: &mut GameState, id: InstanceId, owner: PlayerKey) -> Vec<String> {
    fire_triggers(game, id, owner, TriggerEvent::EntersBattlefield)
}

pub fn trigger_attack(game: &mut GameState, id: InstanceId, owner: PlayerKey) -> Vec<String> {
    fire_triggers(game, id, owner, TriggerEvent::Attacks)
}

fn fire_triggers(
    game: &mut GameState,
    id: InstanceId,
    owner: PlayerKey,
    event: TriggerEvent,
) -> Vec<String> {
    let Some(card) = game.instance(id) else {
        return Vec::new();
    };
    let effects: Vec<Effect> = card
        .abilities()
        .iter()
        .filter_map(|ability| match ability {
            AbilityDescriptor::Triggered { event: e, effect } if *e == event => {
                Some(effect.clone())
            }
            _ => None,
        })
        .collect();

    let mut messages = Vec::new();
    for effect in effects {
        if game.is_over() {
            break;
        }
        messages.extend(resolve_effect(game, &effect, id, owner, EffectOrigin::Permanent));
    }
    messages
}

/// Resolves the effects of an instant or sorcery that is on the stack.
pub fn resolve_spell(game: &mut GameState, id: InstanceId, owner: PlayerKey) -> Vec<String> {
    let Some(card) = game.instance(id) else {
        return Vec::new();
    };
    let effects = parse_spell_effects(&card.definition);
    let mut messages = Vec::new();
    for effect in effects {
        if game.is_over() {
            break;
        }
        messages.extend(resolve_effect(game, &effect, id, owner, EffectOrigin::Spell));
    }
    messages
}

/// Applies one effect for `owner`. Returns the log lines it produced.
pub fn resolve_effect(
    game: &mut GameState,
    effect: &Effect,
    source: InstanceId,
    owner: PlayerKey,
    origin: EffectOrigin,
) -> Vec<String> {
    let source_name = game
        .instance(source)
        .map(|card| card.name().to_string())
        .unwrap_or_default();
    let mut messages = Vec::new();

    match effect {
        Effect::Draw(count) => {
            let mut drawn = 0;
            for _ in 0..*count {
                if draw_or_lose(game, owner).is_none() {
                    break;
                }
                drawn += 1;
            }
            messages.push(format!("{owner} draws {drawn} card(s) from {source_name}"));
        }
        Effect::GainLife(amount) => {
            game.player_mut(owner).gain_life(*amount);
            messages.push(format!("{owner} gains {amount} life from {source_name}"));
        }
        Effect::Damage(amount) => {
            let target = owner.opponent();
            game.player_mut(target).deal_damage(*amount);
            messages.push(format!("{source_name} deals {amount} damage to {target}"));
        }
        Effect::Destroy => messages.push(destroy_best_creature(game, owner.opponent(), &source_name)),
        Effect::Buff {
            power,
            toughness,
            until_end_of_turn,
        } => {
            let target = match origin {
                EffectOrigin::Permanent => Some(source),
                EffectOrigin::Spell => strongest_creature(game, owner, false),
            };
            match target.and_then(|id| game.instance_mut(id)) {
                Some(card) if card.is_creature() && card.zone == Zone::Battlefield => {
                    card.modify_pt(*power, *toughness, *until_end_of_turn);
                    messages.push(format!(
                        "{} gets {power:+}/{toughness:+} ({}/{})",
                        card.name(),
                        card.power,
                        card.toughness
                    ));
                }
                _ => messages.push(format!("{source_name} has no creature to pump")),
            }
            messages.extend(put_dead_creatures_in_graveyard(game));
        }
        Effect::CreateToken { power, toughness } => {
            let token = CardDefinition::builder(format!("{source_name} Token"))
                .type_line("Creature — Token")
                .power_toughness(PowerToughness::fixed(*power, *toughness))
                .build();
            let id = game.create_instance(Arc::new(token), owner, Zone::Battlefield);
            if let Some(card) = game.instance_mut(id) {
                card.is_token = true;
                card.summoning_sick = true;
            }
            messages.push(format!(
                "{source_name} creates a {power}/{toughness} token for {owner}"
            ));
        }
        Effect::Custom(text) => {
            warn!("unsupported ability on {source_name}: {text}");
            messages.push(format!("{source_name}: \"{text}\" is not supported"));
        }
    }

    for message in &messages {
        game.push_log(message.clone());
    }
    apply_game_over_checks(game);
    messages
}

/// The highest-power creature `owner` controls. Ties go to the earliest on the battlefield.
fn strongest_creature(game: &GameState, owner: PlayerKey, skip_hexproof: bool) -> Option<InstanceId> {
    let mut best: Option<(InstanceId, i32)> = None;
    for id in game.creatures(owner) {
        let Some(card) = game.instance(id) else {
            continue;
        };
        if skip_hexproof && card.has_keyword(Keyword::Hexproof) {
            continue;
        }
        if best.is_none_or(|(_, power)| card.power > power) {
            best = Some((id, card.power));
        }
    }
    best.map(|(id, _)| id)
}

fn destroy_best_creature(game: &mut GameState, victim: PlayerKey, source_name: &str) -> String {
    let Some(target) = strongest_creature(game, victim, true) else {
        return format!("{source_name} finds no creature to destroy");
    };
    let Some(card) = game.instance(target) else {
        return format!("{source_name} finds no creature to destroy");
    };
    let name = card.name().to_string();
    if card.has_keyword(Keyword::Indestructible) {
        return format!("{name} is indestructible and survives {source_name}");
    }
    game.move_instance(target, Zone::Graveyard);
    format!("{source_name} destroys {name}")
}

/// Activates ability `index` of a permanent `owner` controls.
///
/// Everything is checked before anything is paid, so a failed activation leaves the
/// game untouched.
pub fn activate_ability(
    game: &mut GameState,
    id: InstanceId,
    index: usize,
    owner: PlayerKey,
) -> Result<Vec<String>, ActionError> {
    let not_found = ActionError::CardNotFound {
        id,
        zone: Zone::Battlefield,
    };
    let card = game.instance(id).ok_or(not_found.clone())?;
    if card.zone != Zone::Battlefield || card.controller != owner {
        return Err(not_found);
    }
    let descriptor = card
        .abilities()
        .get(index)
        .ok_or(ActionError::InvalidAbilityIndex(index))?;
    let AbilityDescriptor::Activated(ability) = descriptor else {
        return Err(ActionError::NotAnActivatedAbility);
    };
    let ability = ability.clone();
    let name = card.name().to_string();

    if ability.requires_tap {
        if card.tapped {
            return Err(ActionError::AlreadyTapped);
        }
        if card.is_creature() && card.summoning_sick && !card.has_keyword(Keyword::Haste) {
            return Err(ActionError::SummoningSick);
        }
    }

    let exclude = ability.requires_tap.then_some(id);
    let pool = available_mana_excluding(game, owner, exclude);
    let required = ability.cost.cmc();
    if required > pool.total() {
        return Err(ActionError::InsufficientMana {
            required,
            available: pool.total(),
        });
    }
    if !can_pay(&pool, &ability.cost) {
        return Err(ActionError::CannotPayColors);
    }
    if !auto_tap_lands_excluding(game, owner, required, exclude) {
        return Err(ActionError::InsufficientMana {
            required,
            available: untapped_land_count(game, owner) as u32,
        });
    }
    if ability.requires_tap
        && let Some(card) = game.instance_mut(id)
    {
        card.tapped = true;
    }
    refresh_mana_pool(game, owner);

    game.push_log(format!("{owner} activates {name}: {}", ability.text));
    Ok(resolve_effect(
        game,
        &ability.effect,
        id,
        owner,
        EffectOrigin::Permanent,
    ))
}
