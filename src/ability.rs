//! Ability descriptors and the rules-text parser that produces them.
//!
//! Three kinds of ability are recognized:
//! - Static: a keyword from the closed vocabulary in [`crate::keywords`]
//! - Triggered: "When ... enters" and "Whenever ... attacks" clauses
//! - Activated: `cost: effect` lines whose cost taps the source or spends mana
//!
//! Mana abilities (`{T}: Add {G}`) are not listed as descriptors; the resource ledger
//! reads them through [`mana_production`]. Text the parser does not recognize yields
//! no descriptor at all, and effect text it cannot classify becomes [`Effect::Custom`].

use std::fmt;

use crate::card::CardDefinition;
use crate::color::Color;
use crate::keywords::{Keyword, KeywordSet};
use crate::mana::{ManaCost, ManaSymbol, symbols_in};
use crate::text::{
    clauses, contains_phrase, find_phrase, parse_count, strip_reminder_text, word_after,
    word_before,
};

/// Game events that can trigger an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    EntersBattlefield,
    Attacks,
}

/// What an ability or spell does when it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Draw(u32),
    GainLife(u32),
    /// Damage to the opposing player.
    Damage(u32),
    /// Destroy the opponent's best creature.
    Destroy,
    Buff {
        power: i32,
        toughness: i32,
        until_end_of_turn: bool,
    },
    CreateToken {
        power: i32,
        toughness: i32,
    },
    /// Recognized as an ability but not modeled; resolving it only logs.
    Custom(String),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Draw(n) => write!(f, "draw {n}"),
            Effect::GainLife(n) => write!(f, "gain {n} life"),
            Effect::Damage(n) => write!(f, "deal {n} damage"),
            Effect::Destroy => write!(f, "destroy target creature"),
            Effect::Buff {
                power, toughness, ..
            } => write!(f, "{power:+}/{toughness:+}"),
            Effect::CreateToken { power, toughness } => {
                write!(f, "create a {power}/{toughness} token")
            }
            Effect::Custom(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivatedAbility {
    pub cost: ManaCost,
    pub requires_tap: bool,
    pub effect: Effect,
    /// The printed line, for display.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbilityDescriptor {
    Static(Keyword),
    Triggered { event: TriggerEvent, effect: Effect },
    Activated(ActivatedAbility),
}

impl AbilityDescriptor {
    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            AbilityDescriptor::Static(keyword) => Some(*keyword),
            _ => None,
        }
    }
}

impl fmt::Display for AbilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityDescriptor::Static(keyword) => write!(f, "{keyword}"),
            AbilityDescriptor::Triggered { event, effect } => match event {
                TriggerEvent::EntersBattlefield => write!(f, "When this enters: {effect}"),
                TriggerEvent::Attacks => write!(f, "Whenever this attacks: {effect}"),
            },
            AbilityDescriptor::Activated(ability) => write!(f, "{}", ability.text),
        }
    }
}

/// Parses every ability printed on `card`, in text order.
pub fn parse_abilities(card: &CardDefinition) -> Vec<AbilityDescriptor> {
    let text = strip_reminder_text(&card.rules_text);
    let mut abilities = Vec::new();

    for clause in clauses(&text) {
        let lower = clause.to_lowercase();
        if let Some((cost, effect)) = split_cost(&clause) {
            if let Some(ability) = parse_activated(cost, effect, &clause) {
                abilities.push(AbilityDescriptor::Activated(ability));
            }
            continue;
        }
        if let Some(event) = trigger_event(&lower) {
            let effect = parse_effect(trigger_body(&lower));
            abilities.push(AbilityDescriptor::Triggered { event, effect });
            continue;
        }
        abilities.extend(
            KeywordSet::detect(&clause)
                .iter()
                .map(AbilityDescriptor::Static),
        );
    }
    abilities
}

/// Effects an instant or sorcery applies on resolution.
///
/// Each sentence is split on "and"; fragments that don't parse are dropped when the
/// sentence produced at least one recognized effect, otherwise the whole sentence
/// becomes a single [`Effect::Custom`].
pub fn parse_spell_effects(card: &CardDefinition) -> Vec<Effect> {
    let text = strip_reminder_text(&card.rules_text);
    let mut effects = Vec::new();

    for clause in clauses(&text) {
        let lower = clause.to_lowercase();
        if split_cost(&clause).is_some() || trigger_event(&lower).is_some() {
            continue;
        }
        if is_keyword_line(&lower) {
            continue;
        }
        let recognized: Vec<Effect> = lower
            .split(" and ")
            .map(parse_effect)
            .filter(|e| !matches!(e, Effect::Custom(_)))
            .collect();
        if recognized.is_empty() {
            effects.push(Effect::Custom(clause));
        } else {
            effects.extend(recognized);
        }
    }
    effects
}

/// Classifies one lowercase effect clause.
pub fn parse_effect(clause: &str) -> Effect {
    let clause = clause.trim();

    if contains_phrase(clause, "create") && clause.contains("token") {
        let (power, toughness) = unsigned_pt(clause).unwrap_or((1, 1));
        return Effect::CreateToken { power, toughness };
    }
    if let Some((power, toughness)) = signed_pt(clause) {
        return Effect::Buff {
            power,
            toughness,
            until_end_of_turn: clause.contains("until end of turn"),
        };
    }
    if contains_phrase(clause, "destroy") {
        return Effect::Destroy;
    }
    if let Some(at) = find_phrase(clause, "damage")
        && let Some(n) = word_before(clause, at).and_then(parse_count)
    {
        return Effect::Damage(n);
    }
    if let Some(at) = find_phrase(clause, "life")
        && let Some(n) = word_before(clause, at).and_then(parse_count)
        && (contains_phrase(clause, "gain") || contains_phrase(clause, "gains"))
    {
        return Effect::GainLife(n);
    }
    for verb in ["draws", "draw"] {
        if let Some(at) = find_phrase(clause, verb)
            && let Some(n) = word_after(clause, at + verb.len()).and_then(parse_count)
        {
            return Effect::Draw(n);
        }
    }
    Effect::Custom(clause.to_string())
}

/// Mana one activation of the permanent's mana ability produces, `None` entries being
/// colorless. Returns `None` when the text has no mana ability.
///
/// Cards with several mana abilities use the first one that makes colored mana. A choice
/// ("{R} or {G}") yields only its first option.
pub fn mana_production(rules_text: &str) -> Option<Vec<Option<Color>>> {
    let text: String = rules_text
        .chars()
        .map(|c| if c == '(' || c == ')' { '\n' } else { c })
        .collect();

    let mut first = None;
    for clause in clauses(&text) {
        let Some((cost, effect)) = split_cost(&clause) else {
            continue;
        };
        if !cost_requires_tap(cost) || !is_mana_effect(effect) {
            continue;
        }
        let mut produced: Vec<Option<Color>> = Vec::new();
        for symbol in symbols_in(effect) {
            match symbol {
                ManaSymbol::Colored(color) => produced.push(Some(color)),
                ManaSymbol::Colorless => produced.push(None),
                ManaSymbol::Generic(n) => produced.extend((0..n).map(|_| None)),
                _ => {}
            }
        }
        if effect.to_lowercase().contains(" or ") {
            produced.truncate(1);
        }
        if produced.is_empty() {
            produced.push(None);
        }
        if produced.iter().any(Option::is_some) {
            return Some(produced);
        }
        first.get_or_insert(produced);
    }
    first
}

fn split_cost(clause: &str) -> Option<(&str, &str)> {
    let (cost, effect) = clause.split_once(':')?;
    let cost = cost.trim();
    (!cost.is_empty()).then_some((cost, effect.trim()))
}

fn cost_requires_tap(cost: &str) -> bool {
    symbols_in(cost).contains(&ManaSymbol::Tap) || contains_phrase(&cost.to_lowercase(), "tap")
}

fn is_mana_effect(effect: &str) -> bool {
    let lower = effect.to_lowercase();
    lower.starts_with("add ") || lower.contains(" add ")
}

fn parse_activated(cost: &str, effect: &str, clause: &str) -> Option<ActivatedAbility> {
    let requires_tap = cost_requires_tap(cost);
    let spends_mana = symbols_in(cost)
        .iter()
        .any(|s| !matches!(s, ManaSymbol::Tap));
    if !(requires_tap || spends_mana) || is_mana_effect(effect) {
        return None;
    }
    Some(ActivatedAbility {
        cost: ManaCost::parse(cost),
        requires_tap,
        effect: parse_effect(&effect.to_lowercase()),
        text: clause.to_string(),
    })
}

fn trigger_event(lower: &str) -> Option<TriggerEvent> {
    if !lower.starts_with("when") {
        return None;
    }
    let condition = lower.split_once(',').map_or(lower, |(c, _)| c);
    if contains_phrase(condition, "enters") {
        Some(TriggerEvent::EntersBattlefield)
    } else if contains_phrase(condition, "attacks") {
        Some(TriggerEvent::Attacks)
    } else {
        None
    }
}

fn trigger_body(lower: &str) -> &str {
    lower.split_once(',').map_or(lower, |(_, body)| body)
}

fn is_keyword_line(lower: &str) -> bool {
    lower
        .split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .all(|part| Keyword::ALL.iter().any(|k| k.phrase() == part))
}

fn words(clause: &str) -> impl Iterator<Item = &str> {
    clause
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, ',' | '.' | ';' | '"')))
}

/// First `+X/+Y` style modifier in the clause.
fn signed_pt(clause: &str) -> Option<(i32, i32)> {
    words(clause).find_map(|word| {
        let (p, t) = word.split_once('/')?;
        let signed = |s: &str| s.starts_with('+') || s.starts_with('-');
        if !(signed(p) && signed(t)) {
            return None;
        }
        Some((p.parse().ok()?, t.parse().ok()?))
    })
}

/// First plain `N/M` in the clause, as printed on tokens.
fn unsigned_pt(clause: &str) -> Option<(i32, i32)> {
    words(clause).find_map(|word| {
        let (p, t) = word.split_once('/')?;
        let unsigned = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !(unsigned(p) && unsigned(t)) {
            return None;
        }
        Some((p.parse().ok()?, t.parse().ok()?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::PowerToughness;

    fn creature(text: &str) -> CardDefinition {
        CardDefinition::builder("Test Creature")
            .mana_cost("{2}{G}")
            .type_line("Creature — Beast")
            .power_toughness(PowerToughness::fixed(2, 2))
            .rules_text(text)
            .build()
    }

    fn sorcery(text: &str) -> CardDefinition {
        CardDefinition::builder("Test Spell")
            .mana_cost("{1}{R}")
            .type_line("Sorcery")
            .rules_text(text)
            .build()
    }

    #[test]
    fn test_parse_effect_vocabulary() {
        assert_eq!(parse_effect("draw two cards"), Effect::Draw(2));
        assert_eq!(parse_effect("you draw a card"), Effect::Draw(1));
        assert_eq!(parse_effect("you gain 3 life"), Effect::GainLife(3));
        assert_eq!(parse_effect("it deals 2 damage to any target"), Effect::Damage(2));
        assert_eq!(parse_effect("destroy target creature"), Effect::Destroy);
        assert_eq!(
            parse_effect("it gets +2/+0 until end of turn"),
            Effect::Buff {
                power: 2,
                toughness: 0,
                until_end_of_turn: true
            }
        );
        assert_eq!(
            parse_effect("create a 2/2 green wolf creature token"),
            Effect::CreateToken {
                power: 2,
                toughness: 2
            }
        );
        assert_eq!(
            parse_effect("create a treasure token"),
            Effect::CreateToken {
                power: 1,
                toughness: 1
            }
        );
        assert!(matches!(parse_effect("scry 2"), Effect::Custom(_)));
    }

    #[test]
    fn test_keywords_become_static_descriptors() {
        let card = creature("Flying, trample");
        assert_eq!(
            card.abilities,
            vec![
                AbilityDescriptor::Static(Keyword::Flying),
                AbilityDescriptor::Static(Keyword::Trample),
            ]
        );
    }

    #[test]
    fn test_enter_and_attack_triggers() {
        let card = creature(
            "When this creature enters, you gain 2 life.\nWhenever this creature attacks, it gets +1/+1 until end of turn.",
        );
        assert_eq!(
            card.abilities[0],
            AbilityDescriptor::Triggered {
                event: TriggerEvent::EntersBattlefield,
                effect: Effect::GainLife(2),
            }
        );
        assert!(matches!(
            card.abilities[1],
            AbilityDescriptor::Triggered {
                event: TriggerEvent::Attacks,
                effect: Effect::Buff { power: 1, toughness: 1, .. },
            }
        ));
    }

    #[test]
    fn test_activated_ability_with_tap_and_mana() {
        let card = creature("{2}, {T}: Draw a card.");
        let [AbilityDescriptor::Activated(ability)] = card.abilities.as_slice() else {
            panic!("expected one activated ability, got {:?}", card.abilities);
        };
        assert!(ability.requires_tap);
        assert_eq!(ability.cost.cmc(), 2);
        assert_eq!(ability.effect, Effect::Draw(1));
    }

    #[test]
    fn test_mana_ability_is_not_a_descriptor() {
        let card = creature("{T}: Add {G}.");
        assert!(card.abilities.is_empty());
        assert_eq!(mana_production(&card.rules_text), Some(vec![Some(Color::Green)]));
    }

    #[test]
    fn test_unrecognized_text_yields_nothing() {
        assert!(creature("This creature can't be countered.").abilities.is_empty());
    }

    #[test]
    fn test_mana_production_choices_and_reminders() {
        assert_eq!(
            mana_production("{T}: Add {R} or {G}."),
            Some(vec![Some(Color::Red)])
        );
        assert_eq!(
            mana_production("({T}: Add {U}.)"),
            Some(vec![Some(Color::Blue)])
        );
        assert_eq!(
            mana_production("{T}: Add {C}.\n{T}: Add {B}. This land deals 1 damage to you."),
            Some(vec![Some(Color::Black)])
        );
        assert_eq!(mana_production("{T}: Add {C}{C}."), Some(vec![None, None]));
        assert_eq!(mana_production("Flying"), None);
    }

    #[test]
    fn test_spell_effects_split_on_and() {
        let helix = sorcery("Lightning Helix deals 3 damage to any target and you gain 3 life.");
        assert_eq!(
            parse_spell_effects(&helix),
            vec![Effect::Damage(3), Effect::GainLife(3)]
        );
        let odd = sorcery("Scry 2.");
        assert_eq!(parse_spell_effects(&odd), vec![Effect::Custom("Scry 2".to_string())]);
    }
}
