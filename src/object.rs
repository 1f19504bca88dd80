use std::sync::Arc;

use crate::ability::AbilityDescriptor;
use crate::card::CardDefinition;
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::{Keyword, KeywordSet};
use crate::zone::Zone;

/// A card in play: its definition plus everything that changes during a game.
///
/// `power` and `toughness` are current absolute values. Combat damage lowers
/// `toughness` directly; [`CardInstance::cleanup`] restores both at end of turn,
/// keeping any permanent modifiers.
#[derive(Debug, Clone)]
pub struct CardInstance {
    pub id: InstanceId,
    pub definition: Arc<CardDefinition>,
    pub controller: PlayerKey,
    pub zone: Zone,
    pub tapped: bool,
    pub summoning_sick: bool,
    pub attacked_this_turn: bool,
    pub power: i32,
    pub toughness: i32,
    /// Keyword flags currently in effect; set on entering the battlefield.
    pub keywords: KeywordSet,
    pub is_token: bool,
    power_modifier: i32,
    toughness_modifier: i32,
}

impl CardInstance {
    pub fn new(
        id: InstanceId,
        definition: Arc<CardDefinition>,
        controller: PlayerKey,
        zone: Zone,
    ) -> Self {
        let power = definition.base_power();
        let toughness = definition.base_toughness();
        Self {
            id,
            definition,
            controller,
            zone,
            tapped: false,
            summoning_sick: false,
            attacked_this_turn: false,
            power,
            toughness,
            keywords: KeywordSet::new(),
            is_token: false,
            power_modifier: 0,
            toughness_modifier: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn is_creature(&self) -> bool {
        self.definition.is_creature()
    }

    pub fn is_land(&self) -> bool {
        self.definition.is_land()
    }

    pub fn abilities(&self) -> &[AbilityDescriptor] {
        &self.definition.abilities
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    /// First strike or double strike.
    pub fn strikes_first(&self) -> bool {
        self.has_keyword(Keyword::FirstStrike) || self.has_keyword(Keyword::DoubleStrike)
    }

    /// Adjusts current power/toughness. Permanent changes also survive cleanup.
    pub fn modify_pt(&mut self, power: i32, toughness: i32, until_end_of_turn: bool) {
        self.power += power;
        self.toughness += toughness;
        if !until_end_of_turn {
            self.power_modifier += power;
            self.toughness_modifier += toughness;
        }
    }

    /// Heals damage and ends "until end of turn" effects.
    pub fn cleanup(&mut self) {
        self.power = self.definition.base_power() + self.power_modifier;
        self.toughness = self.definition.base_toughness() + self.toughness_modifier;
    }

    /// Forgets everything tied to the previous zone. Keyword flags are re-applied by the
    /// static-ability pass if the card lands on the battlefield again.
    pub fn reset_for_zone_change(&mut self) {
        self.tapped = false;
        self.summoning_sick = false;
        self.attacked_this_turn = false;
        self.keywords.clear();
        self.power_modifier = 0;
        self.toughness_modifier = 0;
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::PowerToughness;

    fn bear() -> CardInstance {
        let def = CardDefinition::builder("Grizzly Bears")
            .mana_cost("{1}{G}")
            .type_line("Creature — Bear")
            .power_toughness(PowerToughness::fixed(2, 2))
            .build();
        CardInstance::new(
            InstanceId::from_raw(1),
            Arc::new(def),
            PlayerKey::Player,
            Zone::Hand,
        )
    }

    #[test]
    fn test_new_instance_uses_printed_stats() {
        let card = bear();
        assert_eq!((card.power, card.toughness), (2, 2));
        assert!(!card.tapped);
        assert!(card.keywords.is_empty());
    }

    #[test]
    fn test_cleanup_drops_temporary_buffs_and_damage() {
        let mut card = bear();
        card.modify_pt(3, 3, true);
        card.modify_pt(1, 1, false);
        card.toughness -= 4;
        card.cleanup();
        assert_eq!((card.power, card.toughness), (3, 3));
    }

    #[test]
    fn test_zone_change_resets_everything() {
        let mut card = bear();
        card.tapped = true;
        card.summoning_sick = true;
        card.keywords.insert(Keyword::Flying);
        card.modify_pt(1, 1, false);
        card.reset_for_zone_change();
        assert!(!card.tapped);
        assert!(!card.summoning_sick);
        assert!(!card.has_keyword(Keyword::Flying));
        assert_eq!((card.power, card.toughness), (2, 2));
    }
}
