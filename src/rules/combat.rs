//! Combat legality.
//!
//! This module handles:
//! - Attack restrictions (defender, summoning sickness, tapped, one attack per turn)
//! - Blocking restrictions (flying/reach, menace)
//! - Choosing a blocker for a defender who blocks automatically

use std::fmt;

use crate::game_state::GameState;
use crate::ids::{InstanceId, PlayerKey};
use crate::keywords::Keyword;
use crate::object::CardInstance;
use crate::zone::Zone;

/// Why a creature may not attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackRestriction {
    NotACreature,
    NotOnBattlefield,
    NotController,
    HasDefender,
    SummoningSickness,
    AlreadyTapped,
    AlreadyAttacked,
}

impl fmt::Display for AttackRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AttackRestriction::NotACreature => "Not a creature",
            AttackRestriction::NotOnBattlefield => "Not on the battlefield",
            AttackRestriction::NotController => "Not your creature",
            AttackRestriction::HasDefender => "Has defender",
            AttackRestriction::SummoningSickness => "Summoning sickness",
            AttackRestriction::AlreadyTapped => "Already tapped",
            AttackRestriction::AlreadyAttacked => "Already attacked this turn",
        };
        write!(f, "{reason}")
    }
}

/// Result of an attack legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackCheck {
    pub allowed: bool,
    pub reason: Option<AttackRestriction>,
}

impl AttackCheck {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: AttackRestriction) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Whether `card` may be declared as an attacker by `owner` right now.
pub fn can_attack(card: &CardInstance, owner: PlayerKey) -> AttackCheck {
    if !card.is_creature() {
        return AttackCheck::denied(AttackRestriction::NotACreature);
    }
    if card.zone != Zone::Battlefield {
        return AttackCheck::denied(AttackRestriction::NotOnBattlefield);
    }
    if card.controller != owner {
        return AttackCheck::denied(AttackRestriction::NotController);
    }
    if card.has_keyword(Keyword::Defender) {
        return AttackCheck::denied(AttackRestriction::HasDefender);
    }
    if card.summoning_sick && !card.has_keyword(Keyword::Haste) {
        return AttackCheck::denied(AttackRestriction::SummoningSickness);
    }
    if card.tapped {
        return AttackCheck::denied(AttackRestriction::AlreadyTapped);
    }
    if card.attacked_this_turn {
        return AttackCheck::denied(AttackRestriction::AlreadyAttacked);
    }
    AttackCheck::allowed()
}

/// Check if a blocker can legally block an attacker on its own.
///
/// Blocks are always made by a single creature, so menace makes an attacker unblockable.
pub fn can_block(attacker: &CardInstance, blocker: &CardInstance) -> bool {
    if !blocker.is_creature() || blocker.tapped || blocker.zone != Zone::Battlefield {
        return false;
    }
    if attacker.has_keyword(Keyword::Menace) {
        return false;
    }
    if attacker.has_keyword(Keyword::Flying)
        && !blocker.has_keyword(Keyword::Flying)
        && !blocker.has_keyword(Keyword::Reach)
    {
        return false;
    }
    true
}

/// Picks the first untapped creature of `defender` that can legally block and whose
/// toughness is at least the attacker's power, so an even trade is accepted. Creatures
/// in `exclude` have already blocked this turn.
pub fn select_blocker(
    game: &GameState,
    attacker: InstanceId,
    defender: PlayerKey,
    exclude: &[InstanceId],
) -> Option<InstanceId> {
    let attacker = game.instance(attacker)?;
    game.creatures(defender).into_iter().find(|id| {
        !exclude.contains(id)
            && game.instance(*id).is_some_and(|blocker| {
                can_block(attacker, blocker) && blocker.toughness >= attacker.power
            })
    })
}
