//! Combatant identity: ids, kinds, initiative entries, and the
//! player-side character summary handed to the engine per request.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enemy::{DamageExpr, DamageType};

/// Unique identifier for every combatant in an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Which side of the encounter a combatant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKind {
    /// The player character.
    Player,
    /// An ally fighting alongside the player.
    Companion,
    /// A hostile combatant with a stat block.
    Enemy,
}

impl CombatantKind {
    /// Returns true for the player and their companions.
    pub fn is_player_aligned(self) -> bool {
        matches!(self, Self::Player | Self::Companion)
    }
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Companion => write!(f, "companion"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

/// One slot in the initiative order. Immutable after encounter creation:
/// combatants that die stay in the order and are skipped, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeEntry {
    /// The combatant this slot belongs to.
    pub entity_id: EntityId,
    /// Which side the combatant is on.
    pub kind: CombatantKind,
    /// Display name of the combatant.
    pub name: String,
    /// Rolled initiative total (d20 + modifier).
    pub total: i32,
    /// The modifier that contributed to the total, kept for tie-break
    /// auditing and display.
    pub modifier: i32,
}

/// A companion in the initiative order. Companions carry no stat block in
/// this core; they only occupy a slot that returns control to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    /// The companion's id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Modifier added to the companion's initiative roll.
    pub initiative_modifier: i32,
}

/// The acting player character, passed into the engine per request.
///
/// The character sheet itself is owned elsewhere; this is the slice of it
/// the combat engine reads and the only part it writes (hit points).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSummary {
    /// The player's id, matching their initiative entry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Current hit points, always within `[0, max_hp]`.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Armor class enemy attacks roll against.
    pub armor_class: i32,
    /// Modifier added to the player's attack rolls.
    pub attack_modifier: i32,
    /// Modifier added to stealth checks when hiding.
    pub stealth_modifier: i32,
    /// Modifier added to the initiative roll.
    pub initiative_modifier: i32,
    /// Name of the player's readied attack, used in narration.
    pub attack_name: String,
    /// Damage expression of the readied attack.
    pub damage: DamageExpr,
    /// Damage type the readied attack deals.
    pub damage_type: DamageType,
}

impl CharacterSummary {
    /// Apply damage to the player, clamping hit points to `[0, max_hp]`.
    /// Returns the hit points actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        before - self.hp
    }

    /// Returns true once hit points have reached zero.
    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn summary(hp: i32, max_hp: i32) -> CharacterSummary {
        CharacterSummary {
            id: EntityId::new(),
            name: "Kael".to_string(),
            hp,
            max_hp,
            armor_class: 14,
            attack_modifier: 5,
            stealth_modifier: 3,
            initiative_modifier: 2,
            attack_name: "longsword".to_string(),
            damage: DamageExpr::new(1, 8, 2),
            damage_type: DamageType::Slashing,
        }
    }

    #[test]
    fn entity_id_display_shows_short_form() {
        let id = EntityId(uuid::Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn kind_alignment() {
        assert!(CombatantKind::Player.is_player_aligned());
        assert!(CombatantKind::Companion.is_player_aligned());
        assert!(!CombatantKind::Enemy.is_player_aligned());
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut s = summary(5, 20);
        let lost = s.apply_damage(12);
        assert_eq!(lost, 5);
        assert_eq!(s.hp, 0);
        assert!(s.is_down());
    }

    #[test]
    fn negative_damage_is_ignored() {
        let mut s = summary(5, 20);
        assert_eq!(s.apply_damage(-4), 0);
        assert_eq!(s.hp, 5);
    }

    proptest! {
        #[test]
        fn hp_always_within_bounds(start in 0i32..200, dmg in -50i32..500) {
            let mut s = summary(start.min(100), 100);
            s.apply_damage(dmg);
            prop_assert!((0..=s.max_hp).contains(&s.hp));
        }
    }
}
