//! Enemy stat blocks.
//!
//! Stat blocks are supplied by the encounter generator at encounter start
//! and mutated only by the action resolver (hit points, life state,
//! conditions). They are never recreated mid-combat.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::ActiveCondition;
use crate::entity::EntityId;

/// A category of damage, matched against resistances, vulnerabilities,
/// and immunities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Cutting weapons.
    Slashing,
    /// Pointed weapons.
    Piercing,
    /// Blunt force.
    Bludgeoning,
    /// Flame and heat.
    Fire,
    /// Frost and chill.
    Cold,
    /// Venom and toxins.
    Poison,
    /// Withering, unholy energy.
    Necrotic,
    /// Searing, holy energy.
    Radiant,
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slashing => write!(f, "slashing"),
            Self::Piercing => write!(f, "piercing"),
            Self::Bludgeoning => write!(f, "bludgeoning"),
            Self::Fire => write!(f, "fire"),
            Self::Cold => write!(f, "cold"),
            Self::Poison => write!(f, "poison"),
            Self::Necrotic => write!(f, "necrotic"),
            Self::Radiant => write!(f, "radiant"),
        }
    }
}

/// A dice expression like `2d6+1`: `count` dice of `sides` sides plus a
/// flat modifier. On a critical hit the dice are rolled twice; the
/// modifier is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageExpr {
    /// Number of dice to roll.
    pub count: u32,
    /// Sides per die.
    pub sides: u32,
    /// Flat modifier added once to the rolled total.
    pub modifier: i32,
}

impl DamageExpr {
    /// Create a damage expression.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }
}

impl fmt::Display for DamageExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        Ok(())
    }
}

/// One attack option on an enemy stat block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSpec {
    /// Name of the attack, used in narration ("claw", "rusted blade").
    pub name: String,
    /// Modifier added to the attack roll.
    pub attack_modifier: i32,
    /// Damage rolled on a hit.
    pub damage: DamageExpr,
    /// Damage type dealt.
    pub damage_type: DamageType,
}

impl AttackSpec {
    /// Average damage of this attack, used by tactical enemies to pick
    /// their strongest option.
    pub fn average_damage(&self) -> f32 {
        self.damage.count as f32 * (self.damage.sides as f32 + 1.0) / 2.0
            + self.damage.modifier as f32
    }
}

/// Target-priority descriptor driving enemy decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactics {
    /// Pick off the weakest opposing combatant.
    #[default]
    LowestHp,
    /// Go after whoever poses the greatest threat.
    HighestThreat,
    /// Fight cautiously, preferring defensive stances when wounded.
    Defensive,
}

/// How cleverly an enemy fights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelligenceTier {
    /// Fights on instinct and never routs.
    Mindless,
    /// Basic self-preservation.
    #[default]
    Cunning,
    /// Picks its strongest attack and knows when to withdraw.
    Tactical,
}

/// How an enemy scales incoming damage of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageScale {
    /// No effect: damage applies in full.
    Normal,
    /// Resistant: damage is halved (rounded down).
    Resistant,
    /// Vulnerable: damage is doubled.
    Vulnerable,
    /// Immune: damage is ignored entirely.
    Immune,
}

/// A hostile combatant's full combat profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStatBlock {
    /// Unique id, matching the enemy's initiative entry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Current hit points, always within `[0, max_hp]`.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Armor class attack rolls are compared against.
    pub armor_class: i32,
    /// Modifier added to the enemy's initiative roll.
    pub initiative_modifier: i32,
    /// Attack options; the decision policy picks one per turn.
    pub attacks: Vec<AttackSpec>,
    /// Damage types this enemy takes at half effect.
    pub resistances: Vec<DamageType>,
    /// Damage types this enemy takes at double effect.
    pub vulnerabilities: Vec<DamageType>,
    /// Damage types this enemy ignores.
    pub immunities: Vec<DamageType>,
    /// Target-priority descriptor.
    pub tactics: Tactics,
    /// Raw morale score, for display and future rules.
    pub morale: u32,
    /// Hit-point fraction at or below which morale breaks.
    pub morale_breakpoint: f32,
    /// How cleverly this enemy fights.
    pub intelligence: IntelligenceTier,
    /// Experience awarded when this enemy is defeated.
    pub xp_value: u32,
    /// Gold dropped when this enemy is defeated.
    pub gold_drop: u32,
    /// False once hit points reach zero.
    pub is_alive: bool,
    /// True once the enemy has routed and left the fight.
    #[serde(default)]
    pub has_fled: bool,
    /// Conditions currently affecting this enemy.
    pub conditions: Vec<ActiveCondition>,
}

impl EnemyStatBlock {
    /// Create a stat block with sensible defaults; fill in the rest with
    /// the `with_*` builders.
    pub fn new(name: impl Into<String>, hp: i32, armor_class: i32) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            hp,
            max_hp: hp,
            armor_class,
            initiative_modifier: 0,
            attacks: Vec::new(),
            resistances: Vec::new(),
            vulnerabilities: Vec::new(),
            immunities: Vec::new(),
            tactics: Tactics::default(),
            morale: 10,
            morale_breakpoint: 0.25,
            intelligence: IntelligenceTier::default(),
            xp_value: 0,
            gold_drop: 0,
            is_alive: hp > 0,
            has_fled: false,
            conditions: Vec::new(),
        }
    }

    /// Add an attack option.
    pub fn with_attack(
        mut self,
        name: impl Into<String>,
        attack_modifier: i32,
        damage: DamageExpr,
        damage_type: DamageType,
    ) -> Self {
        self.attacks.push(AttackSpec {
            name: name.into(),
            attack_modifier,
            damage,
            damage_type,
        });
        self
    }

    /// Set the target-priority descriptor.
    pub fn with_tactics(mut self, tactics: Tactics) -> Self {
        self.tactics = tactics;
        self
    }

    /// Set the intelligence tier.
    pub fn with_intelligence(mut self, tier: IntelligenceTier) -> Self {
        self.intelligence = tier;
        self
    }

    /// Set morale score and breakpoint (clamped to `[0, 1]`).
    pub fn with_morale(mut self, morale: u32, breakpoint: f32) -> Self {
        self.morale = morale;
        self.morale_breakpoint = breakpoint.clamp(0.0, 1.0);
        self
    }

    /// Set the initiative modifier.
    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    /// Set XP and gold awarded on defeat.
    pub fn with_rewards(mut self, xp: u32, gold: u32) -> Self {
        self.xp_value = xp;
        self.gold_drop = gold;
        self
    }

    /// Mark a damage type as resisted.
    pub fn with_resistance(mut self, damage_type: DamageType) -> Self {
        self.resistances.push(damage_type);
        self
    }

    /// Mark a damage type as a vulnerability.
    pub fn with_vulnerability(mut self, damage_type: DamageType) -> Self {
        self.vulnerabilities.push(damage_type);
        self
    }

    /// Mark a damage type as ignored.
    pub fn with_immunity(mut self, damage_type: DamageType) -> Self {
        self.immunities.push(damage_type);
        self
    }

    /// How this enemy scales incoming damage of the given type.
    /// Immunity wins over vulnerability wins over resistance.
    pub fn damage_scale(&self, damage_type: DamageType) -> DamageScale {
        if self.immunities.contains(&damage_type) {
            DamageScale::Immune
        } else if self.vulnerabilities.contains(&damage_type) {
            DamageScale::Vulnerable
        } else if self.resistances.contains(&damage_type) {
            DamageScale::Resistant
        } else {
            DamageScale::Normal
        }
    }

    /// Scale a raw damage amount by this enemy's defenses.
    pub fn adjust_damage(&self, amount: i32, damage_type: DamageType) -> i32 {
        match self.damage_scale(damage_type) {
            DamageScale::Normal => amount,
            DamageScale::Resistant => amount / 2,
            DamageScale::Vulnerable => amount * 2,
            DamageScale::Immune => 0,
        }
    }

    /// Apply already-adjusted damage, clamping hit points to `[0, max_hp]`
    /// and flipping `is_alive` when they reach zero. Returns the hit
    /// points actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        if self.hp == 0 {
            self.is_alive = false;
        }
        before - self.hp
    }

    /// Current hit points as a fraction of maximum.
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    /// True when morale has broken: wounded to the breakpoint but still up.
    pub fn morale_broken(&self) -> bool {
        self.is_alive && !self.has_fled && self.hp_fraction() <= self.morale_breakpoint
    }

    /// True when this enemy can still take turns.
    pub fn can_act(&self) -> bool {
        self.is_alive && !self.has_fled
    }

    /// True when this enemy is a legal attack target.
    pub fn can_be_targeted(&self) -> bool {
        self.is_alive && !self.has_fled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ghoul() -> EnemyStatBlock {
        EnemyStatBlock::new("Gravemaw Ghoul", 22, 12)
            .with_attack("claw", 4, DamageExpr::new(1, 6, 2), DamageType::Slashing)
            .with_resistance(DamageType::Necrotic)
            .with_vulnerability(DamageType::Radiant)
            .with_immunity(DamageType::Poison)
            .with_rewards(50, 10)
    }

    #[test]
    fn damage_expr_display() {
        assert_eq!(DamageExpr::new(2, 6, 1).to_string(), "2d6+1");
        assert_eq!(DamageExpr::new(1, 8, 0).to_string(), "1d8");
        assert_eq!(DamageExpr::new(1, 4, -1).to_string(), "1d4-1");
    }

    #[test]
    fn damage_scaling() {
        let e = ghoul();
        assert_eq!(e.adjust_damage(9, DamageType::Slashing), 9);
        assert_eq!(e.adjust_damage(9, DamageType::Necrotic), 4);
        assert_eq!(e.adjust_damage(9, DamageType::Radiant), 18);
        assert_eq!(e.adjust_damage(9, DamageType::Poison), 0);
    }

    #[test]
    fn apply_damage_flips_alive_once() {
        let mut e = ghoul();
        assert_eq!(e.apply_damage(30), 22);
        assert_eq!(e.hp, 0);
        assert!(!e.is_alive);
        // Further damage neither underflows nor resurrects.
        assert_eq!(e.apply_damage(5), 0);
        assert_eq!(e.hp, 0);
        assert!(!e.is_alive);
    }

    #[test]
    fn morale_breaks_at_breakpoint() {
        let mut e = ghoul().with_morale(8, 0.5);
        assert!(!e.morale_broken());
        e.apply_damage(11);
        assert!(e.morale_broken());
        e.apply_damage(11);
        assert!(!e.morale_broken()); // dead, not broken
    }

    #[test]
    fn fled_enemy_neither_acts_nor_is_targetable() {
        let mut e = ghoul();
        e.has_fled = true;
        assert!(!e.can_act());
        assert!(!e.can_be_targeted());
        assert!(e.is_alive);
    }

    #[test]
    fn average_damage_picks_out_heavy_attacks() {
        let light = AttackSpec {
            name: "jab".to_string(),
            attack_modifier: 3,
            damage: DamageExpr::new(1, 4, 0),
            damage_type: DamageType::Piercing,
        };
        let heavy = AttackSpec {
            name: "maul".to_string(),
            attack_modifier: 3,
            damage: DamageExpr::new(2, 8, 1),
            damage_type: DamageType::Bludgeoning,
        };
        assert!(heavy.average_damage() > light.average_damage());
    }
}
