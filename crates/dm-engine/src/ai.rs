//! Enemy decision policy.
//!
//! Deterministic given the same state and die sequence. Morale is the
//! one place randomness steers *choice* rather than outcome, and it
//! draws from the same injectable roller as every other roll.

use dm_core::{
    ActionKind, AttackSpec, CharacterSummary, EnemyStatBlock, EntityId, IntelligenceTier,
    Tactics,
};

use crate::conditions::has_condition;
use crate::dice::{Die, DieRoller};
use crate::policy::CombatPolicy;

/// Pick the action an enemy takes this turn.
///
/// A morale-broken enemy (other than a mindless one) rolls d100 once:
/// under the flee chance it routs, under flee + defend it turtles,
/// otherwise it fights on. Defensive enemies below half health
/// alternate between dodging and attacking. Enemies with no attack
/// options fall back to dodging.
pub fn choose_enemy_action(
    enemy: &EnemyStatBlock,
    policy: &CombatPolicy,
    roller: &mut dyn DieRoller,
) -> ActionKind {
    if enemy.morale_broken() && enemy.intelligence != IntelligenceTier::Mindless {
        let roll = roller.roll(Die::D100);
        tracing::debug!(enemy = %enemy.name, roll, "morale check");
        if roll <= policy.morale_flee_chance {
            return ActionKind::Flee;
        }
        if roll <= policy.morale_flee_chance + policy.morale_defend_chance {
            return ActionKind::Dodge;
        }
    }

    if enemy.tactics == Tactics::Defensive
        && enemy.hp_fraction() < 0.5
        && !has_condition(&enemy.conditions, dm_core::ConditionKind::Dodging)
    {
        return ActionKind::Dodge;
    }

    if enemy.attacks.is_empty() {
        return ActionKind::Dodge;
    }
    ActionKind::Attack
}

/// Pick the target of an enemy attack: the lowest-HP living combatant on
/// the player's side. Companions carry no stat block in this core, so
/// the player is always the chosen target; the tactics descriptor keeps
/// its say over action choice rather than target choice until allies
/// track hit points.
pub fn choose_target(_enemy: &EnemyStatBlock, player: &CharacterSummary) -> EntityId {
    player.id
}

/// Pick which attack option an enemy strikes with: tactical enemies use
/// their hardest-hitting option, everything else leads with its first.
pub fn select_attack(enemy: &EnemyStatBlock) -> Option<&AttackSpec> {
    match enemy.intelligence {
        IntelligenceTier::Tactical => enemy.attacks.iter().max_by(|a, b| {
            a.average_damage()
                .partial_cmp(&b.average_damage())
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        _ => enemy.attacks.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;
    use dm_core::{DamageExpr, DamageType};

    fn wolf() -> EnemyStatBlock {
        EnemyStatBlock::new("Mire Wolf", 20, 13)
            .with_attack("bite", 4, DamageExpr::new(1, 6, 2), DamageType::Piercing)
            .with_morale(8, 0.3)
    }

    fn policy() -> CombatPolicy {
        CombatPolicy::default()
            .with_morale_flee_chance(35)
            .with_morale_defend_chance(35)
    }

    #[test]
    fn healthy_enemy_attacks() {
        let mut roller = ScriptedRoller::new([]);
        let action = choose_enemy_action(&wolf(), &policy(), &mut roller);
        assert_eq!(action, ActionKind::Attack);
    }

    #[test]
    fn broken_morale_low_roll_flees() {
        let mut enemy = wolf();
        enemy.apply_damage(15); // 5/20 = 25% <= 30% breakpoint
        let mut roller = ScriptedRoller::new([20]);
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Flee
        );
    }

    #[test]
    fn broken_morale_middle_roll_defends() {
        let mut enemy = wolf();
        enemy.apply_damage(15);
        let mut roller = ScriptedRoller::new([50]);
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Dodge
        );
    }

    #[test]
    fn broken_morale_high_roll_fights_on() {
        let mut enemy = wolf();
        enemy.apply_damage(15);
        let mut roller = ScriptedRoller::new([95]);
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Attack
        );
    }

    #[test]
    fn mindless_enemy_never_checks_morale() {
        let mut enemy = wolf().with_intelligence(IntelligenceTier::Mindless);
        enemy.apply_damage(19);
        // An empty script proves no morale die is consumed.
        let mut roller = ScriptedRoller::new([]);
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Attack
        );
    }

    #[test]
    fn defensive_enemy_dodges_when_wounded() {
        let mut enemy = wolf().with_tactics(Tactics::Defensive).with_morale(8, 0.1);
        enemy.apply_damage(11); // 45%, above breakpoint, below half
        let mut roller = ScriptedRoller::new([]);
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Dodge
        );
        // Already dodging: goes back on the offensive.
        enemy
            .conditions
            .push(dm_core::ActiveCondition::new(
                dm_core::ConditionKind::Dodging,
                "defensive stance",
            ));
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Attack
        );
    }

    #[test]
    fn enemy_without_attacks_dodges() {
        let enemy = EnemyStatBlock::new("Cowering Thrall", 10, 10);
        let mut roller = ScriptedRoller::new([]);
        assert_eq!(
            choose_enemy_action(&enemy, &policy(), &mut roller),
            ActionKind::Dodge
        );
    }

    #[test]
    fn tactical_enemy_selects_heaviest_attack() {
        let enemy = EnemyStatBlock::new("Bonewarden", 30, 14)
            .with_attack("jab", 3, DamageExpr::new(1, 4, 0), DamageType::Piercing)
            .with_attack("maul", 3, DamageExpr::new(2, 8, 1), DamageType::Bludgeoning)
            .with_intelligence(IntelligenceTier::Tactical);
        assert_eq!(select_attack(&enemy).unwrap().name, "maul");

        let dull = enemy.clone().with_intelligence(IntelligenceTier::Cunning);
        assert_eq!(select_attack(&dull).unwrap().name, "jab");
    }
}
