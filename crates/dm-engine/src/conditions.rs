//! Condition bookkeeping: turn-boundary ticking and stacking-aware
//! application.

use dm_core::{ActiveCondition, ConditionKind, Stacking};

use crate::dice::Edge;

/// Tick a combatant's conditions at the end of their own turn.
///
/// Finite durations are decremented by one and conditions reaching zero
/// are removed; indefinite conditions persist. A condition applied
/// during the turn that is ending (`fresh`) skips this first decrement,
/// so a one-turn stance taken on your turn still covers the opposing
/// lap that follows. Returns the conditions that expired.
pub fn tick_conditions(conditions: &mut Vec<ActiveCondition>) -> Vec<ActiveCondition> {
    for condition in conditions.iter_mut() {
        if condition.fresh {
            condition.fresh = false;
            continue;
        }
        if let Some(turns) = condition.remaining.as_mut() {
            *turns = turns.saturating_sub(1);
        }
    }

    let mut expired = Vec::new();
    conditions.retain(|c| {
        if c.remaining == Some(0) {
            expired.push(c.clone());
            false
        } else {
            true
        }
    });
    expired
}

/// Attach a condition, honoring its kind's stacking rule: refreshing
/// kinds extend the existing instance (keeping the longer remaining
/// duration and the newer source and save DC); stacking kinds coexist.
pub fn apply_condition(conditions: &mut Vec<ActiveCondition>, new: ActiveCondition) {
    if new.kind.stacking() == Stacking::Refresh {
        if let Some(existing) = conditions.iter_mut().find(|c| c.kind == new.kind) {
            existing.remaining = match (existing.remaining, new.remaining) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            };
            existing.source = new.source;
            existing.save_dc = new.save_dc.or(existing.save_dc);
            existing.fresh = new.fresh;
            return;
        }
    }
    conditions.push(new);
}

/// True if any condition of the given kind is present.
pub fn has_condition(conditions: &[ActiveCondition], kind: ConditionKind) -> bool {
    conditions.iter().any(|c| c.kind == kind)
}

/// The edge of an attack roll, combining what the attacker's conditions
/// grant with what the target's conditions impose.
pub fn attack_edge(attacker: &[ActiveCondition], target: &[ActiveCondition]) -> Edge {
    let advantage = attacker.iter().any(|c| c.kind.advantage_on_attacks())
        || target.iter().any(|c| c.kind.advantage_to_attackers());
    let disadvantage = attacker.iter().any(|c| c.kind.disadvantage_on_attacks())
        || target.iter().any(|c| c.kind.disadvantage_to_attackers());
    Edge::combine(advantage, disadvantage)
}

/// True if any condition on the bearer prevents them from acting.
pub fn action_prevented(conditions: &[ActiveCondition]) -> bool {
    conditions.iter().any(|c| c.kind.prevents_action())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aged(kind: ConditionKind, turns: u32) -> ActiveCondition {
        let mut c = ActiveCondition::new(kind, "test").with_duration(turns);
        c.fresh = false;
        c
    }

    #[test]
    fn fresh_condition_survives_its_first_tick() {
        let mut conditions = vec![ActiveCondition::new(ConditionKind::Dodging, "dodge action")];
        let expired = tick_conditions(&mut conditions);
        assert!(expired.is_empty());
        assert_eq!(conditions.len(), 1);
        assert!(!conditions[0].fresh);

        // Second boundary: duration 1 -> 0, removed.
        let expired = tick_conditions(&mut conditions);
        assert_eq!(expired.len(), 1);
        assert!(conditions.is_empty());
    }

    #[test]
    fn finite_condition_expires_after_exactly_its_duration() {
        let mut conditions = vec![aged(ConditionKind::Poisoned, 3)];
        for _ in 0..2 {
            assert!(tick_conditions(&mut conditions).is_empty());
        }
        let expired = tick_conditions(&mut conditions);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, ConditionKind::Poisoned);
        assert!(conditions.is_empty());
    }

    #[test]
    fn indefinite_condition_persists() {
        let mut conditions = vec![ActiveCondition::new(ConditionKind::Prone, "trip")];
        for _ in 0..10 {
            assert!(tick_conditions(&mut conditions).is_empty());
        }
        assert_eq!(conditions.len(), 1);
    }

    #[test]
    fn refresh_extends_instead_of_duplicating() {
        let mut conditions = vec![aged(ConditionKind::Dodging, 1)];
        apply_condition(
            &mut conditions,
            ActiveCondition::new(ConditionKind::Dodging, "dodge again"),
        );
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].remaining, Some(1));
        assert_eq!(conditions[0].source, "dodge again");
        assert!(conditions[0].fresh);
    }

    #[test]
    fn poison_doses_stack() {
        let mut conditions = vec![aged(ConditionKind::Poisoned, 2)];
        apply_condition(
            &mut conditions,
            ActiveCondition::new(ConditionKind::Poisoned, "second dose"),
        );
        assert_eq!(conditions.len(), 2);
    }

    #[test]
    fn edge_from_conditions() {
        let hidden = vec![aged(ConditionKind::Hidden, 1)];
        let dodging = vec![aged(ConditionKind::Dodging, 1)];
        let none: Vec<ActiveCondition> = Vec::new();

        // Hidden attacker: advantage.
        assert_eq!(attack_edge(&hidden, &none), Edge::Advantage);
        // Dodging target: disadvantage.
        assert_eq!(attack_edge(&none, &dodging), Edge::Disadvantage);
        // Hidden attacker against dodging target: cancels out.
        assert_eq!(attack_edge(&hidden, &dodging), Edge::Flat);
        // Attacking a hidden target: disadvantage.
        assert_eq!(attack_edge(&none, &hidden), Edge::Disadvantage);
    }

    #[test]
    fn stunned_blocks_action() {
        let stunned = vec![aged(ConditionKind::Stunned, 1)];
        assert!(action_prevented(&stunned));
        assert!(!action_prevented(&[]));
    }
}
