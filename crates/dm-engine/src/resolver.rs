//! Single-action resolution.
//!
//! One call resolves exactly one actor's turn-action (the player's
//! submitted action or one enemy's chosen action) into a state delta
//! and an immutable audit record. Validation failures return an error
//! before any state is touched.

use dm_core::{
    ActionKind, ActionRequest, ActionResult, ActiveCondition, AttackRoll, CharacterSummary,
    CombatOutcome, CombatPhase, CombatState, ConditionKind, DamageRoll, EntityId, HpDelta,
};

use crate::ai;
use crate::conditions::{action_prevented, apply_condition, attack_edge};
use crate::dice::{Die, DieRoller, roll_d20, roll_damage};
use crate::error::{EngineError, EngineResult};
use crate::policy::CombatPolicy;

/// Resolve one actor's action against the encounter state.
///
/// The actor is the player when `actor_id` matches the summary's id,
/// otherwise an enemy from the roster. The produced record is appended
/// to the encounter log and returned.
pub fn resolve_action(
    state: &mut CombatState,
    player: &mut CharacterSummary,
    actor_id: EntityId,
    request: &ActionRequest,
    policy: &CombatPolicy,
    roller: &mut dyn DieRoller,
) -> EngineResult<ActionResult> {
    let acting_player = actor_id == player.id;
    if !acting_player && state.enemy(actor_id).is_none() {
        return Err(EngineError::UnknownActor(actor_id));
    }

    let actor_name = if acting_player {
        player.name.clone()
    } else {
        // Checked above.
        state
            .enemy(actor_id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    };

    let actor_conditions: Vec<ActiveCondition> = if acting_player {
        state.player_conditions.clone()
    } else {
        state
            .enemy(actor_id)
            .map(|e| e.conditions.clone())
            .unwrap_or_default()
    };

    if action_prevented(&actor_conditions) {
        let result = ActionResult::narrative(
            actor_id,
            actor_name.clone(),
            request.kind.clone(),
            format!("{actor_name} is stunned and cannot act."),
        );
        state.log.push(result.clone());
        return Ok(result);
    }

    tracing::debug!(actor = %actor_name, action = %request.kind, "resolving action");

    let result = match &request.kind {
        ActionKind::Attack => {
            resolve_attack(state, player, actor_id, &actor_name, request, roller)?
        }
        ActionKind::Dodge => resolve_stance(
            state,
            acting_player,
            actor_id,
            &actor_name,
            ConditionKind::Dodging,
            ActionKind::Dodge,
            format!("{actor_name} takes a defensive stance, ready to dodge."),
        ),
        ActionKind::Dash => resolve_stance(
            state,
            acting_player,
            actor_id,
            &actor_name,
            ConditionKind::Dashing,
            ActionKind::Dash,
            format!("{actor_name} dashes, covering ground at double pace."),
        ),
        ActionKind::Disengage => resolve_stance(
            state,
            acting_player,
            actor_id,
            &actor_name,
            ConditionKind::Disengaging,
            ActionKind::Disengage,
            format!("{actor_name} disengages, withdrawing without opening a guard."),
        ),
        ActionKind::Hide => resolve_hide(
            state,
            player,
            acting_player,
            actor_id,
            &actor_name,
            policy,
            roller,
        ),
        ActionKind::Flee => resolve_flee(state, acting_player, actor_id, &actor_name),
        ActionKind::Other(name) => ActionResult::narrative(
            actor_id,
            actor_name.clone(),
            ActionKind::Other(name.clone()),
            format!("{actor_name} attempts to {name}, to no mechanical effect."),
        ),
    };

    state.log.push(result.clone());
    Ok(result)
}

/// Attack resolution: d20 + modifier vs armor class, natural 20 always a
/// critical hit, natural 1 always a miss, damage dice doubled on a
/// critical, HP clamped to `[0, max]`.
fn resolve_attack(
    state: &mut CombatState,
    player: &mut CharacterSummary,
    actor_id: EntityId,
    actor_name: &str,
    request: &ActionRequest,
    roller: &mut dyn DieRoller,
) -> EngineResult<ActionResult> {
    let acting_player = actor_id == player.id;
    if acting_player {
        let target_id = request
            .target
            .ok_or_else(|| EngineError::TargetRequired(ActionKind::Attack.to_string()))?;
        let target = state
            .enemy(target_id)
            .ok_or(EngineError::TargetNotFound(target_id))?;
        if !target.can_be_targeted() {
            return Err(EngineError::TargetUnavailable(target.name.clone()));
        }

        let edge = attack_edge(&state.player_conditions, &target.conditions);
        let attack = roll_attack(
            roller,
            edge,
            player.attack_modifier,
            target.armor_class,
        );

        let target_name = target.name.clone();
        let mut damage = None;
        let mut hp_deltas = Vec::new();
        let narration;

        if attack.hit {
            let raw = roll_damage(roller, &player.damage, attack.is_critical);
            // Reborrow mutably now that rolling is done.
            let target = state
                .enemy_mut(target_id)
                .ok_or(EngineError::TargetNotFound(target_id))?;
            let adjusted = target.adjust_damage(raw, player.damage_type);
            let lost = target.apply_damage(adjusted);
            let remaining = target.hp;
            let felled = !target.is_alive;
            damage = Some(DamageRoll {
                total: adjusted,
                damage_type: player.damage_type,
                is_critical: attack.is_critical,
            });
            hp_deltas.push(HpDelta {
                entity_id: target_id,
                name: target_name.clone(),
                delta: -lost,
                remaining,
            });
            narration = attack_narration(
                actor_name,
                &target_name,
                &player.attack_name,
                &attack,
                adjusted,
                &player.damage_type.to_string(),
                felled,
            );
        } else {
            narration = miss_narration(actor_name, &target_name, &attack);
        }

        // Striking from hiding reveals the attacker.
        state
            .player_conditions
            .retain(|c| c.kind != ConditionKind::Hidden);

        Ok(ActionResult {
            actor_id,
            actor_name: actor_name.to_string(),
            target_id: Some(target_id),
            target_name: Some(target_name),
            action: ActionKind::Attack,
            attack: Some(attack),
            damage,
            narration,
            condition_applied: None,
            hp_deltas,
        })
    } else {
        // Enemy attacking the player.
        let enemy = state
            .enemy(actor_id)
            .ok_or(EngineError::UnknownActor(actor_id))?;
        let spec = ai::select_attack(enemy)
            .ok_or_else(|| EngineError::NoAttackAvailable(enemy.name.clone()))?
            .clone();
        let edge = attack_edge(&enemy.conditions, &state.player_conditions);
        let attack = roll_attack(roller, edge, spec.attack_modifier, player.armor_class);

        let mut damage = None;
        let mut hp_deltas = Vec::new();
        let narration;

        if attack.hit {
            let raw = roll_damage(roller, &spec.damage, attack.is_critical);
            let lost = player.apply_damage(raw);
            damage = Some(DamageRoll {
                total: raw,
                damage_type: spec.damage_type,
                is_critical: attack.is_critical,
            });
            hp_deltas.push(HpDelta {
                entity_id: player.id,
                name: player.name.clone(),
                delta: -lost,
                remaining: player.hp,
            });
            narration = attack_narration(
                actor_name,
                &player.name,
                &spec.name,
                &attack,
                raw,
                &spec.damage_type.to_string(),
                player.is_down(),
            );
        } else {
            narration = miss_narration(actor_name, &player.name, &attack);
        }

        // Attacking from hiding reveals the enemy too.
        if let Some(enemy) = state.enemy_mut(actor_id) {
            enemy.conditions.retain(|c| c.kind != ConditionKind::Hidden);
        }

        Ok(ActionResult {
            actor_id,
            actor_name: actor_name.to_string(),
            target_id: Some(player.id),
            target_name: Some(player.name.clone()),
            action: ActionKind::Attack,
            attack: Some(attack),
            damage,
            narration,
            condition_applied: None,
            hp_deltas,
        })
    }
}

/// Roll the d20 side of an attack and decide hit, critical, and
/// critical failure.
fn roll_attack(
    roller: &mut dyn DieRoller,
    edge: crate::dice::Edge,
    modifier: i32,
    target_ac: i32,
) -> AttackRoll {
    let die = roll_d20(roller, edge);
    let total = die as i32 + modifier;
    let is_critical = die == 20;
    let is_critical_fail = die == 1;
    let hit = is_critical || (!is_critical_fail && total >= target_ac);
    AttackRoll {
        die,
        modifier,
        total,
        target_ac,
        hit,
        is_critical,
        is_critical_fail,
    }
}

/// Dodge, dash, and disengage: a single-turn condition on the actor.
fn resolve_stance(
    state: &mut CombatState,
    acting_player: bool,
    actor_id: EntityId,
    actor_name: &str,
    kind: ConditionKind,
    action: ActionKind,
    narration: String,
) -> ActionResult {
    let condition = ActiveCondition::new(kind, format!("{action} action"));
    if acting_player {
        apply_condition(&mut state.player_conditions, condition);
    } else if let Some(enemy) = state.enemy_mut(actor_id) {
        apply_condition(&mut enemy.conditions, condition);
    }

    let mut result = ActionResult::narrative(actor_id, actor_name, action, narration);
    result.condition_applied = Some(kind);
    result
}

/// Hide: a stealth check against the policy's perception DC. Success
/// attaches the hidden condition, recording the roll as its save DC.
fn resolve_hide(
    state: &mut CombatState,
    player: &CharacterSummary,
    acting_player: bool,
    actor_id: EntityId,
    actor_name: &str,
    policy: &CombatPolicy,
    roller: &mut dyn DieRoller,
) -> ActionResult {
    let modifier = if acting_player {
        player.stealth_modifier
    } else {
        state
            .enemy(actor_id)
            .map(|e| e.initiative_modifier)
            .unwrap_or(0)
    };
    let die = roller.roll(Die::D20) as i32;
    let total = die + modifier;

    if total >= policy.perception_dc {
        let condition = ActiveCondition::new(ConditionKind::Hidden, "hide action")
            .with_duration(policy.hidden_duration)
            .with_save_dc(total);
        if acting_player {
            apply_condition(&mut state.player_conditions, condition);
        } else if let Some(enemy) = state.enemy_mut(actor_id) {
            apply_condition(&mut enemy.conditions, condition);
        }
        let mut result = ActionResult::narrative(
            actor_id,
            actor_name,
            ActionKind::Hide,
            format!(
                "{actor_name} slips out of sight (stealth {total} vs DC {}).",
                policy.perception_dc
            ),
        );
        result.condition_applied = Some(ConditionKind::Hidden);
        result
    } else {
        ActionResult::narrative(
            actor_id,
            actor_name,
            ActionKind::Hide,
            format!(
                "{actor_name} fails to find cover (stealth {total} vs DC {}).",
                policy.perception_dc
            ),
        )
    }
}

/// Flee: the player ends the encounter outright; an enemy routs and
/// leaves the fight, yielding no reward.
fn resolve_flee(
    state: &mut CombatState,
    acting_player: bool,
    actor_id: EntityId,
    actor_name: &str,
) -> ActionResult {
    if acting_player {
        state.phase = CombatPhase::CombatEnd;
        state.outcome = Some(CombatOutcome::Fled);
        ActionResult::narrative(
            actor_id,
            actor_name,
            ActionKind::Flee,
            format!("{actor_name} breaks away and flees the battle."),
        )
    } else {
        if let Some(enemy) = state.enemy_mut(actor_id) {
            enemy.has_fled = true;
        }
        ActionResult::narrative(
            actor_id,
            actor_name,
            ActionKind::Flee,
            format!("{actor_name}'s nerve breaks; it turns and flees!"),
        )
    }
}

fn attack_narration(
    actor: &str,
    target: &str,
    weapon: &str,
    attack: &AttackRoll,
    damage: i32,
    damage_type: &str,
    felled: bool,
) -> String {
    let mut text = if attack.is_critical {
        format!(
            "{actor} lands a critical hit on {target} with {weapon} for {damage} {damage_type} damage."
        )
    } else if damage == 0 {
        format!(
            "{actor} hits {target} with {weapon}, but the blow has no effect ({} vs AC {}).",
            attack.total, attack.target_ac
        )
    } else {
        format!(
            "{actor} hits {target} with {weapon} for {damage} {damage_type} damage ({} vs AC {}).",
            attack.total, attack.target_ac
        )
    };
    if felled {
        text.push_str(&format!(" {target} falls!"));
    }
    text
}

fn miss_narration(actor: &str, target: &str, attack: &AttackRoll) -> String {
    if attack.is_critical_fail {
        format!("{actor}'s attack on {target} goes wide, a natural 1.")
    } else {
        format!(
            "{actor} misses {target} ({} vs AC {}).",
            attack.total, attack.target_ac
        )
    }
}
