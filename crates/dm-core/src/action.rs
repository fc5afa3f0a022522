//! Action requests and the audit records produced when they resolve.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::ConditionKind;
use crate::enemy::DamageType;
use crate::entity::EntityId;

/// The closed set of actions the resolver understands. Anything else
/// arrives as `Other` and resolves to narration with no mechanical
/// effect, so unmodeled actions never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Strike a live target.
    Attack,
    /// Focus on defense until the next turn.
    Dodge,
    /// Move at double pace this turn.
    Dash,
    /// Withdraw without provoking opportunity attacks.
    Disengage,
    /// Attempt to become hidden.
    Hide,
    /// Abandon the fight, ending the encounter.
    Flee,
    /// An action with no modeled mechanics; resolved as narration only.
    Other(String),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Dodge => write!(f, "dodge"),
            Self::Dash => write!(f, "dash"),
            Self::Disengage => write!(f, "disengage"),
            Self::Hide => write!(f, "hide"),
            Self::Flee => write!(f, "flee"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// One requested action: what to do and, where relevant, to whom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// The action to take.
    pub kind: ActionKind,
    /// Target combatant, required for attacks.
    pub target: Option<EntityId>,
}

impl ActionRequest {
    /// An attack against the given target.
    pub fn attack(target: EntityId) -> Self {
        Self {
            kind: ActionKind::Attack,
            target: Some(target),
        }
    }

    /// An untargeted action.
    pub fn simple(kind: ActionKind) -> Self {
        Self { kind, target: None }
    }
}

/// The d20 side of a resolved attack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttackRoll {
    /// The natural die value (after advantage/disadvantage selection).
    pub die: u32,
    /// The attacker's modifier.
    pub modifier: i32,
    /// Die plus modifier.
    pub total: i32,
    /// The armor class rolled against.
    pub target_ac: i32,
    /// Whether the attack hit.
    pub hit: bool,
    /// Natural 20: always hits, damage dice doubled.
    pub is_critical: bool,
    /// Natural 1: always misses.
    pub is_critical_fail: bool,
}

/// The damage side of a resolved attack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Final damage after critical doubling and defense scaling.
    pub total: i32,
    /// The damage type dealt.
    pub damage_type: DamageType,
    /// Whether the dice were doubled for a critical hit.
    pub is_critical: bool,
}

/// One combatant's hit-point change from a resolved action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HpDelta {
    /// Whose hit points changed.
    pub entity_id: EntityId,
    /// Their display name, for narration layers.
    pub name: String,
    /// The change (negative for damage).
    pub delta: i32,
    /// Hit points remaining afterwards.
    pub remaining: i32,
}

/// The immutable audit record of one resolved action. Accumulated into
/// the encounter log; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// Who acted.
    pub actor_id: EntityId,
    /// The actor's display name.
    pub actor_name: String,
    /// Who was targeted, if anyone.
    pub target_id: Option<EntityId>,
    /// The target's display name, if anyone.
    pub target_name: Option<String>,
    /// The action taken.
    pub action: ActionKind,
    /// The attack roll, when the action involved one.
    pub attack: Option<AttackRoll>,
    /// The damage roll, when the attack hit.
    pub damage: Option<DamageRoll>,
    /// Terse mechanical narration, handed to the external narrator.
    pub narration: String,
    /// Condition applied by this action, if any.
    pub condition_applied: Option<ConditionKind>,
    /// Hit-point changes caused by this action.
    pub hp_deltas: Vec<HpDelta>,
}

impl ActionResult {
    /// A narration-only record with no rolls, conditions, or deltas.
    pub fn narrative(
        actor_id: EntityId,
        actor_name: impl Into<String>,
        action: ActionKind,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            actor_id,
            actor_name: actor_name.into(),
            target_id: None,
            target_name: None,
            action,
            attack: None,
            damage: None,
            narration: narration.into(),
            condition_applied: None,
            hp_deltas: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_display() {
        assert_eq!(ActionKind::Attack.to_string(), "attack");
        assert_eq!(ActionKind::Flee.to_string(), "flee");
        assert_eq!(ActionKind::Other("taunt".to_string()).to_string(), "taunt");
    }

    #[test]
    fn request_constructors() {
        let id = EntityId::new();
        let atk = ActionRequest::attack(id);
        assert_eq!(atk.kind, ActionKind::Attack);
        assert_eq!(atk.target, Some(id));

        let dodge = ActionRequest::simple(ActionKind::Dodge);
        assert!(dodge.target.is_none());
    }

    #[test]
    fn narrative_result_is_empty_of_mechanics() {
        let r = ActionResult::narrative(
            EntityId::new(),
            "Kael",
            ActionKind::Other("taunt".to_string()),
            "Kael hurls an insult.",
        );
        assert!(r.attack.is_none());
        assert!(r.damage.is_none());
        assert!(r.hp_deltas.is_empty());
        assert!(r.condition_applied.is_none());
    }

    #[test]
    fn action_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActionKind::Disengage).unwrap(),
            "\"disengage\""
        );
        let other: ActionKind = serde_json::from_str("{\"other\":\"parley\"}").unwrap();
        assert_eq!(other, ActionKind::Other("parley".to_string()));
    }
}
