//! Combat data model for Duskmere, a turn-based tabletop-style RPG.
//!
//! Everything here is plain serializable data: the encounter snapshot
//! (`CombatState`), the combatants in it, their conditions, and the audit
//! records produced when actions resolve. The mechanics that mutate these
//! types live in `dm-engine`; callers round-trip `CombatState` between
//! requests, so every type serializes cleanly.

/// Action requests and resolved-action audit records.
pub mod action;
/// Timed status conditions and their per-kind behavior.
pub mod condition;
/// Combatant identity: ids, kinds, initiative entries, the player summary.
pub mod entity;
/// Enemy stat blocks, attacks, damage expressions and types.
pub mod enemy;
/// The encounter snapshot and its phases, outcome, and rewards.
pub mod state;

/// Re-export action types.
pub use action::{ActionKind, ActionRequest, ActionResult, AttackRoll, DamageRoll, HpDelta};
/// Re-export condition types.
pub use condition::{ActiveCondition, ConditionKind, Stacking};
/// Re-export combatant identity types.
pub use entity::{CharacterSummary, CombatantKind, Companion, EntityId, InitiativeEntry};
/// Re-export enemy stat-block types.
pub use enemy::{
    AttackSpec, DamageExpr, DamageScale, DamageType, EnemyStatBlock, IntelligenceTier, Tactics,
};
/// Re-export encounter state types.
pub use state::{CombatOutcome, CombatPhase, CombatState, Environment, Rewards};
