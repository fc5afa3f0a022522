//! Combat-resolution engine for Duskmere: dice, initiative, action
//! resolution, enemy turns, and termination.
//!
//! The engine is a pure function of (prior state, action, die rolls) to
//! (new state, results). It holds no encounter state of its own; the
//! caller round-trips the [`dm_core::CombatState`] snapshot between
//! calls, and all randomness flows through the [`dice::DieRoller`]
//! trait so outcomes replay exactly under a scripted die sequence.

/// Enemy decision policy: action, target, and attack selection.
pub mod ai;
/// Condition ticking, stacking, and attack-edge derivation.
pub mod conditions;
/// Dice, advantage/disadvantage, and the injectable roller.
pub mod dice;
/// The engine facade and per-call outcome.
pub mod engine;
/// Error types used throughout the crate.
pub mod error;
/// Initiative rolling at encounter creation.
pub mod initiative;
/// Tunable combat policy knobs.
pub mod policy;
/// Single-action resolution.
pub mod resolver;
/// The enemy turn batch between player turns.
pub mod simulate;
/// Encounter termination and rewards.
pub mod termination;
/// Turn pointer advancement.
pub mod turn;

/// Re-export the engine facade.
pub use engine::{CombatEngine, TurnOutcome};
/// Re-export error types.
pub use error::{EngineError, EngineResult};
/// Re-export dice primitives.
pub use dice::{Die, DieRoller, Edge, ScriptedRoller, SeededRoller};
/// Re-export the policy knobs.
pub use policy::CombatPolicy;
