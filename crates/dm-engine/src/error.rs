//! Error types for the combat engine.

use dm_core::EntityId;

/// Errors that reject a request before any state is mutated.
///
/// These are the validation failures of the call contract; the transport
/// layer wrapping the engine decides how to surface them. Data gaps
/// inside the enemy-turn loop are not errors; the loop skips them to
/// keep making forward progress.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An action was submitted against an already-ended encounter.
    #[error("combat has already ended")]
    CombatEnded,

    /// The encounter has not been started, or it is not the player's
    /// turn to act.
    #[error("not awaiting a player action (phase: {0})")]
    NotPlayerTurn(String),

    /// The requested action needs a target and none was given.
    #[error("action '{0}' requires a target")]
    TargetRequired(String),

    /// The requested target does not exist in this encounter.
    #[error("target not found: {0}")]
    TargetNotFound(EntityId),

    /// The requested target is dead or has already left the fight.
    #[error("target '{0}' is already out of the fight")]
    TargetUnavailable(String),

    /// The acting combatant is neither the player nor a known enemy.
    #[error("unknown actor: {0}")]
    UnknownActor(EntityId),

    /// An enemy actor has no attack to strike with.
    #[error("'{0}' has no usable attack")]
    NoAttackAvailable(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
