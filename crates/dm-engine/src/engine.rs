//! The engine facade: one call per player action.
//!
//! The caller round-trips the `CombatState` snapshot between requests;
//! the engine never holds encounter state of its own. Each call clones
//! the submitted snapshot, runs the player's action plus every enemy
//! turn until control comes back to the player, and returns the new
//! snapshot alongside the audit trail of what happened.

use dm_core::{
    ActionKind, ActionRequest, ActionResult, CharacterSummary, CombatOutcome, CombatPhase,
    CombatState, Companion, CombatantKind, ConditionKind, EnemyStatBlock, Environment, Rewards,
};

use crate::conditions::{self, has_condition};
use crate::dice::DieRoller;
use crate::error::{EngineError, EngineResult};
use crate::policy::CombatPolicy;
use crate::{initiative, resolver, simulate, termination, turn};

/// Everything one engine call produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The new authoritative snapshot to round-trip.
    pub state: CombatState,
    /// The player summary after damage taken this call.
    pub player: CharacterSummary,
    /// Every action resolved during this call, player's first.
    pub results: Vec<ActionResult>,
    /// True when the encounter ended during this call (or earlier).
    pub ended: bool,
    /// Final outcome, present once ended.
    pub outcome: Option<CombatOutcome>,
    /// Spoils, present on victory.
    pub rewards: Option<Rewards>,
}

/// Stateless combat engine, parameterized only by policy.
#[derive(Debug, Clone, Default)]
pub struct CombatEngine {
    policy: CombatPolicy,
}

impl CombatEngine {
    /// Engine with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom policy.
    pub fn with_policy(policy: CombatPolicy) -> Self {
        Self { policy }
    }

    /// The policy this engine resolves under.
    pub fn policy(&self) -> &CombatPolicy {
        &self.policy
    }

    /// Build a fresh encounter: roll initiative once, hand the first
    /// turn to the player, and compute the legal action set.
    pub fn start_encounter(
        &self,
        player: &CharacterSummary,
        companions: &[Companion],
        enemies: Vec<EnemyStatBlock>,
        environment: Environment,
        roller: &mut dyn DieRoller,
    ) -> CombatState {
        let order = initiative::roll_initiative(player, companions, &enemies, roller);
        let mut state = CombatState::new(order, enemies, environment);
        state.phase = CombatPhase::PlayerTurn;
        // Control starts with the player regardless of where initiative
        // seats them; the enemies between their slot and the player's
        // get their turns after the player's first action.
        state.turn_index = state
            .initiative_order
            .iter()
            .position(|e| e.kind == CombatantKind::Player)
            .unwrap_or(0);
        state.available_actions = self.available_actions(&state);
        tracing::debug!(
            enemies = state.enemies.len(),
            order = state.initiative_order.len(),
            "encounter started"
        );
        state
    }

    /// Run one full request: the player's action, their end-of-turn
    /// condition tick, then every enemy turn until control returns to
    /// the player or the encounter ends.
    ///
    /// The submitted snapshot and player summary are never mutated; on
    /// success the returned [`TurnOutcome`] carries their replacements,
    /// and on a validation error the caller's copies still hold.
    pub fn resolve_turn(
        &self,
        state: &CombatState,
        player: &CharacterSummary,
        request: &ActionRequest,
        roller: &mut dyn DieRoller,
    ) -> EngineResult<TurnOutcome> {
        if state.has_ended() {
            return Err(EngineError::CombatEnded);
        }
        if state.phase != CombatPhase::PlayerTurn {
            return Err(EngineError::NotPlayerTurn(state.phase.to_string()));
        }

        let mut state = state.clone();
        let mut player = player.clone();
        let actor_id = player.id;
        let mut results = Vec::new();

        let result = resolver::resolve_action(
            &mut state,
            &mut player,
            actor_id,
            request,
            &self.policy,
            roller,
        )?;
        results.push(result);

        conditions::tick_conditions(&mut state.player_conditions);

        let verdict = termination::evaluate(&state, &player);
        termination::finalize(&mut state, &verdict);
        if !state.has_ended() {
            turn::advance(&mut state);
            state.phase = CombatPhase::EnemyTurn;
            results.extend(simulate::run_enemy_turns(
                &mut state,
                &mut player,
                &self.policy,
                roller,
            ));
        }

        state.available_actions = self.available_actions(&state);

        Ok(TurnOutcome {
            ended: state.has_ended(),
            outcome: state.outcome,
            rewards: state.rewards.clone(),
            state,
            player,
            results,
        })
    }

    /// The legal actions for the upcoming player turn. Derived every
    /// call; the caller's copy is never trusted.
    fn available_actions(&self, state: &CombatState) -> Vec<ActionKind> {
        if state.has_ended() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if state.opposition_remains() {
            actions.push(ActionKind::Attack);
        }
        actions.push(ActionKind::Dodge);
        actions.push(ActionKind::Dash);
        actions.push(ActionKind::Disengage);
        if !has_condition(&state.player_conditions, ConditionKind::Hidden) {
            actions.push(ActionKind::Hide);
        }
        actions.push(ActionKind::Flee);
        actions
    }
}
