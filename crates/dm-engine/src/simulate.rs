//! Enemy turn simulation.
//!
//! After the player's action resolves, every enemy slot between the
//! player's turns acts in one batch, so the caller only ever waits on
//! the player.

use dm_core::{ActionRequest, ActionResult, CharacterSummary, CombatPhase, CombatState};

use crate::dice::DieRoller;
use crate::policy::CombatPolicy;
use crate::{ai, conditions, resolver, termination, turn};

/// Run enemy turns from the current turn pointer until the order comes
/// back around to a player-aligned combatant or the encounter ends.
///
/// Dead and fled enemies, and entries whose stat block is missing from
/// the roster, are skipped without acting. The loop gives up after one
/// full lap of consecutive skips rather than spin on an order with no
/// one able to act. Termination is evaluated after every enemy action,
/// so a killing blow against the player stops the batch mid-lap.
pub fn run_enemy_turns(
    state: &mut CombatState,
    player: &mut CharacterSummary,
    policy: &CombatPolicy,
    roller: &mut dyn DieRoller,
) -> Vec<ActionResult> {
    let mut results = Vec::new();
    let mut consecutive_skips = 0usize;

    loop {
        if state.has_ended() || state.initiative_order.is_empty() {
            break;
        }

        let Some(entry) = state.current_entry() else {
            break;
        };
        if entry.kind.is_player_aligned() {
            state.phase = CombatPhase::PlayerTurn;
            break;
        }

        let enemy_id = entry.entity_id;
        let enemy = state.enemy(enemy_id).cloned();
        let Some(enemy) = enemy.filter(|e| e.can_act()) else {
            consecutive_skips += 1;
            if consecutive_skips > state.initiative_order.len() {
                break;
            }
            turn::advance(state);
            continue;
        };
        consecutive_skips = 0;

        let action = ai::choose_enemy_action(&enemy, policy, roller);
        let target = ai::choose_target(&enemy, player);
        let enemy_name = enemy.name;
        let request = ActionRequest {
            kind: action,
            target: Some(target),
        };

        tracing::debug!(enemy = %enemy_name, action = %request.kind, "enemy turn");
        match resolver::resolve_action(state, player, enemy_id, &request, policy, roller) {
            Ok(result) => results.push(result),
            Err(error) => {
                // Data gaps never stall the batch; the enemy forfeits
                // the turn.
                tracing::debug!(enemy = %enemy_name, %error, "enemy turn skipped");
            }
        }

        if let Some(enemy) = state.enemy_mut(enemy_id) {
            conditions::tick_conditions(&mut enemy.conditions);
        }

        let verdict = termination::evaluate(state, player);
        termination::finalize(state, &verdict);
        if verdict.ended {
            break;
        }

        turn::advance(state);
    }

    results
}
