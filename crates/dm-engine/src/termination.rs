//! Encounter termination and rewards.

use dm_core::{CharacterSummary, CombatOutcome, CombatPhase, CombatState, Rewards};

/// The verdict of a termination check.
#[derive(Debug, Clone, PartialEq)]
pub struct Termination {
    /// Whether the encounter is over.
    pub ended: bool,
    /// How it ended, when it did.
    pub outcome: Option<CombatOutcome>,
    /// Spoils, when the outcome is a victory.
    pub rewards: Option<Rewards>,
}

impl Termination {
    fn ongoing() -> Self {
        Self {
            ended: false,
            outcome: None,
            rewards: None,
        }
    }
}

/// Decide whether the encounter has ended, without mutating anything.
///
/// Check order, first match wins: the player has fallen (defeat), no
/// enemy remains standing (victory, with rewards), otherwise ongoing.
/// A player flee is applied upstream by the resolver, so an ended state
/// reaches this function with its outcome already recorded; calling
/// again on such a state returns the stored verdict unchanged.
pub fn evaluate(state: &CombatState, player: &CharacterSummary) -> Termination {
    if state.has_ended() {
        return Termination {
            ended: true,
            outcome: state.outcome,
            rewards: state.rewards.clone(),
        };
    }

    if player.is_down() {
        return Termination {
            ended: true,
            outcome: Some(CombatOutcome::Defeat),
            rewards: None,
        };
    }

    if !state.opposition_remains() {
        return Termination {
            ended: true,
            outcome: Some(CombatOutcome::Victory),
            rewards: Some(victory_rewards(state)),
        };
    }

    Termination::ongoing()
}

/// Apply a termination verdict to the state, setting phase, outcome,
/// and rewards exactly once. A no-op for ongoing verdicts and for
/// states that already ended.
pub fn finalize(state: &mut CombatState, termination: &Termination) {
    if !termination.ended || state.has_ended() {
        return;
    }
    tracing::debug!(outcome = ?termination.outcome, "combat ended");
    state.phase = CombatPhase::CombatEnd;
    state.outcome = termination.outcome;
    state.rewards = termination.rewards.clone();
}

/// XP and gold summed over defeated enemies. Routed enemies escape with
/// their lives and their purses.
fn victory_rewards(state: &CombatState) -> Rewards {
    let defeated: Vec<&dm_core::EnemyStatBlock> =
        state.enemies.iter().filter(|e| !e.is_alive).collect();
    let xp = defeated.iter().map(|e| e.xp_value).sum();
    let gold = defeated.iter().map(|e| e.gold_drop).sum();
    let summary = if defeated.is_empty() {
        "the opposition scattered".to_string()
    } else {
        let names: Vec<&str> = defeated.iter().map(|e| e.name.as_str()).collect();
        format!("defeated {}", names.join(", "))
    };
    Rewards { xp, gold, summary }
}
