//! The encounter snapshot: the single source of truth the caller
//! round-trips between requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, ActionResult};
use crate::condition::ActiveCondition;
use crate::enemy::EnemyStatBlock;
use crate::entity::{EntityId, InitiativeEntry};

/// Where the encounter stands. `CombatEnd` is terminal: no further
/// mutation is accepted once it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    /// Encounter created but not yet started.
    Idle,
    /// Waiting for the player's action.
    PlayerTurn,
    /// Enemy turns are being simulated.
    EnemyTurn,
    /// The encounter is over; `outcome` and `rewards` are final.
    CombatEnd,
}

impl CombatPhase {
    /// True once the encounter has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CombatEnd)
    }
}

impl fmt::Display for CombatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PlayerTurn => write!(f, "player turn"),
            Self::EnemyTurn => write!(f, "enemy turn"),
            Self::CombatEnd => write!(f, "combat end"),
        }
    }
}

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    /// Every enemy was defeated or routed.
    Victory,
    /// The player fell.
    Defeat,
    /// The player abandoned the fight.
    Fled,
    /// The fight ended through talk rather than steel. Never produced by
    /// the core actions; the variant keeps the serialized form stable for
    /// callers that end encounters diplomatically.
    Negotiated,
}

impl fmt::Display for CombatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory => write!(f, "victory"),
            Self::Defeat => write!(f, "defeat"),
            Self::Fled => write!(f, "fled"),
            Self::Negotiated => write!(f, "negotiated"),
        }
    }
}

/// Spoils granted on victory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    /// Sum of the defeated enemies' XP values.
    pub xp: u32,
    /// Sum of the defeated enemies' gold drops.
    pub gold: u32,
    /// Short outcome descriptor handed to the external narrator.
    pub summary: String,
}

/// Descriptive battlefield modifiers. Read by the resolver and decision
/// policy, never mutated by them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    /// Terrain features ("waist-deep mire", "loose scree").
    pub terrain_effects: Vec<String>,
    /// Active hazards ("burning pews", "collapsing ceiling").
    pub hazards: Vec<String>,
    /// Lighting descriptor ("torchlit", "pitch dark").
    pub lighting: String,
}

/// The full authoritative state of one encounter.
///
/// The engine treats this as an immutable value: each request clones the
/// caller's snapshot and returns a new one, so two states never alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    /// Where the encounter stands.
    pub phase: CombatPhase,
    /// Current round, starting at 1 and incremented once per full lap of
    /// the initiative order.
    pub round: u32,
    /// Index into `initiative_order` of the combatant whose turn it is.
    pub turn_index: usize,
    /// Turn order, fixed for the life of the encounter.
    pub initiative_order: Vec<InitiativeEntry>,
    /// Enemy stat blocks, looked up by id.
    pub enemies: Vec<EnemyStatBlock>,
    /// Conditions currently affecting the player.
    pub player_conditions: Vec<ActiveCondition>,
    /// Battlefield descriptors.
    pub environment: Environment,
    /// Legal actions for the upcoming player turn. Derived: recomputed by
    /// the engine every request, never trusted from the caller.
    pub available_actions: Vec<ActionKind>,
    /// Every action resolved this encounter, in order.
    pub log: Vec<ActionResult>,
    /// Final outcome, set exactly once when `phase` becomes `CombatEnd`.
    pub outcome: Option<CombatOutcome>,
    /// Spoils, set alongside a `Victory` outcome.
    pub rewards: Option<Rewards>,
}

impl CombatState {
    /// Create an idle encounter around a fixed initiative order and
    /// enemy roster.
    pub fn new(
        initiative_order: Vec<InitiativeEntry>,
        enemies: Vec<EnemyStatBlock>,
        environment: Environment,
    ) -> Self {
        Self {
            phase: CombatPhase::Idle,
            round: 1,
            turn_index: 0,
            initiative_order,
            enemies,
            player_conditions: Vec::new(),
            environment,
            available_actions: Vec::new(),
            log: Vec::new(),
            outcome: None,
            rewards: None,
        }
    }

    /// The initiative entry whose turn it is, if the order is non-empty.
    pub fn current_entry(&self) -> Option<&InitiativeEntry> {
        self.initiative_order.get(self.turn_index)
    }

    /// Look up an enemy stat block by id.
    pub fn enemy(&self, id: EntityId) -> Option<&EnemyStatBlock> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Look up an enemy stat block by id, mutably.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut EnemyStatBlock> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Enemies still alive and in the fight.
    pub fn standing_enemies(&self) -> impl Iterator<Item = &EnemyStatBlock> {
        self.enemies.iter().filter(|e| e.can_be_targeted())
    }

    /// True while at least one enemy is alive and has not routed.
    pub fn opposition_remains(&self) -> bool {
        self.standing_enemies().next().is_some()
    }

    /// True once the encounter has ended.
    pub fn has_ended(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyStatBlock;
    use crate::entity::CombatantKind;

    fn entry(kind: CombatantKind, name: &str, total: i32) -> InitiativeEntry {
        InitiativeEntry {
            entity_id: EntityId::new(),
            kind,
            name: name.to_string(),
            total,
            modifier: 0,
        }
    }

    fn sample_state() -> CombatState {
        let wolf = EnemyStatBlock::new("Mire Wolf", 11, 13).with_rewards(25, 0);
        let mut order = vec![
            entry(CombatantKind::Player, "Kael", 18),
            entry(CombatantKind::Enemy, "Mire Wolf", 12),
        ];
        order[1].entity_id = wolf.id;
        CombatState::new(order, vec![wolf], Environment::default())
    }

    #[test]
    fn new_state_is_idle() {
        let state = sample_state();
        assert_eq!(state.phase, CombatPhase::Idle);
        assert_eq!(state.round, 1);
        assert_eq!(state.turn_index, 0);
        assert!(!state.has_ended());
        assert!(state.outcome.is_none());
        assert!(state.rewards.is_none());
    }

    #[test]
    fn enemy_lookup_by_id() {
        let mut state = sample_state();
        let id = state.enemies[0].id;
        assert!(state.enemy(id).is_some());
        assert!(state.enemy(EntityId::new()).is_none());
        state.enemy_mut(id).unwrap().apply_damage(11);
        assert!(!state.opposition_remains());
    }

    #[test]
    fn fled_enemies_do_not_count_as_opposition() {
        let mut state = sample_state();
        state.enemies[0].has_fled = true;
        assert!(!state.opposition_remains());
        assert_eq!(state.standing_enemies().count(), 0);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = sample_state();
        state.phase = CombatPhase::PlayerTurn;
        state.available_actions = vec![ActionKind::Attack, ActionKind::Flee];
        state
            .player_conditions
            .push(crate::condition::ActiveCondition::new(
                crate::condition::ConditionKind::Dodging,
                "dodge action",
            ));

        let json = serde_json::to_string(&state).unwrap();
        let back: CombatState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, CombatPhase::PlayerTurn);
        assert_eq!(back.initiative_order.len(), 2);
        assert_eq!(back.enemies[0].name, "Mire Wolf");
        assert_eq!(back.available_actions, state.available_actions);
        assert_eq!(back.player_conditions.len(), 1);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(CombatOutcome::Victory.to_string(), "victory");
        assert_eq!(CombatOutcome::Fled.to_string(), "fled");
        assert_eq!(CombatPhase::CombatEnd.to_string(), "combat end");
    }
}
