//! Initiative rolling.
//!
//! Runs exactly once, at encounter creation. Rolls are consumed in a
//! fixed order (player, companions, enemies) so a given die sequence
//! always produces the same order.

use dm_core::{CharacterSummary, CombatantKind, Companion, EnemyStatBlock, InitiativeEntry};

use crate::dice::{Die, DieRoller};

/// Roll initiative for every combatant and return the turn order:
/// descending by total (1d20 + modifier), ties broken by the higher
/// modifier, remaining ties by input order.
pub fn roll_initiative(
    player: &CharacterSummary,
    companions: &[Companion],
    enemies: &[EnemyStatBlock],
    roller: &mut dyn DieRoller,
) -> Vec<InitiativeEntry> {
    let mut entries = Vec::with_capacity(1 + companions.len() + enemies.len());

    entries.push(roll_entry(
        roller,
        player.id,
        CombatantKind::Player,
        &player.name,
        player.initiative_modifier,
    ));
    for companion in companions {
        entries.push(roll_entry(
            roller,
            companion.id,
            CombatantKind::Companion,
            &companion.name,
            companion.initiative_modifier,
        ));
    }
    for enemy in enemies {
        entries.push(roll_entry(
            roller,
            enemy.id,
            CombatantKind::Enemy,
            &enemy.name,
            enemy.initiative_modifier,
        ));
    }

    // Stable sort keeps input order for full ties.
    entries.sort_by(|a, b| b.total.cmp(&a.total).then(b.modifier.cmp(&a.modifier)));
    entries
}

fn roll_entry(
    roller: &mut dyn DieRoller,
    entity_id: dm_core::EntityId,
    kind: CombatantKind,
    name: &str,
    modifier: i32,
) -> InitiativeEntry {
    let die = roller.roll(Die::D20) as i32;
    InitiativeEntry {
        entity_id,
        kind,
        name: name.to_string(),
        total: die + modifier,
        modifier,
    }
}
