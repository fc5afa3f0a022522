//! Turn advancement.

use dm_core::CombatState;

/// Move the turn pointer one slot forward, wrapping around the
/// initiative order and incrementing the round counter on wraparound.
///
/// Does not skip dead combatants (deciding whether the combatant at
/// the pointer actually acts is the simulator's job) and is safe to
/// call on an order with no one left standing.
pub fn advance(state: &mut CombatState) {
    if state.initiative_order.is_empty() {
        return;
    }
    state.turn_index = (state.turn_index + 1) % state.initiative_order.len();
    if state.turn_index == 0 {
        state.round += 1;
    }
}
