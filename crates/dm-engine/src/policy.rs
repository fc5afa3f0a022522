//! Tunable combat policy.
//!
//! The numbers game designers argue about live here rather than as
//! hard-coded constants: the perception DC stealth is rolled against,
//! how long being hidden lasts, and how broken-morale enemies behave.

use serde::{Deserialize, Serialize};

/// Tunable knobs for the combat engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatPolicy {
    /// Fixed perception DC that hide attempts roll against.
    pub perception_dc: i32,
    /// How many turns the hidden condition lasts once gained.
    pub hidden_duration: u32,
    /// Percent chance (0-100) that a morale-broken enemy flees instead
    /// of acting.
    pub morale_flee_chance: u32,
    /// Percent chance (0-100) that a morale-broken enemy takes a
    /// defensive stance; checked after the flee chance on the same roll.
    pub morale_defend_chance: u32,
}

impl Default for CombatPolicy {
    fn default() -> Self {
        Self {
            perception_dc: 12,
            hidden_duration: 1,
            morale_flee_chance: 35,
            morale_defend_chance: 35,
        }
    }
}

impl CombatPolicy {
    /// Set the perception DC for hide attempts.
    pub fn with_perception_dc(mut self, dc: i32) -> Self {
        self.perception_dc = dc;
        self
    }

    /// Set how many turns being hidden lasts.
    pub fn with_hidden_duration(mut self, turns: u32) -> Self {
        self.hidden_duration = turns.max(1);
        self
    }

    /// Set the morale-break flee chance, in percent (clamped to 0-100).
    pub fn with_morale_flee_chance(mut self, percent: u32) -> Self {
        self.morale_flee_chance = percent.min(100);
        self
    }

    /// Set the morale-break defend chance, in percent. The combined
    /// flee + defend chance is clamped to 100.
    pub fn with_morale_defend_chance(mut self, percent: u32) -> Self {
        self.morale_defend_chance = percent.min(100 - self.morale_flee_chance);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let p = CombatPolicy::default();
        assert_eq!(p.perception_dc, 12);
        assert_eq!(p.hidden_duration, 1);
        assert!(p.morale_flee_chance + p.morale_defend_chance <= 100);
    }

    #[test]
    fn builders_clamp() {
        let p = CombatPolicy::default()
            .with_hidden_duration(0)
            .with_morale_flee_chance(150);
        assert_eq!(p.hidden_duration, 1);
        assert_eq!(p.morale_flee_chance, 100);
        let p = p.with_morale_defend_chance(50);
        assert_eq!(p.morale_defend_chance, 0);
    }

    #[test]
    fn builders_set_values() {
        let p = CombatPolicy::default()
            .with_perception_dc(15)
            .with_hidden_duration(2)
            .with_morale_flee_chance(20)
            .with_morale_defend_chance(40);
        assert_eq!(p.perception_dc, 15);
        assert_eq!(p.hidden_duration, 2);
        assert_eq!(p.morale_flee_chance, 20);
        assert_eq!(p.morale_defend_chance, 40);
    }
}
