//! Timed status conditions attached to combatants.
//!
//! Condition kinds form a closed enumeration; each kind carries its own
//! default duration, stacking rule, and mechanical effect, so adding a
//! kind is an exhaustiveness-checked change rather than a string match.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How re-applying a condition of the same kind behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stacking {
    /// A second application extends the existing condition instead of
    /// duplicating it.
    Refresh,
    /// Applications coexist as separate instances.
    Stack,
}

/// The closed set of condition kinds the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Fully focused on defense; attackers roll at disadvantage.
    Dodging,
    /// Moving at double pace this turn.
    Dashing,
    /// Withdrawing carefully; no opportunity attacks provoked.
    Disengaging,
    /// Unseen: next attack rolls with advantage, attackers roll at
    /// disadvantage. Broken by attacking.
    Hidden,
    /// Knocked down; attackers roll with advantage.
    Prone,
    /// Unable to act; attackers roll with advantage.
    Stunned,
    /// Shaken; own attacks roll at disadvantage.
    Frightened,
    /// Poison coursing through the veins; own attacks roll at
    /// disadvantage. Doses stack.
    Poisoned,
    /// Favored by fortune; own attacks roll with advantage.
    Blessed,
}

impl ConditionKind {
    /// Turns the condition lasts when applied without an explicit
    /// duration. `None` means indefinite until cleared by another effect.
    pub fn default_duration(self) -> Option<u32> {
        match self {
            Self::Dodging | Self::Dashing | Self::Disengaging | Self::Hidden | Self::Stunned => {
                Some(1)
            }
            Self::Frightened => Some(2),
            Self::Poisoned | Self::Blessed => Some(3),
            Self::Prone => None,
        }
    }

    /// Stacking rule for this kind.
    pub fn stacking(self) -> Stacking {
        match self {
            Self::Poisoned => Stacking::Stack,
            _ => Stacking::Refresh,
        }
    }

    /// Attacks made against a bearer of this condition roll with
    /// advantage.
    pub fn advantage_to_attackers(self) -> bool {
        matches!(self, Self::Prone | Self::Stunned)
    }

    /// Attacks made against a bearer of this condition roll at
    /// disadvantage.
    pub fn disadvantage_to_attackers(self) -> bool {
        matches!(self, Self::Dodging | Self::Hidden)
    }

    /// The bearer's own attacks roll with advantage.
    pub fn advantage_on_attacks(self) -> bool {
        matches!(self, Self::Hidden | Self::Blessed)
    }

    /// The bearer's own attacks roll at disadvantage.
    pub fn disadvantage_on_attacks(self) -> bool {
        matches!(self, Self::Frightened | Self::Poisoned)
    }

    /// The bearer cannot take actions at all.
    pub fn prevents_action(self) -> bool {
        matches!(self, Self::Stunned)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dodging => write!(f, "dodging"),
            Self::Dashing => write!(f, "dashing"),
            Self::Disengaging => write!(f, "disengaging"),
            Self::Hidden => write!(f, "hidden"),
            Self::Prone => write!(f, "prone"),
            Self::Stunned => write!(f, "stunned"),
            Self::Frightened => write!(f, "frightened"),
            Self::Poisoned => write!(f, "poisoned"),
            Self::Blessed => write!(f, "blessed"),
        }
    }
}

/// A condition instance attached to a combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveCondition {
    /// What the condition is.
    pub kind: ConditionKind,
    /// Where it came from ("dodge action", "Gravemaw Ghoul"), for display.
    pub source: String,
    /// Turns remaining; `None` is indefinite. Decremented at the end of
    /// the owning combatant's turn and removed at zero.
    pub remaining: Option<u32>,
    /// The check result that produced this condition, when one did
    /// (a stealth roll for `Hidden`), kept for downstream display.
    pub save_dc: Option<i32>,
    /// Set when the condition was applied during the owner's own turn:
    /// the first end-of-turn decrement is skipped so a one-turn stance
    /// covers the lap that follows it.
    #[serde(default)]
    pub fresh: bool,
}

impl ActiveCondition {
    /// Create a condition with its kind's default duration, marked fresh.
    pub fn new(kind: ConditionKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            remaining: kind.default_duration(),
            save_dc: None,
            fresh: true,
        }
    }

    /// Override the duration in turns.
    pub fn with_duration(mut self, turns: u32) -> Self {
        self.remaining = Some(turns);
        self
    }

    /// Make the condition indefinite until explicitly cleared.
    pub fn indefinite(mut self) -> Self {
        self.remaining = None;
        self
    }

    /// Record the check result that produced this condition.
    pub fn with_save_dc(mut self, dc: i32) -> Self {
        self.save_dc = Some(dc);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_defaults_to_one_turn() {
        for kind in [
            ConditionKind::Dodging,
            ConditionKind::Dashing,
            ConditionKind::Disengaging,
            ConditionKind::Hidden,
        ] {
            assert_eq!(kind.default_duration(), Some(1), "{kind}");
        }
    }

    #[test]
    fn prone_is_indefinite() {
        assert_eq!(ConditionKind::Prone.default_duration(), None);
        let c = ActiveCondition::new(ConditionKind::Prone, "trip attack");
        assert_eq!(c.remaining, None);
    }

    #[test]
    fn poison_stacks_everything_else_refreshes() {
        assert_eq!(ConditionKind::Poisoned.stacking(), Stacking::Stack);
        assert_eq!(ConditionKind::Dodging.stacking(), Stacking::Refresh);
        assert_eq!(ConditionKind::Hidden.stacking(), Stacking::Refresh);
    }

    #[test]
    fn hidden_cuts_both_ways() {
        assert!(ConditionKind::Hidden.advantage_on_attacks());
        assert!(ConditionKind::Hidden.disadvantage_to_attackers());
    }

    #[test]
    fn stunned_prevents_action() {
        assert!(ConditionKind::Stunned.prevents_action());
        assert!(!ConditionKind::Frightened.prevents_action());
    }

    #[test]
    fn builders() {
        let c = ActiveCondition::new(ConditionKind::Hidden, "hide action")
            .with_duration(2)
            .with_save_dc(17);
        assert_eq!(c.remaining, Some(2));
        assert_eq!(c.save_dc, Some(17));
        assert!(c.fresh);
    }
}
