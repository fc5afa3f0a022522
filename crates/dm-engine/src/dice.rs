//! Dice and the replaceable randomness source.
//!
//! Every roll in the engine draws from a [`DieRoller`], one value per
//! die, in a fixed order relative to control flow. Production code uses
//! [`SeededRoller`] over `StdRng`; tests script exact outcomes with
//! [`ScriptedRoller`].

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use dm_core::DamageExpr;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of sides, using the named variant
    /// where one exists.
    pub fn with_sides(sides: u32) -> Self {
        match sides {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            100 => Self::D100,
            n => Self::Custom(n),
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(n) => write!(f, "d{n}"),
            other => write!(f, "d{}", other.sides()),
        }
    }
}

/// Advantage state of a d20 roll: roll twice and keep the better (or
/// worse) die, or roll once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// A single straight roll.
    #[default]
    Flat,
    /// Roll twice, keep the higher.
    Advantage,
    /// Roll twice, keep the lower.
    Disadvantage,
}

impl Edge {
    /// Combine advantage and disadvantage sources: having both cancels
    /// back to a flat roll.
    pub fn combine(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => Self::Advantage,
            (false, true) => Self::Disadvantage,
            _ => Self::Flat,
        }
    }
}

/// The replaceable source of die rolls.
///
/// Implementations must return a value in `1..=die.sides()`.
pub trait DieRoller {
    /// Roll one die.
    fn roll(&mut self, die: Die) -> u32;
}

/// Production roller backed by a seeded `StdRng`. The same seed yields
/// the same encounter, which keeps recorded games replayable.
#[derive(Debug)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    /// Roller seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Roller with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DieRoller for SeededRoller {
    fn roll(&mut self, die: Die) -> u32 {
        self.rng.random_range(1..=die.sides().max(1))
    }
}

/// A roller that replays a fixed sequence of values, for tests that pin
/// exact outcomes.
#[derive(Debug, Default)]
pub struct ScriptedRoller {
    values: VecDeque<u32>,
}

impl ScriptedRoller {
    /// Roller that yields the given values in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// How many scripted values remain unconsumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DieRoller for ScriptedRoller {
    /// Returns the next scripted value, clamped into the die's range.
    ///
    /// # Panics
    /// Panics when the script is exhausted; a scripted test that rolls
    /// more dice than it provided values for is a broken test.
    fn roll(&mut self, die: Die) -> u32 {
        let value = self
            .values
            .pop_front()
            .unwrap_or_else(|| panic!("scripted roll sequence exhausted (die: {die})"));
        value.clamp(1, die.sides().max(1))
    }
}

/// Roll a damage expression. On a critical hit the dice are rolled
/// twice; the flat modifier is added once either way. Never negative.
pub fn roll_damage(roller: &mut dyn DieRoller, expr: &DamageExpr, critical: bool) -> i32 {
    let die = Die::with_sides(expr.sides);
    let count = if critical { expr.count * 2 } else { expr.count };
    let rolled: i32 = (0..count).map(|_| roller.roll(die) as i32).sum();
    (rolled + expr.modifier).max(0)
}

/// Roll a d20 under the given edge, consuming exactly one value when
/// flat and exactly two otherwise.
pub fn roll_d20(roller: &mut dyn DieRoller, edge: Edge) -> u32 {
    match edge {
        Edge::Flat => roller.roll(Die::D20),
        Edge::Advantage => {
            let a = roller.roll(Die::D20);
            let b = roller.roll(Die::D20);
            a.max(b)
        }
        Edge::Disadvantage => {
            let a = roller.roll(Die::D20);
            let b = roller.roll(Die::D20);
            a.min(b)
        }
    }
}
