//! Boss phase table.
//!
//! Phases are keyed by descending health-fraction thresholds. The active
//! phase is the most advanced one whose threshold the current fraction has
//! reached.

use serde::{Deserialize, Serialize};

use crate::constants::FRENZY_VOLLEY_SPREAD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Contact hit when close
    Chase,
    /// Wind up and dash, else a close hit
    Charge,
    /// Spin, wind up, or one bolt
    Spin,
    /// Spin, wind up, or a three-bolt volley
    Frenzy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossPhase {
    pub threshold: f32,
    pub speed_mult: f32,
    /// Seconds between pattern rolls
    pub attack_interval: f32,
    pub pattern: AttackPattern,
}

pub static PHASES: [BossPhase; 4] = [
    BossPhase {
        threshold: 1.0,
        speed_mult: 1.0,
        attack_interval: 1.5,
        pattern: AttackPattern::Chase,
    },
    BossPhase {
        threshold: 0.7,
        speed_mult: 1.3,
        attack_interval: 1.2,
        pattern: AttackPattern::Charge,
    },
    BossPhase {
        threshold: 0.4,
        speed_mult: 1.5,
        attack_interval: 0.9,
        pattern: AttackPattern::Spin,
    },
    BossPhase {
        threshold: 0.15,
        speed_mult: 1.8,
        attack_interval: 0.7,
        pattern: AttackPattern::Frenzy,
    },
];

/// Index into `table` of the phase for a health fraction. Falls back to the
/// first phase when no threshold matches.
pub fn phase_index(fraction: f32, table: &[BossPhase]) -> usize {
    table
        .iter()
        .rposition(|phase| fraction <= phase.threshold)
        .unwrap_or(0)
}

/// Phase index in the boss's own table.
pub fn phase_for_fraction(fraction: f32) -> usize {
    phase_index(fraction, &PHASES)
}

/// One pattern roll's possible results. Probabilities are drawn
/// independently, so a roll can fall through every branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PatternMenu {
    /// (chance, seconds)
    pub spin: Option<(f32, f32)>,
    pub windup: Option<(f32, f32)>,
    pub fallback: Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fallback {
    /// Contact hit when within boss radius + player radius + slack
    Contact,
    /// Hit when within a fixed range
    CloseHit,
    /// Bolts at these angular offsets from the player direction
    Bolts(&'static [f32]),
}

const SINGLE: &[f32] = &[0.0];
const VOLLEY: &[f32] = &[0.0, FRENZY_VOLLEY_SPREAD, -FRENZY_VOLLEY_SPREAD];

impl AttackPattern {
    pub(crate) fn menu(&self) -> PatternMenu {
        match self {
            AttackPattern::Chase => PatternMenu {
                spin: None,
                windup: None,
                fallback: Fallback::Contact,
            },
            AttackPattern::Charge => PatternMenu {
                spin: None,
                windup: Some((0.4, 0.8)),
                fallback: Fallback::CloseHit,
            },
            AttackPattern::Spin => PatternMenu {
                spin: Some((0.3, 1.5)),
                windup: Some((0.3, 0.6)),
                fallback: Fallback::Bolts(SINGLE),
            },
            AttackPattern::Frenzy => PatternMenu {
                spin: Some((0.25, 2.0)),
                windup: Some((0.3, 0.4)),
                fallback: Fallback::Bolts(VOLLEY),
            },
        }
    }
}
